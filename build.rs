fn main() {
    println!("cargo:rerun-if-changed=sdkconfig.defaults");

    // Propagate the ESP-IDF environment only for device builds; host test
    // builds run with `--no-default-features`.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
