//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit for the moisture probe and the three
//! relay/LED outputs using raw ESP-IDF sys calls. Called once from `main()`
//! before the self-test and the control loop.
//!
//! On host targets every call is simulated: ADC samples come from
//! [`sim_set_moisture_adc`] / [`sim_fail_adc`] and output levels are kept
//! in an atomic bitmask readable through [`sim_gpio_level`].

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::error::SensorError;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    AdcChannelConfigFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::AdcChannelConfigFailed(rc) => write!(f, "ADC1 channel config failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

/// Relay and LED pins, all push-pull outputs driven LOW at init.
pub const OUTPUT_PINS: [i32; 3] = [pins::PUMP_GPIO, pins::VALVE_GPIO, pins::STATUS_LED_GPIO];

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    for pin in OUTPUT_PINS {
        gpio_write(pin, false);
    }
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// control-loop read path. `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    // 12 dB attenuation covers the probe's 0–3.1 V swing.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe {
        adc_oneshot_config_channel(adc1_handle(), pins::MOISTURE_ADC_CHANNEL, &chan_cfg)
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcChannelConfigFailed(ret)); }

    info!(
        "hw_init: ADC1 configured (CH{}=moisture on GPIO{})",
        pins::MOISTURE_ADC_CHANNEL,
        pins::MOISTURE_ADC_GPIO
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    if channel != pins::MOISTURE_ADC_CHANNEL {
        return Err(SensorError::ChannelNotConfigured(channel));
    }
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded control-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed(ret));
    }
    Ok(raw.max(0) as u16)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    use core::sync::atomic::Ordering;

    if channel != pins::MOISTURE_ADC_CHANNEL {
        return Err(SensorError::ChannelNotConfigured(channel));
    }
    let rc = sim::ADC_FAIL_RC.load(Ordering::Relaxed);
    if rc != 0 {
        return Err(SensorError::AdcReadFailed(rc));
    }
    Ok(sim::MOISTURE_RAW.load(Ordering::Relaxed))
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for &pin in &OUTPUT_PINS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!(
        "hw_init: outputs configured LOW (pump=GPIO{}, valve=GPIO{}, led=GPIO{})",
        pins::PUMP_GPIO,
        pins::VALVE_GPIO,
        pins::STATUS_LED_GPIO
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Control loop only.
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    use core::sync::atomic::Ordering;

    let bit = 1u64 << pin;
    if high {
        sim::GPIO_LEVELS.fetch_or(bit, Ordering::Relaxed);
    } else {
        sim::GPIO_LEVELS.fetch_and(!bit, Ordering::Relaxed);
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicI32, AtomicU16, AtomicU64};

    /// Mid-scale reading (~47 % with default calibration).
    pub static MOISTURE_RAW: AtomicU16 = AtomicU16::new(600);
    /// Non-zero makes the next ADC reads fail with this return code.
    pub static ADC_FAIL_RC: AtomicI32 = AtomicI32::new(0);
    pub static GPIO_LEVELS: AtomicU64 = AtomicU64::new(0);
}

/// Inject the raw ADC value returned by subsequent moisture reads.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_moisture_adc(raw: u16) {
    sim::MOISTURE_RAW.store(raw, core::sync::atomic::Ordering::Relaxed);
}

/// Make subsequent ADC reads fail with `rc` (`None` restores normal reads).
#[cfg(not(target_os = "espidf"))]
pub fn sim_fail_adc(rc: Option<i32>) {
    sim::ADC_FAIL_RC.store(rc.unwrap_or(0), core::sync::atomic::Ordering::Relaxed);
}

/// Last level written to `pin` in simulation.
#[cfg(not(target_os = "espidf"))]
pub fn sim_gpio_level(pin: i32) -> bool {
    sim::GPIO_LEVELS.load(core::sync::atomic::Ordering::Relaxed) & (1u64 << pin) != 0
}

/// Serialises unit tests that touch the sim atomics.
#[cfg(all(test, not(target_os = "espidf")))]
pub(crate) fn sim_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
