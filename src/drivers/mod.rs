//! Hardware initialisation and output pattern helpers.

pub mod hw_init;
pub mod led_patterns;
