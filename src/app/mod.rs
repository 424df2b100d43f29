//! Application core. Pure domain logic, zero I/O.
//!
//! The control loop reads the moisture probe, asks the policy for a
//! decision and drives the actuator sequencer. All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
