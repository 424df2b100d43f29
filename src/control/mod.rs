//! Irrigation control: the decision policy and the actuator sequencer.

pub mod policy;
pub mod sequencer;
