//! Reusable UI widgets for IoT Forge

mod range_input;

pub use range_input::RangeInput;
