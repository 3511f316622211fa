// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod timing;
pub mod types;

#[cfg(feature = "impl-hal")]
pub mod hal_adapter;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::SensorAddress;

// From command.rs
pub use command::{AlertLimit, Command};

// From crc.rs
pub use crc::{append_crc8, calculate_crc8, verify_word};

// From error.rs
pub use error::{InitError, Sht3xError};

// From hal_traits.rs
pub use hal_traits::{ResetLine, Sht3xBus, Sht3xInstant, Sht3xTimer};

// From types.rs
pub use types::{Measurement, Mode, Repeatability, SampleRate, StatusRegister};

// --- Feature-gated re-exports ---

#[cfg(feature = "impl-hal")]
pub use hal_adapter::{HalInterface, TimeSource};
