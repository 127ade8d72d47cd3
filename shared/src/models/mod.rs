//! Domain models for the irrigation telemetry dashboard

mod pump;
mod range;
mod reading;
mod series;

pub use pump::*;
pub use range::*;
pub use reading::*;
pub use series::*;
