//! HTTP handlers for the dashboard page

mod dashboard;
mod health;

pub use dashboard::*;
pub use health::*;
