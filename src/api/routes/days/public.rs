//! Public types for the days API
pub use crate::countdown::{Countdown as DaysResponse, Status};
