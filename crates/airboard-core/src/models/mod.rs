//! Data models for the airline board.
//!
//! - `AirlineRecord`: one airline as returned by the lookup service
//! - `AirlineList`: the fixed-length, configuration-ordered board contents

pub mod airline;

pub use airline::{AirlineList, AirlineRecord, US_COUNTRY};
