//! Shared grid types for the adventure log.
//!
//! The codec converts between typed duration text, minute counts and the
//! day-anchored instant ranges stored for grid cells. The month helpers
//! describe the calendar window a grid covers.

mod cell;
pub mod codec;
mod month;

pub use cell::*;
pub use codec::{
    format_duration, from_range, parse_duration, CellInput, GridOffset, ParseDurationError,
    MAX_CELL_MINUTES,
};
pub use month::*;
