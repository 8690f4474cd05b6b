//! Encoders turning the parsed events into files.

pub mod ics;
pub mod xlsx;

pub use ics::{to_ics_string, write_ics};
pub use xlsx::{to_xlsx_bytes, write_xlsx};
