//! Calendar events and the line scanner that builds them.

pub mod month;
pub mod parser;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Serialize, Serializer};
use snafu::prelude::*;

pub use month::FrenchMonth;
pub use parser::{EventParser, ParserState};

/// Why a line which looked like a header or an entry was dropped.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub))]
pub enum ParseError {
    #[snafu(display("day {} does not exist in {:02}/{}", day, month, year))]
    InvalidDay { day: u32, month: u32, year: i32 },
    #[snafu(display("`{}` is not a time of day", value))]
    InvalidTime { value: String },
    #[snafu(display("`{}` is not a French month name", name))]
    UnknownMonth { name: String },
}

/// One scheduled activity of the planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub date: NaiveDate,
    #[serde(serialize_with = "hour_minute")]
    pub start: NaiveTime,
    #[serde(serialize_with = "hour_minute")]
    pub end: NaiveTime,
    pub title: String,
    pub description: String,
}

impl Event {
    /// Start and end as timestamps. An end not after the start belongs to
    /// the next day, so the returned end is always after the start.
    pub fn span(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.date.and_time(self.start);
        let mut end = self.date.and_time(self.end);
        if end <= start {
            end += TimeDelta::days(1);
        }
        (start, end)
    }
}

fn hour_minute<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format("%H:%M"))
}
