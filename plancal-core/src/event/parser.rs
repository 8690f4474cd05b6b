use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use regex::Regex;
use snafu::OptionExt;
use tracing::*;

use crate::{config::PlannerConfig, consts::*};

use super::{Event, FrenchMonth, InvalidDaySnafu, InvalidTimeSnafu, ParseError};

/// French weekday abbreviation, a period, then the day number: `lun. 7`.
static DATE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(lun|mar|mer|jeu|ven|sam|dim)\.\s*([0-9]{1,2})")
        .expect("date header pattern is valid")
});

/// `H:MM` optionally followed by `-H:MM`.
static TIME_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2}:[0-9]{2})(?:-([0-9]{1,2}:[0-9]{2}))?")
        .expect("time entry pattern is valid")
});

/// The date the following time entries belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserState {
    current_date: Option<NaiveDate>,
}

impl ParserState {
    pub fn current_date(&self) -> Option<NaiveDate> {
        self.current_date
    }
}

/// Scans reconstructed lines for date headers and time entries.
///
/// Headers only carry a day number; month and year come from the parser.
/// Malformed lines are dropped, never reported: the result is a best effort
/// list of events.
#[derive(Debug, Clone)]
pub struct EventParser {
    month: FrenchMonth,
    year: i32,
    default_duration: TimeDelta,
}

impl EventParser {
    pub fn new(month: FrenchMonth, year: i32) -> Self {
        Self {
            month,
            year,
            default_duration: TimeDelta::minutes(DEFAULT_DURATION_MINUTES),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.month, config.year)
            .with_default_duration(TimeDelta::minutes(config.default_duration_minutes))
    }

    /// Duration of entries which only state a start time.
    pub fn with_default_duration(mut self, duration: TimeDelta) -> Self {
        self.default_duration = duration;
        self
    }

    /// Parse lines in order, starting with no current date.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Event> {
        let (_, events) = lines.iter().fold(
            (ParserState::default(), Vec::new()),
            |(mut state, mut events), line| {
                if let Some(event) = self.step(&mut state, line.as_ref()) {
                    events.push(event);
                }
                (state, events)
            },
        );

        debug!("parsed {} events from {} lines", events.len(), lines.len());
        events
    }

    /// Feed one line to the state machine.
    ///
    /// A date header moves the state to its date. A time entry read while a
    /// date is set gives an event on that date.
    pub fn step(&self, state: &mut ParserState, line: &str) -> Option<Event> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match self.parse_date_header(line) {
            Ok(Some(date)) => {
                state.current_date = Some(date);
                return None;
            }
            Ok(None) => {}
            Err(err) => {
                debug!("dropping header `{}`: {}", line, err);
                return None;
            }
        }

        if !line.contains([':', '-']) {
            return None;
        }
        let date = state.current_date?;

        match self.parse_time_entry(date, line) {
            Ok(event) => event,
            Err(err) => {
                debug!("dropping entry `{}`: {}", line, err);
                None
            }
        }
    }

    /// `Ok(None)` when the line is not a date header at all.
    pub fn parse_date_header(&self, line: &str) -> Result<Option<NaiveDate>, ParseError> {
        let Some(captures) = DATE_HEADER.captures(line) else {
            return Ok(None);
        };

        let day = captures[2].parse::<u32>().unwrap_or_default();
        let month = self.month.number();

        NaiveDate::from_ymd_opt(self.year, month, day)
            .map(Some)
            .context(InvalidDaySnafu {
                day,
                month,
                year: self.year,
            })
    }

    /// `Ok(None)` when the line holds no time pattern.
    pub fn parse_time_entry(
        &self,
        date: NaiveDate,
        line: &str,
    ) -> Result<Option<Event>, ParseError> {
        let Some(captures) = TIME_ENTRY.captures(line) else {
            return Ok(None);
        };

        let start = parse_time(&captures[1])?;
        let end = match captures.get(2) {
            Some(end) => parse_time(end.as_str())?,
            None => start.overflowing_add_signed(self.default_duration).0,
        };

        let pattern_end = captures.get(0).map_or(line.len(), |m| m.end());
        let (title, description) = split_title(&line[pattern_end..]);

        Ok(Some(Event {
            date,
            start,
            end,
            title,
            description,
        }))
    }
}

impl Default for EventParser {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, ParseError> {
    value
        .split_once(':')
        .and_then(|(hour, minute)| Some((hour.parse().ok()?, minute.parse().ok()?)))
        .and_then(|(hour, minute)| NaiveTime::from_hms_opt(hour, minute, 0))
        .context(InvalidTimeSnafu { value })
}

/// Split `Title (description)` at the first `(`, dropping every `)` of the
/// description.
pub fn split_title(text: &str) -> (String, String) {
    let text = text.trim();
    match text.split_once('(') {
        Some((title, description)) => (
            title.trim().to_string(),
            description.replace(')', "").trim().to_string(),
        ),
        None => (text.to_string(), String::new()),
    }
}
