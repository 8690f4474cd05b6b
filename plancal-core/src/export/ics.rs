use std::path::Path;

use icalendar::{Calendar, Component, EventLike};
use snafu::ResultExt;
use tracing::*;
use uuid::Uuid;

use crate::{
    error::{IoWriteSnafu, PlancalError},
    event::Event,
};

/// One VEVENT per event with floating local times.
pub fn build_calendar(events: &[Event]) -> Calendar {
    let mut calendar = Calendar::new();
    calendar.name("Planning");

    for event in events {
        let (start, end) = event.span();

        let mut vevent = icalendar::Event::new();
        vevent
            .uid(&Uuid::new_v4().to_string())
            .summary(&event.title)
            .starts(start)
            .ends(end);
        if !event.description.is_empty() {
            vevent.description(&event.description);
        }

        calendar.push(vevent.done());
    }

    calendar.done()
}

pub fn to_ics_string(events: &[Event]) -> String {
    build_calendar(events).to_string()
}

pub fn write_ics(events: &[Event], path: &Path) -> Result<(), PlancalError> {
    std::fs::write(path, to_ics_string(events)).context(IoWriteSnafu {
        path: path.to_string_lossy(),
    })?;

    info!("wrote {} events to {}", events.len(), path.display());
    Ok(())
}
