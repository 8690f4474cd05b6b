use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use serde::Serialize;
use snafu::ResultExt;
use tracing::*;
use uuid::Uuid;

use crate::{
    config::PlannerConfig,
    consts::OUTPUT_FILE_PREFIX,
    error::{IoWriteSnafu, PlancalError},
    event::{Event, EventParser},
    export::{write_ics, write_xlsx},
    layout::{extract_fragments, reconstruct_lines},
    ocr::OcrEngine,
};

/// Files produced for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub xlsx: PathBuf,
    pub ics: PathBuf,
}

impl OutputPaths {
    /// `planning_<id>.xlsx` and `planning_<id>.ics` inside `dir`.
    pub fn new(dir: &Path, id: Uuid) -> Self {
        Self {
            xlsx: dir.join(format!("{OUTPUT_FILE_PREFIX}_{id}.xlsx")),
            ics: dir.join(format!("{OUTPUT_FILE_PREFIX}_{id}.ics")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanningOutput {
    pub id: Uuid,
    pub events: Vec<Event>,
    pub paths: OutputPaths,
}

/// Converts planning pdfs into spreadsheet and calendar files.
///
/// Every run starts from fresh state; only the OCR engine, lent by the
/// caller, outlives a document.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
    parser: EventParser,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        let parser = EventParser::from_config(&config);
        Self { config, parser }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// OCR the document and parse its events, without writing anything.
    pub fn events(&self, engine: &mut dyn OcrEngine, document: &[u8]) -> Vec<Event> {
        let fragments = extract_fragments(engine, document);
        let lines = reconstruct_lines(&fragments, self.config.line_decimals);
        self.parser.parse(&lines)
    }

    /// Full conversion; outputs are named after a fresh id so concurrent runs
    /// sharing `output_dir` never overwrite each other.
    pub fn process(
        &self,
        engine: &mut dyn OcrEngine,
        document: &[u8],
        output_dir: &Path,
    ) -> Result<PlanningOutput, PlancalError> {
        let id = Uuid::new_v4();
        let span = info_span!("planning", %id);
        let _guard = span.enter();

        let started = Instant::now();
        info!(
            "processing {} bytes for {} {}",
            document.len(),
            self.config.month,
            self.config.year
        );

        let events = self.events(engine, document);

        std::fs::create_dir_all(output_dir).context(IoWriteSnafu {
            path: output_dir.to_string_lossy(),
        })?;
        let paths = OutputPaths::new(output_dir, id);
        write_xlsx(&events, &paths.xlsx)?;
        write_ics(&events, &paths.ics)?;

        info!(
            "{} events exported in {}ms",
            events.len(),
            started.elapsed().as_millis()
        );

        Ok(PlanningOutput { id, events, paths })
    }
}
