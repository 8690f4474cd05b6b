use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{consts::*, event::FrenchMonth};

/// Settings of one planning conversion.
///
/// The month and year are not read from the document and must match it.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(default)]
pub struct PlannerConfig {
    pub month: FrenchMonth,
    pub year: i32,
    /// Decimals kept when rounding fragment heights into rows.
    pub line_decimals: u32,
    /// Duration of entries without an end time, in minutes.
    pub default_duration_minutes: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            month: FrenchMonth::default(),
            year: DEFAULT_YEAR,
            line_decimals: LINE_DECIMALS,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}
