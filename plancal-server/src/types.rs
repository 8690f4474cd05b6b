//! Response bodies

use plancal_core::{Event, PlanningOutput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Result of one upload, with the links to its exports.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub events: Vec<Event>,
    pub xlsx: String,
    pub ics: String,
}

impl From<PlanningOutput> for UploadResponse {
    fn from(output: PlanningOutput) -> Self {
        Self {
            id: output.id,
            xlsx: format!("/download/xlsx/{}", output.id),
            ics: format!("/download/ics/{}", output.id),
            events: output.events,
        }
    }
}
