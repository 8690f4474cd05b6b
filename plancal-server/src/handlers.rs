//! HTTP request handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use plancal_core::{
    OutputPaths,
    consts::{ICS_MIME, XLSX_MIME},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{AppState, HealthResponse, UploadResponse};

type HandlerError = (StatusCode, String);

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Convert the pdf of the multipart field `file`.
///
/// OCR and export are blocking, so they run on the blocking pool while
/// holding the engine.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HandlerError> {
    let mut document = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() == Some("file") {
            document = Some(field.bytes().await.map_err(bad_multipart)?);
            break;
        }
    }
    let document = document.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "Missing multipart field `file`".to_string(),
        )
    })?;
    info!("Upload received: {} bytes", document.len());

    let AppState {
        engine,
        planner,
        output_dir,
    } = state;
    let output = tokio::task::spawn_blocking(move || {
        let mut engine = engine.blocking_lock();
        planner.process(&mut **engine, &document, &output_dir)
    })
    .await
    .map_err(|e| {
        error!("Planning task failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?
    .map_err(|e| {
        error!("Planning failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!("Upload {} gave {} events", output.id, output.events.len());
    Ok(Json(UploadResponse::from(output)))
}

pub async fn download_xlsx(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HandlerError> {
    send_export(&state, &id, ExportKind::Xlsx).await
}

pub async fn download_ics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HandlerError> {
    send_export(&state, &id, ExportKind::Ics).await
}

#[derive(Debug, Clone, Copy)]
enum ExportKind {
    Xlsx,
    Ics,
}

async fn send_export(state: &AppState, id: &str, kind: ExportKind) -> Result<Response, HandlerError> {
    let not_found = || (StatusCode::NOT_FOUND, format!("No planning with id {id}"));

    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    let paths = OutputPaths::new(&state.output_dir, id);
    let (path, mime) = match kind {
        ExportKind::Xlsx => (paths.xlsx, XLSX_MIME),
        ExportKind::Ics => (paths.ics, ICS_MIME),
    };

    let body = tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            not_found()
        } else {
            error!("Failed to read {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> HandlerError {
    warn!("Rejected upload: {}", e);
    (StatusCode::BAD_REQUEST, format!("Invalid multipart body: {e}"))
}
