//! End to end tests: a real server on a local port with a stub OCR engine.

use std::net::SocketAddr;

use glam::Vec2;
use plancal_core::{
    Planner, PlannerConfig,
    analysis::bbox::Bbox,
    error::{ConfigSnafu, PlancalError},
    ocr::{OcrBlock, OcrDocument, OcrEngine, OcrLine, OcrPage, OcrWord},
};
use plancal_server::{AppState, serve};
use reqwest::multipart::{Form, Part};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Returns the same layout for every document.
struct StubEngine {
    rows: Vec<(f32, Vec<(&'static str, f32)>)>,
}

impl OcrEngine for StubEngine {
    fn recognize(&mut self, _document: &[u8]) -> Result<OcrDocument, PlancalError> {
        let lines = self
            .rows
            .iter()
            .map(|(y, words)| OcrLine {
                words: words
                    .iter()
                    .map(|(value, x)| OcrWord {
                        value: value.to_string(),
                        geometry: Bbox::new(Vec2::new(*x, *y), Vec2::new(x + 0.05, y + 0.02)),
                    })
                    .collect(),
            })
            .collect();

        Ok(OcrDocument {
            pages: vec![OcrPage {
                blocks: vec![OcrBlock { lines }],
            }],
        })
    }
}

struct BrokenEngine;

impl OcrEngine for BrokenEngine {
    fn recognize(&mut self, _document: &[u8]) -> Result<OcrDocument, PlancalError> {
        ConfigSnafu {
            message: "no model",
        }
        .fail()
    }
}

fn planning() -> StubEngine {
    StubEngine {
        rows: vec![
            (0.10, vec![("lun.", 0.05), ("7", 0.09)]),
            (0.20, vec![("Réunion", 0.30), ("équipe", 0.40), ("(salle", 0.55), ("A)", 0.62)]),
            (0.20, vec![("09:00-12:00", 0.10)]),
            (0.40, vec![("mar.", 0.05), ("8", 0.09)]),
            (0.50, vec![("14:00", 0.10), ("Formation", 0.25)]),
        ],
    }
}

async fn start(engine: impl OcrEngine + 'static) -> (SocketAddr, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(engine, Planner::new(PlannerConfig::default()), dir.path());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        serve(listener, state).await.expect("server");
    });

    (addr, dir)
}

async fn upload(addr: SocketAddr, body: &'static [u8]) -> reqwest::Response {
    let form = Form::new().part(
        "file",
        Part::bytes(body)
            .file_name("planning.pdf")
            .mime_str("application/pdf")
            .expect("mime"),
    );

    reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .expect("upload request")
}

#[tokio::test]
async fn test_health_endpoint() {
    let (addr, _dir) = start(planning()).await;

    let response = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("health request");
    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("json");
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_upload_returns_events_and_links() {
    let (addr, dir) = start(planning()).await;

    let response = upload(addr, b"%PDF-1.4").await;
    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("json");
    let id = json["id"].as_str().expect("id").to_string();
    assert_eq!(json["xlsx"], format!("/download/xlsx/{id}"));
    assert_eq!(json["ics"], format!("/download/ics/{id}"));

    let events = json["events"].as_array().expect("events");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["date"], "2025-07-07");
    assert_eq!(events[0]["start"], "09:00");
    assert_eq!(events[0]["end"], "12:00");
    assert_eq!(events[0]["title"], "Réunion équipe");
    assert_eq!(events[0]["description"], "salle A");
    assert_eq!(events[1]["end"], "17:00");

    assert!(dir.path().join(format!("planning_{id}.xlsx")).is_file());
    assert!(dir.path().join(format!("planning_{id}.ics")).is_file());
}

#[tokio::test]
async fn test_downloads_have_content_types() {
    let (addr, _dir) = start(planning()).await;
    let json: serde_json::Value = upload(addr, b"%PDF-1.4").await.json().await.expect("json");

    let ics = reqwest::get(format!("http://{addr}{}", json["ics"].as_str().expect("ics link")))
        .await
        .expect("ics request");
    assert_eq!(ics.status(), 200);
    assert_eq!(ics.headers()["content-type"], "text/calendar");
    let text = ics.text().await.expect("ics body");
    assert_eq!(text.matches("BEGIN:VEVENT").count(), 2);
    assert!(text.contains("DTSTART:20250707T090000"));

    let xlsx = reqwest::get(format!("http://{addr}{}", json["xlsx"].as_str().expect("xlsx link")))
        .await
        .expect("xlsx request");
    assert_eq!(xlsx.status(), 200);
    assert_eq!(
        xlsx.headers()["content-type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    // xlsx files are zip archives
    let bytes = xlsx.bytes().await.expect("xlsx body");
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn test_uploads_do_not_share_outputs() {
    let (addr, _dir) = start(planning()).await;

    let first: serde_json::Value = upload(addr, b"%PDF-1.4").await.json().await.expect("json");
    let second: serde_json::Value = upload(addr, b"%PDF-1.4").await.json().await.expect("json");

    assert_ne!(first["id"], second["id"]);
    assert_ne!(first["ics"], second["ics"]);
}

#[tokio::test]
async fn test_unknown_or_malformed_id_is_not_found() {
    let (addr, _dir) = start(planning()).await;

    for path in [
        format!("/download/ics/{}", uuid::Uuid::new_v4()),
        format!("/download/xlsx/{}", uuid::Uuid::new_v4()),
        "/download/ics/not-an-id".to_string(),
        "/download/xlsx/..%2Fsecret".to_string(),
    ] {
        let response = reqwest::get(format!("http://{addr}{path}"))
            .await
            .expect("download request");
        assert_eq!(response.status(), 404, "{path}");
    }
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let (addr, _dir) = start(planning()).await;

    let form = Form::new().text("comment", "no pdf here");
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .expect("upload request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_ocr_failure_gives_empty_planning() {
    let (addr, _dir) = start(BrokenEngine).await;

    let response = upload(addr, b"not a pdf").await;
    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("json");
    assert_eq!(json["events"].as_array().map(Vec::len), Some(0));

    let ics = reqwest::get(format!("http://{addr}{}", json["ics"].as_str().expect("ics link")))
        .await
        .expect("ics request")
        .text()
        .await
        .expect("ics body");
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(!ics.contains("BEGIN:VEVENT"));
}
