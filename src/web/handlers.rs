use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use serde::Serialize;
use tokio::task;

use crate::analyze::{Analysis, analyze_text};
use crate::extract::{DocumentKind, ExtractionOutcome};

use super::AppState;

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub results: Vec<FileResult>,
    pub errors: Vec<String>,
    pub analysis: Option<Analysis>,
    pub combined_text: String,
}

#[derive(Serialize)]
pub struct FileResult {
    pub filename: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
}

/// Accept uploaded PDFs and images, extract their text, and return the
/// per-file results together with an analysis of the combined text.
#[tracing::instrument(skip(state, multipart))]
pub async fn analyze_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut uploads: Vec<(String, Vec<u8>)> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        if field.name() != Some("files") {
            continue;
        }
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let data = match field.bytes().await {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, filename = %filename, "Failed to read file bytes");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read file: {}", e),
                    }),
                )
                    .into_response();
            }
        };
        uploads.push((filename, data.to_vec()));
    }

    if uploads.is_empty() {
        tracing::warn!("Analyze request with no files");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Please choose at least one PDF or image".to_string(),
            }),
        )
            .into_response();
    }

    let response = process_uploads(&state, uploads).await;
    (StatusCode::OK, Json(response)).into_response()
}

/// Extract each upload in order, collecting per-file results and error
/// strings; a failed file never aborts the batch. The combined text is
/// analyzed only when at least one extraction succeeded.
async fn process_uploads(state: &AppState, uploads: Vec<(String, Vec<u8>)>) -> AnalyzeResponse {
    let mut results: Vec<FileResult> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for (raw_name, bytes) in uploads {
        let Some(kind) = DocumentKind::from_filename(&raw_name) else {
            errors.push(format!("Unsupported: {}", raw_name));
            continue;
        };
        let filename = sanitize_filename(&raw_name);

        tracing::debug!(filename = %filename, bytes = bytes.len(), "Extracting upload");

        let extractor = Arc::clone(&state.extractor);
        let outcome = match task::spawn_blocking(move || extractor.extract(kind, &bytes)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, filename = %filename, "Extraction task failed");
                errors.push(format!("Error in {}: {}", filename, e));
                continue;
            }
        };

        match outcome {
            ExtractionOutcome::Extracted { text } => {
                results.push(FileResult { filename, text });
            }
            ExtractionOutcome::NoText => {
                errors.push(format!("No text in {}", filename));
            }
            ExtractionOutcome::Failed { reason } => {
                errors.push(format!("Error in {}: {}", filename, reason));
            }
        }
    }

    let combined = results
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let analysis = if combined.is_empty() {
        None
    } else {
        let insights = state.insights.generate(&combined).await;
        analyze_text(&combined, &insights)
    };

    tracing::info!(
        files = results.len(),
        errors = errors.len(),
        chars = combined.chars().count(),
        "Upload batch processed"
    );

    AnalyzeResponse {
        results,
        errors,
        analysis,
        combined_text: combined,
    }
}

/// Keep only the final path component of a client-supplied filename.
/// Uploads are never written to disk under this name; it only tidies
/// responses and log output.
fn sanitize_filename(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim()
        .to_string()
}

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>DocSight</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 760px; margin: 40px auto; padding: 0 16px; color: #222; }
        h1 { font-size: 1.4em; }
        form { border: 2px dashed #bbb; border-radius: 8px; padding: 24px; margin: 24px 0; }
        button { background: #2563eb; color: #fff; border: 0; border-radius: 6px; padding: 10px 18px; font-size: 1em; cursor: pointer; }
        button:hover { background: #1d4ed8; }
        .error { color: #b91c1c; }
        pre { background: #f6f6f6; border-radius: 6px; padding: 12px; white-space: pre-wrap; word-break: break-word; }
        h3 { margin-bottom: 4px; }
    </style>
</head>
<body>
    <h1>DocSight</h1>
    <p>Upload PDFs or images to extract their text and analyze it.</p>
    <form id="upload-form">
        <input type="file" name="files" multiple accept=".pdf,.png,.jpg,.jpeg">
        <button type="submit">Analyze</button>
    </form>
    <div id="output"></div>
    <script>
        const form = document.getElementById('upload-form');
        const output = document.getElementById('output');
        form.addEventListener('submit', async (event) => {
            event.preventDefault();
            output.innerHTML = '<p>Working&hellip;</p>';
            const response = await fetch('/', { method: 'POST', body: new FormData(form) });
            const data = await response.json();
            if (!response.ok) {
                output.innerHTML = '<p class="error"></p>';
                output.firstChild.textContent = data.error || 'Request failed';
                return;
            }
            output.innerHTML = '';
            for (const err of data.errors) {
                const p = document.createElement('p');
                p.className = 'error';
                p.textContent = err;
                output.appendChild(p);
            }
            for (const result of data.results) {
                const h = document.createElement('h3');
                h.textContent = result.filename;
                const pre = document.createElement('pre');
                pre.textContent = result.text;
                output.append(h, pre);
            }
            if (data.analysis) {
                const h = document.createElement('h3');
                h.textContent = 'Analysis';
                const pre = document.createElement('pre');
                pre.textContent = JSON.stringify(data.analysis, null, 2);
                output.append(h, pre);
            }
        });
    </script>
</body>
</html>
"#;
