//! API handlers for the ADGM server
//!
//! Provides REST endpoints for:
//! - Process and document type listing
//! - Document analysis and report rendering
//! - Guidance questions

use std::time::Duration;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use compliance_engine::{DocumentInput, ReportFormat, StructuredReport};
use serde::{Deserialize, Serialize};
use shared_types::{DocumentType, ProcessResult};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::knowledge::{self, Answer};
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "adgm-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Document type metadata
#[derive(Serialize)]
pub struct DocumentTypeInfo {
    pub key: &'static str,
    pub name: &'static str,
}

impl From<DocumentType> for DocumentTypeInfo {
    fn from(doc_type: DocumentType) -> Self {
        Self {
            key: doc_type.key(),
            name: doc_type.display_name(),
        }
    }
}

/// Process metadata
#[derive(Serialize)]
pub struct ProcessInfo {
    pub key: String,
    pub name: String,
    pub required_documents: Vec<DocumentTypeInfo>,
    pub checklist: Vec<String>,
}

/// Process list response
#[derive(Serialize)]
pub struct ProcessListResponse {
    pub success: bool,
    pub processes: Vec<ProcessInfo>,
    pub count: usize,
}

/// Handler: GET /api/processes
pub async fn handle_list_processes(State(state): State<AppState>) -> Json<ProcessListResponse> {
    let processes: Vec<ProcessInfo> = state
        .engine
        .rule_book()
        .processes()
        .iter()
        .map(|p| ProcessInfo {
            key: p.key.clone(),
            name: p.name.clone(),
            required_documents: p.required_documents.iter().copied().map(Into::into).collect(),
            checklist: p.checklist.clone(),
        })
        .collect();

    let count = processes.len();

    Json(ProcessListResponse {
        success: true,
        processes,
        count,
    })
}

/// Supported document types response
#[derive(Serialize)]
pub struct DocumentTypesResponse {
    pub success: bool,
    pub document_types: Vec<DocumentTypeInfo>,
    pub count: usize,
}

/// Handler: GET /api/document-types
pub async fn handle_list_document_types(
    State(state): State<AppState>,
) -> Json<DocumentTypesResponse> {
    let document_types: Vec<DocumentTypeInfo> = state
        .engine
        .rule_book()
        .document_types()
        .into_iter()
        .map(Into::into)
        .collect();

    let count = document_types.len();

    Json(DocumentTypesResponse {
        success: true,
        document_types,
        count,
    })
}

/// One uploaded document
#[derive(Deserialize)]
pub struct UploadedDocument {
    pub filename: String,
    /// Base64-encoded DOCX bytes
    pub data_base64: String,
}

/// Analysis request body
#[derive(Deserialize)]
pub struct AnalyzeRequest {
    /// Process key or display name (e.g., "company_incorporation")
    pub process: String,
    pub documents: Vec<UploadedDocument>,
}

/// Analysis response: the structured report
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: StructuredReport,
}

/// Handler: POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ServerError> {
    info!(
        "Analyze request: process={}, documents={}",
        req.process,
        req.documents.len()
    );

    let result = run_analysis(&state, req).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        report: StructuredReport::from_result(&result),
    }))
}

/// Report request body
#[derive(Deserialize)]
pub struct ReportRequest {
    #[serde(flatten)]
    pub analysis: AnalyzeRequest,

    /// Output format: "json" or "text"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

/// Handler: POST /api/report
pub async fn handle_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Response, ServerError> {
    let format: ReportFormat = req.format.parse().map_err(ServerError::InvalidRequest)?;
    info!(
        "Report request: process={}, format={}",
        req.analysis.process,
        format.extension()
    );

    let result = run_analysis(&state, req.analysis).await?;
    let bytes = state.engine.render(&result, format)?;

    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"adgm_report_{}.{}\"",
                    result.process_key,
                    format.extension()
                ),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Question request body
#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Handler: POST /api/ask
pub async fn handle_ask(Json(req): Json<AskRequest>) -> Result<Json<Answer>, ServerError> {
    if req.question.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "Please enter a question about ADGM requirements".to_string(),
        ));
    }
    debug!("Question: {}", req.question);
    Ok(Json(knowledge::answer(&req.question)))
}

/// Validate the request, decode uploads and analyze on the blocking pool
async fn run_analysis(state: &AppState, req: AnalyzeRequest) -> Result<ProcessResult, ServerError> {
    // Unknown process is reported before any upload is decoded
    if state.engine.rule_book().process(&req.process).is_none() {
        return Err(ServerError::UnknownProcess(req.process));
    }

    let inputs = decode_documents(&req.documents)?;
    let engine = state.engine.clone();
    let process = req.process;

    let task = tokio::task::spawn_blocking(move || engine.analyze(&inputs, &process));
    Ok(within_deadline(task, state.timeout_ms).await??)
}

/// Await a blocking task, giving up after `timeout_ms`
async fn within_deadline<T>(task: JoinHandle<T>, timeout_ms: u64) -> Result<T, ServerError> {
    match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join_error)) => Err(ServerError::Internal(format!(
            "Analysis task panicked: {}",
            join_error
        ))),
        Err(_elapsed) => {
            // Blocking tasks cannot be cancelled; the work runs to completion
            // and its result is dropped
            warn!("Analysis exceeded {}ms; abandoning result", timeout_ms);
            Err(ServerError::Timeout(timeout_ms))
        }
    }
}

/// Decode base64 uploads into engine inputs
pub fn decode_documents(documents: &[UploadedDocument]) -> Result<Vec<DocumentInput>, ServerError> {
    if documents.is_empty() {
        return Err(ServerError::InvalidRequest(
            "No documents provided".to_string(),
        ));
    }

    documents
        .iter()
        .map(|doc| {
            if doc.filename.trim().is_empty() {
                return Err(ServerError::InvalidRequest(
                    "Every document needs a filename".to_string(),
                ));
            }
            let bytes = STANDARD.decode(doc.data_base64.trim()).map_err(|e| {
                ServerError::InvalidRequest(format!(
                    "Invalid base64 data for '{}': {}",
                    doc.filename, e
                ))
            })?;
            Ok(DocumentInput::bytes(doc.filename.clone(), bytes))
        })
        .collect()
}
