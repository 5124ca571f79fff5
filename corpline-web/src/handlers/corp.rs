//! Corporate outline lookup endpoint.
//!
//! Thin pipeline over the core crates: forward the caller's parameters
//! upstream, normalize whatever shape comes back, re-filter locally, and
//! wrap the survivors in the fixed envelope. Every failure collapses to the
//! same opaque 500 so upstream details never leak to callers.

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use corpline_core::payload::{self, PayloadError, ResultType};
use corpline_core::{RecordFilter, XmlError, envelope};
use corpline_registry::{
    DEFAULT_NUM_OF_ROWS, DEFAULT_PAGE_NO, DEFAULT_RESULT_TYPE, OutlineRequest, RegistryError,
};
use serde::Deserialize;
use thiserror::Error;

use crate::server::AppState;

/// Fixed body returned for every failed lookup.
pub const LOOKUP_FAILED_BODY: &str = "데이터 요청 중 오류가 발생했습니다";

/// Caller-supplied query parameters.
///
/// Everything is optional and nothing is validated; values travel upstream
/// exactly as they arrived. `crno` is the one exception: it never leaves
/// the proxy and only drives the local re-filter.
#[derive(Debug, Deserialize)]
pub struct CorpQuery {
    /// Upstream service credential
    #[serde(rename = "serviceKey")]
    pub service_key: Option<String>,
    /// Requested page size
    #[serde(rename = "numOfRows")]
    pub num_of_rows: Option<String>,
    /// Requested page number
    #[serde(rename = "pageNo")]
    pub page_no: Option<String>,
    /// Requested body format
    #[serde(rename = "resultType")]
    pub result_type: Option<String>,
    /// Company name keyword
    #[serde(rename = "corpNm")]
    pub corp_name: Option<String>,
    /// Registration number keyword, filtered locally
    pub crno: Option<String>,
}

/// Failures a lookup can run into; all of them map to the fixed 500 body.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport failure while contacting the registry.
    #[error("Upstream error: {0}")]
    Upstream(#[from] RegistryError),

    /// Upstream body did not parse in the requested format.
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Response envelope failed to render as XML.
    #[error("Render error: {0}")]
    Render(#[from] XmlError),

    /// Response envelope failed to serialize as JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// `GET /corp` - forwards the lookup upstream and returns the re-filtered
/// envelope in the requested format.
pub async fn corp_lookup(
    State(state): State<AppState>,
    Query(params): Query<CorpQuery>,
) -> Response {
    match lookup(&state, &params).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Outline lookup failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, LOOKUP_FAILED_BODY).into_response()
        }
    }
}

async fn lookup(state: &AppState, params: &CorpQuery) -> Result<Response, LookupError> {
    let request = outline_request(params);
    let result_type = request.result_type();

    let body = state.provider.fetch_outline(&request).await?;
    let records = payload::parse_records(&body, result_type)?;

    let filter = RecordFilter::new(params.corp_name.as_deref(), params.crno.as_deref());
    let matched = filter.apply(records);

    let rendered = match result_type {
        ResultType::Json => serde_json::to_string(&envelope::json_document(matched))?,
        ResultType::Xml => envelope::xml_document(matched)?,
    };

    Ok(([(header::CONTENT_TYPE, result_type.content_type())], rendered).into_response())
}

// Defaults apply only to parameters that are absent; explicit empty strings
// pass through so upstream sees exactly what the caller sent.
fn outline_request(params: &CorpQuery) -> OutlineRequest {
    OutlineRequest {
        service_key: params.service_key.clone(),
        num_of_rows: params
            .num_of_rows
            .clone()
            .unwrap_or_else(|| DEFAULT_NUM_OF_ROWS.to_string()),
        page_no: params
            .page_no
            .clone()
            .unwrap_or_else(|| DEFAULT_PAGE_NO.to_string()),
        result_type: params
            .result_type
            .clone()
            .unwrap_or_else(|| DEFAULT_RESULT_TYPE.to_string()),
        corp_name: params.corp_name.clone(),
    }
}
