//! Request types shared by registry client implementations.

use async_trait::async_trait;
use corpline_core::ResultType;

use crate::errors::RegistryError;

/// Default page size forwarded when the caller omits `numOfRows`.
pub const DEFAULT_NUM_OF_ROWS: &str = "100";

/// Default page number forwarded when the caller omits `pageNo`.
pub const DEFAULT_PAGE_NO: &str = "1";

/// Default body format forwarded when the caller omits `resultType`.
pub const DEFAULT_RESULT_TYPE: &str = "json";

/// Parameters forwarded to the outline registry.
///
/// Values pass through exactly as the caller supplied them; defaults apply
/// only to parameters the caller omitted entirely. The registration number
/// filter is deliberately absent here: upstream does not support it, so it
/// is applied locally after the response arrives.
#[derive(Debug, Clone)]
pub struct OutlineRequest {
    /// Caller's upstream service credential, forwarded untouched
    pub service_key: Option<String>,
    /// Requested page size
    pub num_of_rows: String,
    /// Requested page number
    pub page_no: String,
    /// Requested body format, forwarded verbatim
    pub result_type: String,
    /// Company name keyword, forwarded for upstream pre-filtering
    pub corp_name: Option<String>,
}

impl Default for OutlineRequest {
    fn default() -> Self {
        Self {
            service_key: None,
            num_of_rows: DEFAULT_NUM_OF_ROWS.to_string(),
            page_no: DEFAULT_PAGE_NO.to_string(),
            result_type: DEFAULT_RESULT_TYPE.to_string(),
            corp_name: None,
        }
    }
}

impl OutlineRequest {
    /// Body format the upstream response will arrive in.
    pub fn result_type(&self) -> ResultType {
        ResultType::from_param(&self.result_type)
    }

    /// Serializes the forwarded parameters in upstream's expected order.
    ///
    /// Values are the decoded strings the caller sent; encoding here uses the
    /// unreserved-safe scheme so `/`, `+` and `=` inside a service key reach
    /// upstream percent-encoded rather than bare.
    pub fn query_string(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(5);
        if let Some(service_key) = &self.service_key {
            pairs.push(("serviceKey", service_key));
        }
        pairs.push(("numOfRows", &self.num_of_rows));
        pairs.push(("pageNo", &self.page_no));
        pairs.push(("resultType", &self.result_type));
        if let Some(corp_name) = &self.corp_name {
            pairs.push(("corpNm", corp_name));
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Fetches outline response bodies from the registry.
///
/// Implementations return the raw body so the handler can parse it according
/// to the requested format; tests substitute canned bodies here.
#[async_trait]
pub trait OutlineProvider: Send + Sync {
    /// Forwards a lookup to the registry and returns the raw response body.
    ///
    /// # Errors
    ///
    /// - `RegistryError::Timeout` - If the configured timeout elapsed
    /// - `RegistryError::ErrorStatus` - If upstream answered non-2xx
    /// - `RegistryError::RequestFailed` - Any other transport failure
    async fn fetch_outline(&self, request: &OutlineRequest) -> Result<String, RegistryError>;
}
