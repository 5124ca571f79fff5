//! Upstream payload ingestion.
//!
//! Normalizes the two upstream body formats into one record sequence. The
//! upstream service collapses a single result to a bare object and omits the
//! node entirely when nothing matched; both shapes are resolved here so the
//! rest of the pipeline only ever sees `Vec<Value>`.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::xml::{self, XmlError};

/// Path to the record node in XML documents.
const XML_ITEM_PATH: &[&str] = &["response", "body", "items", "item"];

/// Path to the record node in JSON documents.
///
/// JSON bodies are read from the top-level `body`, without the `response`
/// wrapper XML documents carry; a wrapped JSON body therefore yields no
/// records. Callers depend on that outcome, so the path must not be unified
/// with the XML one.
const JSON_ITEM_PATH: &[&str] = &["body", "items", "item"];

/// Body format of an upstream response, selected by the `resultType`
/// query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    /// JSON body, the default.
    Json,
    /// XML body, selected by the exact parameter value `xml`.
    Xml,
}

impl ResultType {
    /// Resolves the format from the raw `resultType` parameter.
    ///
    /// Only the exact string `xml` selects the XML path; every other value,
    /// including casing variants, falls back to JSON.
    pub fn from_param(param: &str) -> Self {
        if param == "xml" {
            ResultType::Xml
        } else {
            ResultType::Json
        }
    }

    /// Content type of a proxy response in this format.
    pub fn content_type(self) -> &'static str {
        match self {
            ResultType::Json => "application/json",
            ResultType::Xml => "application/xml",
        }
    }
}

/// Errors raised while ingesting an upstream payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Body was not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Body was not a valid XML document.
    #[error("Invalid XML payload: {0}")]
    Xml(#[from] XmlError),
}

/// Extracts the record sequence from an upstream response body.
///
/// A missing node, `null`, or the empty string an empty XML element parses
/// to all yield an empty sequence; a bare record is wrapped into a
/// single-element sequence.
///
/// # Errors
///
/// - `PayloadError::Json` - If a JSON body fails to parse.
/// - `PayloadError::Xml` - If an XML body fails to parse.
pub fn parse_records(body: &str, result_type: ResultType) -> Result<Vec<Value>, PayloadError> {
    let node = match result_type {
        ResultType::Xml => {
            let document = xml::document_from_str(body)?;
            lookup_path(&document, XML_ITEM_PATH).cloned()
        }
        ResultType::Json => {
            let document: Value = serde_json::from_str(body)?;
            lookup_path(&document, JSON_ITEM_PATH).cloned()
        }
    };

    let records = into_sequence(node);
    debug!(count = records.len(), "parsed upstream records");
    Ok(records)
}

fn lookup_path<'a>(document: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(document, |node, key| node.get(key))
}

fn into_sequence(node: Option<Value>) -> Vec<Value> {
    match node {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(text)) if text.is_empty() => Vec::new(),
        Some(Value::Array(records)) => records,
        Some(record) => vec![record],
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_result_type_requires_exact_xml() {
        assert_eq!(ResultType::from_param("xml"), ResultType::Xml);
        assert_eq!(ResultType::from_param("json"), ResultType::Json);
        assert_eq!(ResultType::from_param("XML"), ResultType::Json);
        assert_eq!(ResultType::from_param(""), ResultType::Json);
        assert_eq!(ResultType::from_param("xml "), ResultType::Json);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(ResultType::Json.content_type(), "application/json");
        assert_eq!(ResultType::Xml.content_type(), "application/xml");
    }

    #[test]
    fn test_json_records_from_array() {
        let body = json!({
            "body": {
                "items": {
                    "item": [
                        { "corpNm": "A" },
                        { "corpNm": "B" }
                    ]
                }
            }
        })
        .to_string();

        let records = parse_records(&body, ResultType::Json).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["corpNm"], json!("A"));
    }

    #[test]
    fn test_json_bare_record_is_wrapped() {
        let body = json!({
            "body": { "items": { "item": { "corpNm": "Solo" } } }
        })
        .to_string();

        let records = parse_records(&body, ResultType::Json).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["corpNm"], json!("Solo"));
    }

    #[test]
    fn test_json_missing_node_yields_empty() {
        for body in [
            json!({}).to_string(),
            json!({ "body": {} }).to_string(),
            json!({ "body": { "items": {} } }).to_string(),
            json!({ "body": { "items": { "item": null } } }).to_string(),
            // Wrapped responses miss the top-level lookup on purpose
            json!({ "response": { "body": { "items": { "item": [{ "corpNm": "A" }] } } } })
                .to_string(),
        ] {
            let records = parse_records(&body, ResultType::Json).unwrap();
            assert!(records.is_empty(), "expected no records for {body}");
        }
    }

    #[test]
    fn test_json_rejects_malformed_body() {
        let result = parse_records("<response></response>", ResultType::Json);
        assert!(matches!(result, Err(PayloadError::Json(_))));
    }

    #[test]
    fn test_xml_records_from_siblings() {
        let body = "<response><body><items>\
<item><corpNm>A</corpNm></item>\
<item><corpNm>B</corpNm></item>\
</items></body></response>";

        let records = parse_records(body, ResultType::Xml).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["corpNm"], json!("B"));
    }

    #[test]
    fn test_xml_bare_record_is_wrapped() {
        let body =
            "<response><body><items><item><corpNm>Solo</corpNm></item></items></body></response>";

        let records = parse_records(body, ResultType::Xml).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["corpNm"], json!("Solo"));
    }

    #[test]
    fn test_xml_empty_item_element_yields_empty() {
        let body = "<response><body><items><item/></items></body></response>";

        let records = parse_records(body, ResultType::Xml).unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_xml_error_document_yields_empty() {
        // Auth failures come back as a different document shape; they carry
        // no items node and must not be mistaken for a parse failure.
        let body = "<OpenAPI_ServiceResponse>\
<cmmMsgHeader>\
<errMsg>SERVICE ERROR</errMsg>\
<returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
</cmmMsgHeader>\
</OpenAPI_ServiceResponse>";

        let records = parse_records(body, ResultType::Xml).unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_xml_rejects_malformed_body() {
        let result = parse_records("{\"body\": {}}", ResultType::Xml);
        assert!(matches!(result, Err(PayloadError::Xml(_))));
    }
}
