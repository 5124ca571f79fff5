//! Response envelope assembly.
//!
//! Every successful lookup, including an empty one, is wrapped in the fixed
//! `{header, body}` envelope the upstream service uses, with the result code
//! always reporting success. The JSON and XML bodies differ deliberately:
//! JSON always carries an array, XML collapses the way upstream documents do.

use serde_json::{Value, json};

use crate::xml::{self, XmlError};

/// Result code reported on every proxy response.
pub const RESULT_CODE_OK: &str = "00";

/// Result message reported on every proxy response.
pub const RESULT_MSG_OK: &str = "NORMAL SERVICE";

fn header() -> Value {
    json!({
        "resultCode": RESULT_CODE_OK,
        "resultMsg": RESULT_MSG_OK
    })
}

/// Builds the JSON response document.
///
/// `body.items` is always an array, whatever the upstream shape was.
pub fn json_document(records: Vec<Value>) -> Value {
    json!({
        "response": {
            "header": header(),
            "body": {
                "items": records
            }
        }
    })
}

/// Renders the XML response document.
///
/// `body.items.item` keeps the upstream XML asymmetry: a sequence of
/// elements for several records, the bare record for exactly one, and an
/// empty `<item/>` placeholder for none.
///
/// # Errors
///
/// - `XmlError::Build` - If the document fails to serialize.
pub fn xml_document(records: Vec<Value>) -> Result<String, XmlError> {
    let document = json!({
        "response": {
            "header": header(),
            "body": {
                "items": {
                    "item": collapse(records)
                }
            }
        }
    });
    xml::document_to_string(&document)
}

// The single-record case also covers a lone falsy leftover (an empty string
// record renders as the same empty element the zero case produces).
fn collapse(mut records: Vec<Value>) -> Value {
    match records.len() {
        0 => json!({}),
        1 => records.remove(0),
        _ => Value::Array(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_document_shape() {
        let records = vec![json!({ "corpNm": "Acme", "crno": "123" })];

        let document = json_document(records);

        assert_eq!(document["response"]["header"]["resultCode"], json!("00"));
        assert_eq!(
            document["response"]["header"]["resultMsg"],
            json!("NORMAL SERVICE")
        );
        let items = &document["response"]["body"]["items"];
        assert!(items.is_array());
        assert_eq!(items[0]["corpNm"], json!("Acme"));
    }

    #[test]
    fn test_json_document_serializes_in_envelope_order() {
        let rendered = serde_json::to_string(&json_document(Vec::new())).unwrap();

        assert_eq!(
            rendered,
            r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL SERVICE"},"body":{"items":[]}}}"#
        );
    }

    #[test]
    fn test_json_items_is_array_even_for_one_record() {
        let document = json_document(vec![json!({ "corpNm": "Solo" })]);

        let items = &document["response"]["body"]["items"];
        assert!(items.is_array());
        assert_eq!(items.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_xml_document_unwraps_single_record() {
        let rendered = xml_document(vec![json!({ "corpNm": "Acme", "crno": "123" })]).unwrap();

        let expected = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<response>
  <header>
    <resultCode>00</resultCode>
    <resultMsg>NORMAL SERVICE</resultMsg>
  </header>
  <body>
    <items>
      <item>
        <corpNm>Acme</corpNm>
        <crno>123</crno>
      </item>
    </items>
  </body>
</response>"#;
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_xml_document_repeats_item_for_many_records() {
        let rendered = xml_document(vec![
            json!({ "corpNm": "A" }),
            json!({ "corpNm": "B" }),
        ])
        .unwrap();

        assert_eq!(rendered.matches("<item>").count(), 2);
        assert!(rendered.contains("<corpNm>A</corpNm>"));
        assert!(rendered.contains("<corpNm>B</corpNm>"));
    }

    #[test]
    fn test_xml_document_renders_placeholder_when_empty() {
        let rendered = xml_document(Vec::new()).unwrap();

        assert!(rendered.contains("<item/>"));
        assert!(rendered.contains("<resultCode>00</resultCode>"));
        assert!(!rendered.contains("<item>"));
    }
}
