//! XML codec over loosely-typed JSON values.
//!
//! Upstream outline responses arrive as XML documents without attributes or
//! mixed content. Parsing follows the single-child convention: element text
//! becomes a string, repeated sibling elements collapse into an array, and a
//! lone child stays scalar. The writer produces the pretty-printed standalone
//! documents callers of the proxy expect, two-space indented with text inline
//! in its element.

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised by the XML value codec.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Document could not be parsed into a value tree.
    #[error("Invalid XML document: {reason}")]
    Parse { reason: String },

    /// Value tree could not be rendered as a document.
    #[error("Failed to build XML document: {reason}")]
    Build { reason: String },
}

struct Element {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    // Whitespace between child elements accumulates in `text`; once children
    // exist the element is structural and that text is discarded.
    fn into_named_value(self) -> (String, Value) {
        let Element {
            name,
            children,
            text,
        } = self;
        let value = if children.is_empty() {
            Value::String(text)
        } else {
            Value::Object(children)
        };
        (name, value)
    }
}

/// Adds a child value under `name`, promoting repeated siblings to an array.
fn insert_child(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.get_mut(&name) {
        Some(Value::Array(existing)) => existing.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(name, value);
        }
    }
}

/// Parses an XML document into a value tree keyed by the root element name.
///
/// Attributes are ignored; the upstream registry never emits them.
///
/// # Errors
///
/// - `XmlError::Parse` - If the document is malformed, has no root element,
///   or carries sibling roots or non-whitespace text outside the root.
pub fn document_from_str(xml: &str) -> Result<Value, XmlError> {
    let mut reader = Reader::from_str(xml.strip_prefix('\u{feff}').unwrap_or(xml));
    let mut stack = vec![Element::new(String::new())];

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Parse {
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(Element::new(name));
            }
            Event::Empty(empty) => {
                let name = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    insert_child(&mut parent.children, name, Value::String(String::new()));
                }
            }
            Event::Text(text) => {
                let unescaped = text.unescape().map_err(|e| XmlError::Parse {
                    reason: e.to_string(),
                })?;
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&unescaped);
                }
            }
            Event::CData(cdata) => {
                let raw = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&raw);
                }
            }
            Event::End(_) => {
                // Mismatched end tags are rejected by the reader before this
                // arm, so the popped element always matches the tag.
                if stack.len() > 1 {
                    let element = stack.pop();
                    if let (Some(element), Some(parent)) = (element, stack.last_mut()) {
                        let (name, value) = element.into_named_value();
                        insert_child(&mut parent.children, name, value);
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry no payload data.
            _ => {}
        }
    }

    let root = match stack.pop() {
        Some(root) if stack.is_empty() && !root.children.is_empty() => root,
        _ => {
            return Err(XmlError::Parse {
                reason: "missing or unclosed root element".to_string(),
            });
        }
    };

    // A well-formed document has exactly one root element and at most
    // whitespace around it.
    if !root.text.trim().is_empty() {
        return Err(XmlError::Parse {
            reason: "text outside the root element".to_string(),
        });
    }
    let repeated_root = matches!(root.children.values().next(), Some(Value::Array(_)));
    if root.children.len() > 1 || repeated_root {
        return Err(XmlError::Parse {
            reason: "multiple root elements".to_string(),
        });
    }

    Ok(Value::Object(root.children))
}

/// Renders a value tree as a pretty-printed standalone XML document.
///
/// The document value must be an object; each top-level key becomes a root
/// element. Arrays repeat their element name per entry, `null`, `{}` and the
/// empty string render as an empty element, and other scalars render as
/// inline text.
///
/// # Errors
///
/// - `XmlError::Build` - If the value is not an object or an event fails to
///   serialize.
pub fn document_to_string(document: &Value) -> Result<String, XmlError> {
    let root = match document {
        Value::Object(map) => map,
        _ => {
            return Err(XmlError::Build {
                reason: "document root must be an object".to_string(),
            });
        }
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(|e| build_error(&e))?;
    for (name, value) in root {
        write_element(&mut writer, name, value)?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Build {
        reason: e.to_string(),
    })
}

fn build_error(source: &dyn std::fmt::Display) -> XmlError {
    XmlError::Build {
        reason: source.to_string(),
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
) -> Result<(), XmlError> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Value::Object(children) if children.is_empty() => write_empty(writer, name),
        Value::Object(children) => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(|e| build_error(&e))?;
            for (child_name, child) in children {
                write_element(writer, child_name, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| build_error(&e))
        }
        Value::Null => write_empty(writer, name),
        Value::String(text) if text.is_empty() => write_empty(writer, name),
        Value::String(text) => write_text(writer, name, text),
        other => write_text(writer, name, &other.to_string()),
    }
}

fn write_empty<W: std::io::Write>(writer: &mut Writer<W>, name: &str) -> Result<(), XmlError> {
    writer
        .write_event(Event::Empty(BytesStart::new(name)))
        .map_err(|e| build_error(&e))
}

fn write_text<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), XmlError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| build_error(&e))?;
    writer
        .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
        .map_err(|e| build_error(&e))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| build_error(&e))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_single_child_stays_scalar() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <body>
    <items>
      <item>
        <corpNm>Acme</corpNm>
        <crno>1101110012345</crno>
      </item>
    </items>
  </body>
</response>"#;

        let doc = document_from_str(xml).unwrap();
        let item = &doc["response"]["body"]["items"]["item"];
        assert!(item.is_object());
        assert_eq!(item["corpNm"], json!("Acme"));
        assert_eq!(item["crno"], json!("1101110012345"));
    }

    #[test]
    fn test_parse_repeated_siblings_become_array() {
        let xml = "<items><item><corpNm>A</corpNm></item><item><corpNm>B</corpNm></item><item><corpNm>C</corpNm></item></items>";

        let doc = document_from_str(xml).unwrap();
        let item = &doc["items"]["item"];
        assert!(item.is_array());
        assert_eq!(item.as_array().unwrap().len(), 3);
        assert_eq!(item[1]["corpNm"], json!("B"));
    }

    #[test]
    fn test_parse_empty_elements_become_empty_strings() {
        let doc = document_from_str("<items><item/><other></other></items>").unwrap();

        assert_eq!(doc["items"]["item"], json!(""));
        assert_eq!(doc["items"]["other"], json!(""));
    }

    #[test]
    fn test_parse_resolves_entities() {
        let doc = document_from_str("<item><corpNm>Dong &amp; Sons &lt;Ltd&gt;</corpNm></item>")
            .unwrap();

        assert_eq!(doc["item"]["corpNm"], json!("Dong & Sons <Ltd>"));
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        let result = document_from_str("<response><body></response>");
        assert!(matches!(result, Err(XmlError::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_empty_document() {
        let result = document_from_str("");
        assert!(matches!(result, Err(XmlError::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_unclosed_document() {
        let result = document_from_str("<response><body>");
        assert!(matches!(result, Err(XmlError::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_sibling_root_elements() {
        let result = document_from_str("<header>00</header><body>ok</body>");
        assert!(matches!(result, Err(XmlError::Parse { .. })));

        // Same-named roots would otherwise collapse into one array entry.
        let result = document_from_str("<item>A</item><item>B</item>");
        assert!(matches!(result, Err(XmlError::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_text_outside_root() {
        let result = document_from_str("<response>ok</response>trailing");
        assert!(matches!(result, Err(XmlError::Parse { .. })));

        let result = document_from_str("leading<response>ok</response>");
        assert!(matches!(result, Err(XmlError::Parse { .. })));
    }

    #[test]
    fn test_parse_allows_whitespace_around_root() {
        let doc = document_from_str("\n<response>ok</response>\n  ").unwrap();
        assert_eq!(doc["response"], json!("ok"));
    }

    #[test]
    fn test_build_pretty_document() {
        let doc = json!({
            "response": {
                "header": {
                    "resultCode": "00",
                    "resultMsg": "NORMAL SERVICE"
                },
                "body": {
                    "items": {
                        "item": {
                            "corpNm": "Acme",
                            "crno": "123"
                        }
                    }
                }
            }
        });

        let rendered = document_to_string(&doc).unwrap();
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
    fn test_build_empty_object_renders_empty_element() {
        let doc = json!({ "items": { "item": {} } });

        let rendered = document_to_string(&doc).unwrap();
        assert!(rendered.contains("<item/>"));
        assert!(!rendered.contains("<item>"));
    }

    #[test]
    fn test_build_array_repeats_element_name() {
        let doc = json!({
            "items": {
                "item": [
                    { "corpNm": "A" },
                    { "corpNm": "B" }
                ]
            }
        });

        let rendered = document_to_string(&doc).unwrap();
        assert_eq!(rendered.matches("<item>").count(), 2);
        assert_eq!(rendered.matches("</item>").count(), 2);
    }

    #[test]
    fn test_build_escapes_text_payload() {
        let doc = json!({ "item": { "corpNm": "Dong & Sons <Ltd>" } });

        let rendered = document_to_string(&doc).unwrap();
        assert!(rendered.contains("<corpNm>Dong &amp; Sons &lt;Ltd&gt;</corpNm>"));
    }

    #[test]
    fn test_build_keeps_hangul_inline() {
        let doc = json!({ "item": { "corpNm": "삼성전자(주)" } });

        let rendered = document_to_string(&doc).unwrap();
        assert!(rendered.contains("<corpNm>삼성전자(주)</corpNm>"));
    }

    #[test]
    fn test_structure_survives_round_trip() {
        let doc = json!({
            "response": {
                "body": {
                    "items": {
                        "item": [
                            { "corpNm": "A", "crno": "1" },
                            { "corpNm": "B", "crno": "2" }
                        ]
                    }
                }
            }
        });

        let rendered = document_to_string(&doc).unwrap();
        let parsed = document_from_str(&rendered).unwrap();
        assert_eq!(parsed, doc);
    }
}
