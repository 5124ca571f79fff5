//! Lookup pipeline tests: fetch from a mock upstream, parse, filter and
//! assemble the response envelope, asserting on exact output documents.

use corpline_core::{RecordFilter, UpstreamConfig, envelope, parse_records};
use corpline_registry::{OutlineProvider, OutlineRequest, RegistryClient};
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OUTLINE_PATH: &str = "/getCorpOutline_V2";

const TWO_COMPANY_JSON: &str = r#"{"body":{"items":{"item":[{"corpNm":"삼성전자(주)","crno":"1301110006246"},{"corpNm":"신세계(주)","crno":"1101110013350"}]}}}"#;

fn upstream_config(mock_server: &MockServer) -> UpstreamConfig {
    UpstreamConfig {
        base_url: format!("{}{}", mock_server.uri(), OUTLINE_PATH),
        ..Default::default()
    }
}

async fn mount_upstream(mock_server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(OUTLINE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_json_lookup_pipeline() {
    let mock_server = MockServer::start().await;
    mount_upstream(&mock_server, TWO_COMPANY_JSON).await;

    let client = RegistryClient::new(&upstream_config(&mock_server));
    let request = OutlineRequest {
        corp_name: Some("삼성".to_string()),
        ..Default::default()
    };

    let raw = assert_ok!(client.fetch_outline(&request).await);
    let records = parse_records(&raw, request.result_type()).unwrap();
    let matched = RecordFilter::new(Some("삼성"), None).apply(records);

    let document = envelope::json_document(matched);
    assert_eq!(
        serde_json::to_string(&document).unwrap(),
        r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL SERVICE"},"body":{"items":[{"corpNm":"삼성전자(주)","crno":"1301110006246"}]}}}"#
    );
}

#[tokio::test]
async fn test_xml_lookup_pipeline() {
    let mock_server = MockServer::start().await;
    let body =
        "<response><body><items><item><corpNm>Acme</corpNm><crno>42</crno></item></items></body></response>";
    mount_upstream(&mock_server, body).await;

    let client = RegistryClient::new(&upstream_config(&mock_server));
    let request = OutlineRequest {
        result_type: "xml".to_string(),
        ..Default::default()
    };

    let raw = assert_ok!(client.fetch_outline(&request).await);
    let records = parse_records(&raw, request.result_type()).unwrap();

    // The bare XML record was normalized at ingestion, so the filter applies
    // to it like to any sequence.
    let matched = RecordFilter::new(Some("Acme"), None).apply(records);

    let document = envelope::xml_document(matched).unwrap();
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
        <crno>42</crno>
      </item>
    </items>
  </body>
</response>"#;
    assert_eq!(document, expected);
}

// Upstream reports auth and quota failures as 200s carrying an error
// document; those parse to zero records rather than a transport error.
#[tokio::test]
async fn test_error_document_yields_empty_results() {
    let mock_server = MockServer::start().await;
    let body = "<OpenAPI_ServiceResponse><cmmMsgHeader><errMsg>SERVICE ERROR</errMsg><returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg><returnReasonCode>30</returnReasonCode></cmmMsgHeader></OpenAPI_ServiceResponse>";
    mount_upstream(&mock_server, body).await;

    let client = RegistryClient::new(&upstream_config(&mock_server));
    let request = OutlineRequest {
        result_type: "xml".to_string(),
        ..Default::default()
    };

    let raw = assert_ok!(client.fetch_outline(&request).await);
    let records = parse_records(&raw, request.result_type()).unwrap();
    assert!(records.is_empty());

    let document = envelope::xml_document(records).unwrap();
    assert!(document.contains("<item/>"));
}

#[tokio::test]
async fn test_registration_filter_runs_after_fetch() {
    let mock_server = MockServer::start().await;
    mount_upstream(&mock_server, TWO_COMPANY_JSON).await;

    let client = RegistryClient::new(&upstream_config(&mock_server));
    let request = OutlineRequest::default();

    let raw = assert_ok!(client.fetch_outline(&request).await);
    let records = parse_records(&raw, request.result_type()).unwrap();
    assert_eq!(records.len(), 2);

    let matched = RecordFilter::new(None, Some("1101110013350")).apply(records);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["corpNm"], "신세계(주)");
}
