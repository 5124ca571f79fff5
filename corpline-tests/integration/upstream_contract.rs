//! Outbound wire contract: query parameter order, percent encoding and the
//! fixed request header the upstream service expects.

use corpline_core::UpstreamConfig;
use corpline_registry::{OutlineProvider, OutlineRequest, RegistryClient, UPSTREAM_CONTENT_TYPE};
use tokio_test::assert_ok;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OUTLINE_PATH: &str = "/getCorpOutline_V2";

const EMPTY_ITEMS_JSON: &str = r#"{"body":{"items":{"item":[]}}}"#;

fn upstream_config(mock_server: &MockServer) -> UpstreamConfig {
    UpstreamConfig {
        base_url: format!("{}{}", mock_server.uri(), OUTLINE_PATH),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_forwarded_query_shape() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OUTLINE_PATH))
        .and(query_param("serviceKey", "Zq+ab/CD=="))
        .and(query_param("numOfRows", "25"))
        .and(query_param("pageNo", "3"))
        .and(query_param("resultType", "json"))
        .and(query_param("corpNm", "코리아"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_ITEMS_JSON))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(&upstream_config(&mock_server));
    let request = OutlineRequest {
        service_key: Some("Zq+ab/CD==".to_string()),
        num_of_rows: "25".to_string(),
        page_no: "3".to_string(),
        result_type: "json".to_string(),
        corp_name: Some("코리아".to_string()),
    };

    assert_ok!(client.fetch_outline(&request).await);

    // Raw query: fixed order, unreserved-safe encoding throughout.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some(
            "serviceKey=Zq%2Bab%2FCD%3D%3D&numOfRows=25&pageNo=3&resultType=json&corpNm=%EC%BD%94%EB%A6%AC%EC%95%84"
        )
    );
}

#[tokio::test]
async fn test_fixed_request_content_type() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OUTLINE_PATH))
        .and(header("Content-Type", UPSTREAM_CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_ITEMS_JSON))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(&upstream_config(&mock_server));

    // The header is fixed even when a JSON body is requested.
    assert_ok!(client.fetch_outline(&OutlineRequest::default()).await);
}

#[tokio::test]
async fn test_default_request_omits_optional_parameters() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OUTLINE_PATH))
        .and(query_param("numOfRows", "100"))
        .and(query_param("pageNo", "1"))
        .and(query_param("resultType", "json"))
        .and(query_param_is_missing("serviceKey"))
        .and(query_param_is_missing("corpNm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_ITEMS_JSON))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(&upstream_config(&mock_server));

    assert_ok!(client.fetch_outline(&OutlineRequest::default()).await);
}
