//! Complete lookup workflow: a caller hits the live proxy, the proxy calls
//! the upstream registry, and the caller gets the re-filtered envelope back.

use std::net::SocketAddr;
use std::sync::Arc;

use corpline_core::CorplineConfig;
use corpline_registry::RegistryClient;
use corpline_web::handlers::LOOKUP_FAILED_BODY;
use corpline_web::{AppState, build_router};
use tokio_test::assert_ok;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OUTLINE_PATH: &str = "/getCorpOutline_V2";

const TWO_COMPANY_JSON: &str = r#"{"body":{"items":{"item":[{"corpNm":"삼성전자(주)","crno":"1301110006246"},{"corpNm":"현대자동차(주)","crno":"1101110124150"}]}}}"#;

/// Boots the proxy on an ephemeral port, pointed at the given upstream.
async fn spawn_proxy(upstream_url: String) -> SocketAddr {
    let mut config = CorplineConfig::for_testing();
    config.upstream.base_url = upstream_url;

    let state = AppState {
        provider: Arc::new(RegistryClient::new(&config.upstream)),
    };
    let app = build_router(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn outline_url(mock_server: &MockServer) -> String {
    format!("{}{}", mock_server.uri(), OUTLINE_PATH)
}

#[tokio::test]
async fn test_json_lookup_workflow() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OUTLINE_PATH))
        .and(query_param("corpNm", "삼성"))
        .and(query_param("numOfRows", "100"))
        .and(query_param("pageNo", "1"))
        .and(query_param("resultType", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_COMPANY_JSON))
        .expect(1)
        .mount(&mock_server)
        .await;

    let addr = spawn_proxy(outline_url(&mock_server)).await;

    // corpNm=삼성; upstream matched loosely, the proxy re-filters.
    let url = format!("http://{addr}/corp?corpNm=%EC%82%BC%EC%84%B1");
    let response = assert_ok!(reqwest::get(&url).await);

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body = response.text().await.unwrap();
    assert_eq!(
        body,
        r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL SERVICE"},"body":{"items":[{"corpNm":"삼성전자(주)","crno":"1301110006246"}]}}}"#
    );
}

#[tokio::test]
async fn test_xml_lookup_workflow() {
    let mock_server = MockServer::start().await;
    let upstream_body = "<response><body><items><item><corpNm>Acme</corpNm><crno>11</crno></item><item><corpNm>Apex</corpNm><crno>22</crno></item></items></body></response>";
    Mock::given(method("GET"))
        .and(path(OUTLINE_PATH))
        .and(query_param("resultType", "xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(upstream_body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let addr = spawn_proxy(outline_url(&mock_server)).await;

    let url = format!("http://{addr}/corp?resultType=xml");
    let response = assert_ok!(reqwest::get(&url).await);

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/xml");
    let body = response.text().await.unwrap();
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
        <crno>11</crno>
      </item>
      <item>
        <corpNm>Apex</corpNm>
        <crno>22</crno>
      </item>
    </items>
  </body>
</response>"#;
    assert_eq!(body, expected);
}

#[tokio::test]
async fn test_registration_filter_never_reaches_upstream() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OUTLINE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_COMPANY_JSON))
        .expect(1)
        .mount(&mock_server)
        .await;

    let addr = spawn_proxy(outline_url(&mock_server)).await;

    let url = format!("http://{addr}/corp?crno=1101110124150");
    let response = assert_ok!(reqwest::get(&url).await);
    assert_eq!(response.status(), 200);

    let document: serde_json::Value = response.json().await.unwrap();
    let items = document["response"]["body"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["corpNm"], "현대자동차(주)");

    // The registration number filters locally only.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.query().unwrap().contains("crno"));
}

#[tokio::test]
async fn test_service_key_forwarded_percent_encoded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OUTLINE_PATH))
        .and(query_param("serviceKey", "Zq+ab/CD=="))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"body":{"items":{"item":[]}}}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let addr = spawn_proxy(outline_url(&mock_server)).await;

    let url = format!("http://{addr}/corp?serviceKey=Zq%2Bab%2FCD%3D%3D");
    let response = assert_ok!(reqwest::get(&url).await);

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert_eq!(
        body,
        r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL SERVICE"},"body":{"items":[]}}}"#
    );

    // The credential crosses the wire re-encoded, never bare.
    let requests = mock_server.received_requests().await.unwrap();
    assert!(
        requests[0]
            .url
            .query()
            .unwrap()
            .contains("serviceKey=Zq%2Bab%2FCD%3D%3D")
    );
}

#[tokio::test]
async fn test_unreachable_upstream_maps_to_fixed_error() {
    // Reserve a port, then free it so the connection is refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let addr = spawn_proxy(format!("http://127.0.0.1:{port}/outline")).await;

    let url = format!("http://{addr}/corp");
    let response = assert_ok!(reqwest::get(&url).await);

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), LOOKUP_FAILED_BODY);
}

#[tokio::test]
async fn test_upstream_error_status_maps_to_fixed_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OUTLINE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let addr = spawn_proxy(outline_url(&mock_server)).await;

    let url = format!("http://{addr}/corp");
    let response = assert_ok!(reqwest::get(&url).await);

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), LOOKUP_FAILED_BODY);
}
