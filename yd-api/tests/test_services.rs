//! Integration tests for the listing services and endpoint routing.

mod common;

use common::{test_client, MockTransport};
use yd_api::endpoints::ads::AdsQuery;
use yd_api::endpoints::agencyclients::AgencyClientsQuery;
use yd_api::endpoints::campaigns::CampaignsQuery;
use yd_api::{ApiClient, RawResponse, ReportRequest, ReportType};
use yd_core::config::ApiConfig;
use yd_core::error::YdError;

const OK: &str = r#"{"result":{}}"#;

async fn call_every_service(client: &ApiClient) {
    client
        .report(&ReportRequest::new("r", ReportType::AccountPerformance, ["Clicks"]))
        .await
        .unwrap();
    client
        .agency_clients(&AgencyClientsQuery::new(["Login"]))
        .await
        .unwrap();
    client.campaigns(&CampaignsQuery::default()).await.unwrap();
    client.ads(&AdsQuery::new(vec![1])).await.unwrap();
}

fn four_ok() -> Vec<RawResponse> {
    vec![
        RawResponse::new(200, ""),
        RawResponse::new(200, OK),
        RawResponse::new(200, OK),
        RawResponse::new(200, OK),
    ]
}

// ---- Endpoint routing ----

#[tokio::test]
async fn sandbox_flag_routes_every_service_to_sandbox() {
    let transport = MockTransport::new(four_ok());
    call_every_service(&test_client(transport.clone(), true)).await;

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api-sandbox.direct.yandex.com/json/v5/reports",
            "https://api-sandbox.direct.yandex.com/json/v5/agencyclients",
            "https://api-sandbox.direct.yandex.com/json/v5/campaigns",
            "https://api-sandbox.direct.yandex.com/json/v5/ads",
        ]
    );
}

#[tokio::test]
async fn production_is_default_for_every_service() {
    let transport = MockTransport::new(four_ok());
    call_every_service(&test_client(transport.clone(), false)).await;

    for request in transport.requests() {
        assert!(
            request.url.starts_with("https://api.direct.yandex.com/json/v5/"),
            "unexpected url {}",
            request.url
        );
        assert_eq!(request.header("Authorization"), Some("Bearer test-token"));
    }
}

// ---- Listing services ----

#[tokio::test]
async fn campaigns_sends_client_login_and_parses_result() {
    let body = r#"{"result":{"Campaigns":[{"Id":7,"Name":"Brand"}]}}"#;
    let transport = MockTransport::new(vec![RawResponse::new(200, body)]);
    let client = test_client(transport.clone(), false);

    let query = CampaignsQuery {
        client_login: Some("advertiser-1".into()),
        ..CampaignsQuery::default()
    };
    let resp = client.campaigns(&query).await.unwrap();

    assert!(resp.is_success());
    let result = resp.result.unwrap();
    assert_eq!(result["Campaigns"][0]["Id"], 7);

    let sent = &transport.requests()[0];
    assert_eq!(sent.header("Client-Login"), Some("advertiser-1"));
    assert_eq!(sent.body["method"], "get");
    assert_eq!(sent.body["params"]["FieldNames"], serde_json::json!(["Id", "Name"]));
}

#[tokio::test]
async fn default_client_login_from_config() {
    let transport = MockTransport::new(vec![RawResponse::new(200, OK)]);
    let config = ApiConfig {
        token: "t".into(),
        client_login: Some("from-config".into()),
        ..ApiConfig::default()
    };
    let client = ApiClient::with_transport(&config, transport.clone()).unwrap();

    client.campaigns(&CampaignsQuery::default()).await.unwrap();

    assert_eq!(transport.requests()[0].header("Client-Login"), Some("from-config"));
}

#[tokio::test]
async fn agency_clients_has_no_client_login() {
    let transport = MockTransport::new(vec![RawResponse::new(200, OK)]);
    let client = test_client(transport.clone(), false);

    client
        .agency_clients(&AgencyClientsQuery::new(["ClientId", "Login"]))
        .await
        .unwrap();

    let sent = &transport.requests()[0];
    assert_eq!(sent.header("Client-Login"), None);
    assert_eq!(sent.body["params"]["SelectionCriteria"]["Archived"], "NO");
}

#[tokio::test]
async fn listing_error_envelope_is_data() {
    let body = r#"{"error":{"request_id":"9","error_code":53,"error_string":"Authorization error","error_detail":"Invalid OAuth token"}}"#;
    let transport = MockTransport::new(vec![RawResponse::new(200, body)]);
    let client = test_client(transport.clone(), false);

    let resp = client.ads(&AdsQuery::new(vec![5, 6])).await.unwrap();

    assert!(!resp.is_success());
    assert_eq!(resp.status, 200);
    let err = resp.into_result().unwrap_err();
    assert_eq!(err.error_code, 53);
    assert_eq!(err.error_detail, "Invalid OAuth token");
}

#[tokio::test]
async fn listing_error_keeps_http_status() {
    let body = r#"{"error":{"request_id":"10","error_code":1000,"error_string":"Service temporarily unavailable"}}"#;
    let transport = MockTransport::new(vec![RawResponse::new(503, body)]);
    let client = test_client(transport.clone(), false);

    let resp = client.campaigns(&CampaignsQuery::default()).await.unwrap();

    assert_eq!(resp.status, 503);
    assert_eq!(resp.into_result().unwrap_err().error_code, 1000);
}

#[tokio::test]
async fn listing_pending_status_is_not_polled() {
    let transport = MockTransport::new(vec![
        RawResponse::new(202, OK).with_header("retryIn", "1"),
        RawResponse::new(200, OK),
    ]);
    let client = test_client(transport.clone(), false);

    client.campaigns(&CampaignsQuery::default()).await.unwrap();

    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn listing_non_json_body_is_serialization_error() {
    let transport = MockTransport::new(vec![RawResponse::new(502, "<html>Bad Gateway</html>")]);
    let client = test_client(transport.clone(), false);

    let err = client.campaigns(&CampaignsQuery::default()).await.unwrap_err();

    assert!(matches!(err, YdError::Serialization(_)));
}

#[tokio::test]
async fn ads_without_campaigns_is_rejected() {
    let transport = MockTransport::new(vec![]);
    let client = test_client(transport.clone(), false);

    let err = client.ads(&AdsQuery::new(vec![])).await.unwrap_err();

    assert!(matches!(err, YdError::InvalidRequest(_)));
    assert_eq!(transport.request_count(), 0);
}
