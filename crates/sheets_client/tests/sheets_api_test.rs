//! Sheets client against a mock Sheets API

use std::sync::Arc;

use delivery_state::{RowLocator, TabularStore};
use serde_json::json;
use sheets_client::{ServiceAccountAuth, ServiceAccountKey, SheetsClient, StaticToken};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SPREADSHEET: &str = "sheet-id";

fn client_for(server: &MockServer) -> SheetsClient {
    SheetsClient::new(SPREADSHEET, Arc::new(StaticToken("ya29.test".to_string())))
        .with_api_base(server.uri())
}

async fn mount_metadata(server: &MockServer, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/spreadsheets/{}", SPREADSHEET)))
        .and(query_param("fields", "sheets.properties.title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [
                {"properties": {"title": title}},
                {"properties": {"title": "Archivo"}}
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn lists_rows_of_first_worksheet() {
    let server = MockServer::start().await;
    mount_metadata(&server, "Entregas").await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/spreadsheets/sheet-id/values/.*Entregas.*$"))
        .and(header("authorization", "Bearer ya29.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Entregas!A1:D3",
            "majorDimension": "ROWS",
            "values": [
                ["DNI", "Nombre", "Entregado", "Fecha"],
                ["12345678Z", "Ana", "FALSE"],
                ["87654321X", "Luis", "TRUE", "2024-05-01 09:30:00"]
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let rows = client.list_rows().await.expect("rows");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].locator, RowLocator(2));
    assert_eq!(rows[0].get("Nombre"), "Ana");
    assert_eq!(rows[1].get("Entregado"), "TRUE");

    // The worksheet title is resolved once and reused.
    client.list_rows().await.expect("rows again");
}

#[tokio::test]
async fn writes_flag_and_timestamp_in_one_range() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/spreadsheets/sheet-id/values/.*Sheet1.*!C5:D5$"))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(body_json(json!({
            "range": "'Sheet1'!C5:D5",
            "majorDimension": "ROWS",
            "values": [["TRUE", "2024-05-01 10:00:00"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": SPREADSHEET,
            "updatedRange": "Sheet1!C5:D5",
            "updatedCells": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_sheet_title("Sheet1");
    client
        .write_cells(
            RowLocator(5),
            3,
            vec!["TRUE".to_string(), "2024-05-01 10:00:00".to_string()],
        )
        .await
        .expect("write");
}

#[tokio::test]
async fn api_errors_become_store_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/spreadsheets/sheet-id/values/.*$"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "The caller does not have permission",
                "status": "PERMISSION_DENIED"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).with_sheet_title("Sheet1");
    let err = client.list_rows().await.expect_err("forbidden");
    assert!(err.to_string().contains("does not have permission"));
}

#[tokio::test]
async fn spreadsheet_without_worksheets_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/spreadsheets/{}", SPREADSHEET)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.list_rows().await.is_err());
}

#[tokio::test]
async fn service_account_token_is_exchanged_once_and_cached() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.service",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/spreadsheets/sheet-id/values/.*$"))
        .and(header("authorization", "Bearer ya29.service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["DNI", "Nombre", "Entregado"]]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let key = ServiceAccountKey::from_json(
        &json!({
            "type": "service_account",
            "client_email": "bot@demo.iam.gserviceaccount.com",
            "private_key": include_str!("fixtures/test_service_account.pem"),
            "token_uri": format!("{}/token", server.uri())
        })
        .to_string(),
    )
    .expect("key");

    let http = Arc::new(reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build());
    let auth = ServiceAccountAuth::new(http, key).expect("auth");
    let client = SheetsClient::new(SPREADSHEET, Arc::new(auth))
        .with_api_base(server.uri())
        .with_sheet_title("Sheet1");

    assert!(client.list_rows().await.expect("rows").is_empty());
    assert!(client.list_rows().await.expect("rows").is_empty());
}

#[tokio::test]
async fn rejected_token_request_fails_the_read() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;

    let key = ServiceAccountKey::from_json(
        &json!({
            "client_email": "bot@demo.iam.gserviceaccount.com",
            "private_key": include_str!("fixtures/test_service_account.pem"),
            "token_uri": format!("{}/token", server.uri())
        })
        .to_string(),
    )
    .expect("key");

    let http = Arc::new(reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build());
    let client = SheetsClient::new(SPREADSHEET, Arc::new(ServiceAccountAuth::new(http, key).expect("auth")))
        .with_api_base(server.uri())
        .with_sheet_title("Sheet1");

    let err = client.list_rows().await.expect_err("auth failure");
    assert!(err.to_string().contains("invalid_grant"));
}
