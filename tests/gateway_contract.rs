//! Request gateway against a stub API.

use serde_json::json;
use std::time::Duration;

use bloody_client::gateway::{Action, ActionRequest, ApiGateway, GatewayError, Method, X_REQUEST_ID};

mod common;

#[tokio::test]
async fn test_get_returns_exact_stub_object() {
    let stub = common::start_stub_api().await;
    let payload = json!({
        "success": true,
        "message": "",
        "data": [{"id": 1, "nombre_completo": "Ana", "tipo_sangre": "O+", "telefono": "555"}]
    });
    stub.respond_json("get_donantes", 200, payload.clone());

    let response = stub.gateway().call("get_donantes", Method::Get, None, "").await.unwrap();
    assert_eq!(response, payload);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, axum::http::Method::GET);
    assert_eq!(requests[0].uri.path(), common::ENDPOINT_PATH);
    assert_eq!(requests[0].uri.query(), Some("action=get_donantes"));
}

#[tokio::test]
async fn test_get_never_sends_body() {
    let stub = common::start_stub_api().await;
    stub.respond_json("get_faqs", 200, json!({"success": true, "message": "", "data": []}));

    stub.gateway()
        .call("get_faqs", Method::Get, Some(json!({"ignored": true})), "")
        .await
        .unwrap();

    let request = &stub.requests()[0];
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn test_json_headers_and_request_id() {
    let stub = common::start_stub_api().await;
    stub.respond_json("get_faqs", 200, json!({"success": true, "message": ""}));

    stub.gateway().call("get_faqs", Method::Get, None, "").await.unwrap();

    let headers = &stub.requests()[0].headers;
    assert_eq!(headers.get("content-type").unwrap(), "application/json");
    assert_eq!(headers.get("accept").unwrap(), "application/json");
    let request_id = headers.get(X_REQUEST_ID).unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_post_body_round_trips() {
    let stub = common::start_stub_api().await;
    stub.respond_json("add_cita", 200, json!({"success": true, "message": "Cita agendada"}));
    let body = json!({
        "donante_id": 12,
        "centro_salud_id": 3,
        "fecha_hora": "2026-11-02T10:00",
        "notas": null,
        "extra": {"ayuno": true, "tags": ["a", "b"]}
    });

    stub.gateway()
        .call("add_cita", Method::Post, Some(body.clone()), "")
        .await
        .unwrap();

    let request = &stub.requests()[0];
    assert_eq!(request.method, axum::http::Method::POST);
    assert_eq!(request.json(), body);
}

#[tokio::test]
async fn test_query_is_appended_verbatim() {
    let stub = common::start_stub_api().await;
    stub.respond_json("get_citas_by_centro", 200, json!({"success": true, "message": "", "data": []}));

    stub.gateway()
        .call("get_citas_by_centro", Method::Get, None, "centro_id=4&estado=pendiente")
        .await
        .unwrap();

    let request = &stub.requests()[0];
    assert_eq!(
        request.uri.query(),
        Some("action=get_citas_by_centro&centro_id=4&estado=pendiente")
    );
    assert_eq!(request.query_param("estado").as_deref(), Some("pendiente"));
}

#[tokio::test]
async fn test_unknown_action_is_sent_verbatim() {
    let stub = common::start_stub_api().await;
    stub.respond_json("export_report", 200, json!({"success": true, "message": "ok"}));

    let request = ActionRequest::new("export_report".parse::<Action>().unwrap(), Method::Post)
        .json(&json!({"formato": "csv"}))
        .unwrap();
    let response = stub.gateway().send(&request).await.unwrap();

    assert_eq!(response["message"], "ok");
    assert_eq!(stub.requests()[0].action().as_deref(), Some("export_report"));
}

#[tokio::test]
async fn test_login_401_with_message() {
    let stub = common::start_stub_api().await;
    stub.respond_json("login", 401, json!({"message": "bad credentials"}));

    let err = stub
        .gateway()
        .call("login", Method::Post, Some(json!({"email": "a@b.mx", "password": "x"})), "")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    let text = err.to_string();
    assert!(text.contains("401"));
    assert!(text.contains("bad credentials"));
    assert_eq!(text, "HTTP error! Status: 401, Message: bad credentials");
}

#[tokio::test]
async fn test_error_json_without_message() {
    let stub = common::start_stub_api().await;
    stub.respond_json("get_all_users", 403, json!({"success": false}));

    let err = stub.gateway().call("get_all_users", Method::Get, None, "").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! Status: 403");
}

#[tokio::test]
async fn test_error_non_json_body_is_truncated() {
    let stub = common::start_stub_api().await;
    let html = format!("<html>{}</html>", "x".repeat(500));
    stub.respond("get_inventario", 500, html.clone());

    let err = stub.gateway().call("get_inventario", Method::Get, None, "").await.unwrap_err();
    let text = err.to_string();

    assert!(text.starts_with("HTTP error! Status: 500, Raw Response: "));
    assert!(text.contains("No es JSON"));
    let excerpt: String = html.chars().take(200).collect();
    assert!(text.contains(&excerpt));
    assert!(!text.contains(&html.chars().take(201).collect::<String>()));
}

#[tokio::test]
async fn test_declared_failure_is_ok() {
    let stub = common::start_stub_api().await;
    stub.respond_json("confirm_cita", 200, json!({"success": false, "message": "Cita no encontrada"}));

    let response = stub
        .gateway()
        .call("confirm_cita", Method::Post, Some(json!({"cita_id": 99})), "")
        .await
        .unwrap();
    assert_eq!(response["success"], false);
    assert_eq!(response["message"], "Cita no encontrada");
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let stub = common::start_stub_api().await;
    stub.respond("get_faqs", 200, "{\"success\": tru");

    let err = stub.gateway().call("get_faqs", Method::Get, None, "").await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode { .. }));
    assert_eq!(err.kind(), "decode_error");
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let stub = common::start_stub_api().await;
    stub.respond_json("get_inventario", 200, json!({"success": true, "message": "", "data": []}));
    stub.delay("get_inventario", Duration::from_secs(3));

    let mut config = stub.api_config();
    config.timeout_secs = 1;
    let gateway = ApiGateway::new(&config).unwrap();

    let started = std::time::Instant::now();
    let err = gateway.call("get_inventario", Method::Get, None, "").await.unwrap_err();

    assert!(matches!(err, GatewayError::Timeout { secs: 1, .. }), "unexpected error {:?}", err);
    assert_eq!(err.kind(), "timeout");
    assert_eq!(err.status(), None);
    assert!(started.elapsed() < Duration::from_secs(3));
}
