//! Login persistence and role gating end to end.

use serde_json::json;
use std::sync::Arc;

use bloody_client::api::{Credentials, FormFields};
use bloody_client::pages::{App, History, Page, Tone};
use bloody_client::session::{FileStore, IdentityStore, MemoryStore, SessionStore};
use bloody_client::{BloodBankApi, Identity, UserType};

mod common;

fn login_ok(user_id: serde_json::Value, user_type: &str) -> serde_json::Value {
    json!({
        "success": true,
        "message": "Inicio de sesión exitoso.",
        "user_id": user_id,
        "user_type": user_type
    })
}

#[tokio::test]
async fn test_login_without_remember_uses_tab_scoped_store() {
    let stub = common::start_stub_api().await;
    stub.respond_json("login", 200, login_ok(json!(7), "donante"));
    let (app, history) = stub.app();

    let view = app.login(&Credentials::new("ana@correo.mx", "secreto"), false).await;

    let status = view.status.clone().unwrap();
    assert_eq!(status.tone, Tone::Success);
    assert_eq!(status.text, "Inicio de sesión exitoso. Redirigiendo...");
    assert_eq!(app.sessions().tab_scoped().load().unwrap(), Some(Identity::new(7, UserType::Donante)));
    assert_eq!(app.sessions().remembered().load().unwrap(), None);

    assert_eq!(app.follow(&view).await, Some(Page::DonorProfile));
    assert_eq!(history.current(), Some(Page::DonorProfile));

    let body = stub.requests_for("login")[0].json();
    assert_eq!(body, json!({"email": "ana@correo.mx", "password": "secreto"}));
}

#[tokio::test]
async fn test_login_with_remember_uses_remembered_store_only() {
    let stub = common::start_stub_api().await;
    stub.respond_json("login", 200, login_ok(json!("3"), "centro_salud"));
    let (app, _) = stub.app();
    let earlier = Identity::new(1, UserType::Admin);
    app.sessions().tab_scoped().save(&earlier).unwrap();

    let view = app.login(&Credentials::new("centro@correo.mx", "x"), true).await;

    assert_eq!(view.redirect.map(|r| r.target), Some(Page::CenterWorkspace));
    assert_eq!(
        app.sessions().remembered().load().unwrap(),
        Some(Identity::new(3, UserType::CentroSalud))
    );
    // The other tier is left as it was
    assert_eq!(app.sessions().tab_scoped().load().unwrap(), Some(earlier));
}

#[tokio::test]
async fn test_login_with_unknown_role_persists_nothing() {
    let stub = common::start_stub_api().await;
    stub.respond_json("login", 200, login_ok(json!(5), "auditor"));
    let (app, _) = stub.app();

    let view = app.login(&Credentials::new("x@correo.mx", "x"), true).await;

    assert_eq!(view.redirect.map(|r| r.target), Some(Page::Index));
    assert_eq!(app.sessions().current_identity(), None);
}

#[tokio::test]
async fn test_login_declared_failure_shows_message() {
    let stub = common::start_stub_api().await;
    stub.respond_json("login", 200, json!({"success": false, "message": "Contraseña incorrecta."}));
    let (app, _) = stub.app();

    let view = app.login(&Credentials::new("x@correo.mx", "mal"), false).await;

    let status = view.status.unwrap();
    assert_eq!(status.tone, Tone::Error);
    assert_eq!(status.text, "Contraseña incorrecta.");
    assert!(view.redirect.is_none());
    assert_eq!(app.sessions().current_identity(), None);
}

#[tokio::test]
async fn test_login_http_error_shows_generic_status() {
    let stub = common::start_stub_api().await;
    stub.respond_json("login", 401, json!({"message": "bad credentials"}));
    let (app, _) = stub.app();

    let view = app.login(&Credentials::new("x@correo.mx", "mal"), false).await;

    let status = view.status.unwrap();
    assert_eq!(status.text, "Error de red o servidor. Inténtalo más tarde.");
    assert!(!status.text.contains("401"));
}

#[tokio::test]
async fn test_guard_blocks_loaders_without_identity() {
    let stub = common::start_stub_api().await;
    let (app, history) = stub.app();

    let view = app.open(Page::DonorProfile).await;

    assert!(stub.requests().is_empty());
    assert_eq!(view.status.as_ref().map(|s| s.tone), Some(Tone::Neutral));
    app.follow(&view).await;
    assert_eq!(history.visits(), vec![Page::Login]);
}

#[tokio::test]
async fn test_guard_blocks_wrong_role() {
    let stub = common::start_stub_api().await;
    let (app, _) = stub.app();
    app.sessions().persist(&Identity::new(1, UserType::Admin), true).unwrap();

    let view = app.open(Page::DonorProfile).await;

    assert!(stub.requests().is_empty());
    assert_eq!(view.redirect.map(|r| r.target), Some(Page::Login));
}

#[tokio::test]
async fn test_remembered_file_survives_new_app() {
    let stub = common::start_stub_api().await;
    stub.respond_json("login", 200, login_ok(json!(9), "admin"));
    let path = std::env::temp_dir().join(format!("bloody-session-{}.json", uuid::Uuid::new_v4()));

    let make_app = || {
        let sessions = SessionStore::new(Arc::new(MemoryStore::new()), Arc::new(FileStore::new(&path)));
        App::new(
            BloodBankApi::new(stub.gateway()),
            sessions,
            Arc::new(History::new()),
            bloody_client::config::SessionConfig::default().without_delays(),
        )
    };

    make_app().login(&Credentials::new("admin@correo.mx", "x"), true).await;

    // A fresh app sees the remembered identity, but not a tab-scoped one
    let restarted = make_app();
    assert_eq!(
        restarted.guard().current_identity(),
        Some(Identity::new(9, UserType::Admin))
    );

    restarted.logout();
    assert!(!path.exists());
}

#[tokio::test]
async fn test_register_redirects_to_login() {
    let stub = common::start_stub_api().await;
    stub.respond_json("register", 200, json!({"success": true, "message": "Registro exitoso."}));
    let (app, _) = stub.app();
    let fields: FormFields = [
        ("nombre_completo", "Ana López"),
        ("email", "ana@correo.mx"),
        ("password", "secreto"),
        ("tipo_sangre", "O+"),
    ]
    .into_iter()
    .collect();

    let view = app.register(&fields).await;

    assert_eq!(view.status.unwrap().text, "Registro exitoso. Redirigiendo a login...");
    assert_eq!(view.redirect.map(|r| r.target), Some(Page::Login));
    assert_eq!(stub.requests_for("register")[0].json()["tipo_sangre"], "O+");
}
