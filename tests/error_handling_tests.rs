//! Error normalization taxonomy, exercised through the public API

use azampay::{AzamPay, ClientConfig, Instance, NameLookup};
use mockito::Server;
use serde_json::json;

fn client_for(server: &Server) -> AzamPay {
    AzamPay::with_instance_and_config(
        Instance::new().with_access_token("t"),
        ClientConfig::new().with_checkout_base(server.url()),
    )
}

#[tokio::test]
async fn structured_validation_errors_are_flattened() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/azampay/namelookup")
        .with_status(422)
        .with_body(
            json!({
                "message": "Validation failed",
                "errors": {
                    "bankName": ["is required"],
                    "accountNumber": {"length": ["too short", "digits only"]}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let failure = client_for(&server)
        .name_lookup(&NameLookup::new("", ""), None)
        .await
        .unwrap_err();

    assert_eq!(
        failure.message,
        "is required, too short, digits only"
    );
    assert_eq!(failure.error.as_deref(), Some("Validation failed"));
    assert_eq!(failure.status_code, 422);
    assert_eq!(failure.code, "FAILED");
}

#[tokio::test]
async fn server_supplied_code_is_preserved() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/azampay/namelookup")
        .with_status(401)
        .with_body(json!({"message": "Token expired", "code": "AUTH_EXPIRED"}).to_string())
        .create_async()
        .await;

    let failure = client_for(&server)
        .name_lookup(&NameLookup::new("NMB", "111"), None)
        .await
        .unwrap_err();

    assert_eq!(failure.code, "AUTH_EXPIRED");
    assert_eq!(failure.status_code, 401);
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_text() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/azampay/namelookup")
        .with_status(502)
        .with_body("bad gateway, try later")
        .create_async()
        .await;

    let failure = client_for(&server)
        .name_lookup(&NameLookup::new("NMB", "111"), None)
        .await
        .unwrap_err();

    assert_eq!(failure.message, "bad gateway, try later");
    assert_eq!(failure.status_code, 502);
    assert_eq!(failure.code, "FAILED");
}

#[tokio::test]
async fn empty_error_body_uses_http_reason() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/azampay/namelookup")
        .with_status(404)
        .create_async()
        .await;

    let failure = client_for(&server)
        .name_lookup(&NameLookup::new("NMB", "111"), None)
        .await
        .unwrap_err();

    assert_eq!(failure.message, "Not Found");
    assert_eq!(failure.status_code, 404);
}

#[tokio::test]
async fn every_failure_status_normalizes_to_the_same_shape() {
    for status in [400_usize, 403, 404, 409, 500, 503] {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/azampay/namelookup")
            .with_status(status)
            .with_body(json!({"message": "rejected"}).to_string())
            .create_async()
            .await;

        let failure = client_for(&server)
            .name_lookup(&NameLookup::new("NMB", "111"), None)
            .await
            .unwrap_err();

        assert!(!failure.success);
        assert_eq!(failure.status_code, status as u16);
        assert_eq!(failure.message, "rejected");
    }
}

#[tokio::test]
async fn success_and_failure_discriminants_are_consistent() {
    let mut server = Server::new_async().await;
    let _ok = server
        .mock("POST", "/azampay/namelookup")
        .with_status(200)
        .with_body(json!({"name": "JOHN DOE", "message": "found"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let lookup = NameLookup::new("NMB", "111");

    let success = client.name_lookup(&lookup, None).await.unwrap();
    assert!(success.success);
    assert_eq!(success.status_code, 200);
    assert_eq!(success.data.name.as_deref(), Some("JOHN DOE"));

    // same call against a dead port: the failure arm of the same union
    let dead = AzamPay::with_config(
        ClientConfig::new().with_checkout_base("http://127.0.0.1:1"),
    );
    let failure = dead.name_lookup(&lookup, None).await.unwrap_err();
    assert!(!failure.success);
}
