//! Authenticated sessions bound to an acquired token
//!
//! [`authenticate`] exchanges application credentials for a bearer token and
//! returns an immutable [`Session`] exposing every checkout-family operation
//! pre-bound to that token, the API key and the environment. Per-call
//! [`RequestOptions`] still override the bound values for a single call.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::AzamPay;
use crate::error::{ApiResult, ErrorResponse, DEFAULT_ERROR_CODE, DEFAULT_ERROR_STATUS};
use crate::types::{
    BankCheckout, CheckoutResponse, ClientConfig, Disburse, DisburseResponse, Instance,
    MnoCheckout, NameLookup, NameLookupResponse, Partner, PostCheckout, RequestOptions,
    TokenDetails, TokenPayload, TransactionStatus, TransactionStatusResponse,
};

/// An authenticated handle over the AzamPay operations.
///
/// Immutable once constructed; a session never refreshes its token. Check
/// [`Session::is_expired`] and re-authenticate when needed.
#[derive(Debug, Clone)]
pub struct Session {
    token: TokenDetails,
    message: Option<String>,
    client: AzamPay,
}

/// Authenticate with default transport configuration
pub async fn authenticate(payload: &TokenPayload) -> Result<Session, ErrorResponse> {
    authenticate_with_config(payload, ClientConfig::new()).await
}

/// Authenticate with custom transport configuration.
///
/// On success the returned [`Session`] binds the access token, the payload's
/// API key and the resolved environment. On failure the normalized
/// [`ErrorResponse`] is returned unchanged and no session is constructed.
pub async fn authenticate_with_config(
    payload: &TokenPayload,
    config: ClientConfig,
) -> Result<Session, ErrorResponse> {
    config.validate()?;

    let client = AzamPay::with_config(config.clone());
    let envelope = client.get_token(payload).await?;

    let token = envelope.data.data.ok_or_else(|| {
        ErrorResponse::new(
            "Token response carried no access token",
            DEFAULT_ERROR_CODE,
            DEFAULT_ERROR_STATUS,
        )
    })?;

    let instance = Instance {
        access_token: Some(token.access_token.clone()),
        api_key: Some(payload.api_key.clone()),
        env: payload.env.or(config.env),
    };

    Ok(Session {
        token,
        message: envelope.data.message,
        client: AzamPay::with_instance_and_config(instance, config),
    })
}

impl Session {
    /// The acquired bearer token
    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    /// Token details as returned by the authenticator
    pub fn token(&self) -> &TokenDetails {
        &self.token
    }

    /// Message carried by the token response, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Parsed token expiry time, when the authenticator reported one
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.expires_at()
    }

    /// Whether the bound token has expired. Unparseable or missing expiry
    /// reports `false`; the gateway remains authoritative either way.
    pub fn is_expired(&self) -> bool {
        self.expires_at()
            .map(|at| at <= Utc::now())
            .unwrap_or(false)
    }

    /// The bound client, for callers that want the facade directly
    pub fn client(&self) -> &AzamPay {
        &self.client
    }

    /// Bank checkout bound to this session's credentials
    pub async fn bank_checkout(
        &self,
        payload: &BankCheckout,
        options: Option<&RequestOptions>,
    ) -> ApiResult<CheckoutResponse> {
        self.client.bank_checkout(payload, options).await
    }

    /// Mobile-money checkout bound to this session's credentials
    pub async fn mno_checkout(
        &self,
        payload: &MnoCheckout,
        options: Option<&RequestOptions>,
    ) -> ApiResult<CheckoutResponse> {
        self.client.mno_checkout(payload, options).await
    }

    /// Hosted checkout bound to this session's credentials
    pub async fn post_checkout(
        &self,
        payload: &PostCheckout,
        options: Option<&RequestOptions>,
    ) -> ApiResult<Value> {
        self.client.post_checkout(payload, options).await
    }

    /// Disbursement bound to this session's credentials
    pub async fn disburse(
        &self,
        payload: &Disburse,
        options: Option<&RequestOptions>,
    ) -> ApiResult<DisburseResponse> {
        self.client.disburse(payload, options).await
    }

    /// Transaction status bound to this session's credentials
    pub async fn transaction_status(
        &self,
        payload: &TransactionStatus,
        options: Option<&RequestOptions>,
    ) -> ApiResult<TransactionStatusResponse> {
        self.client.transaction_status(payload, options).await
    }

    /// Name lookup bound to this session's credentials
    pub async fn name_lookup(
        &self,
        payload: &NameLookup,
        options: Option<&RequestOptions>,
    ) -> ApiResult<NameLookupResponse> {
        self.client.name_lookup(payload, options).await
    }

    /// Partner listing bound to this session's credentials
    pub async fn partners(&self, options: Option<&RequestOptions>) -> ApiResult<Vec<Partner>> {
        self.client.partners(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BankProvider;
    use mockito::Server;
    use serde_json::json;

    fn payload() -> TokenPayload {
        TokenPayload::new("app", "client-id", "client-secret", "api-key")
    }

    fn token_body() -> String {
        json!({
            "data": {"accessToken": "session-token", "expire": "2030-05-01T10:00:00Z"},
            "message": "token generated",
            "success": true,
            "statusCode": 200
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_authenticate_builds_bound_session() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/AppRegistration/GenerateToken")
            .with_status(200)
            .with_body(token_body())
            .create_async()
            .await;
        let _checkout = server
            .mock("POST", "/azampay/bank/checkout")
            .match_header("authorization", "Bearer session-token")
            .match_header("x-api-key", "api-key")
            .with_status(200)
            .with_body(json!({"transactionId": "tx-1", "msg": "ok"}).to_string())
            .create_async()
            .await;

        let config = ClientConfig::new()
            .with_authenticator_base(server.url())
            .with_checkout_base(server.url());
        let session = authenticate_with_config(&payload(), config).await.unwrap();

        assert_eq!(session.access_token(), "session-token");
        assert_eq!(session.message(), Some("token generated"));
        assert!(!session.is_expired());

        let checkout = BankCheckout::new(
            "1000",
            "TZS",
            "00110232",
            "0700000000",
            "1234",
            BankProvider::Nmb,
            "ref-1",
        );
        let envelope = session.bank_checkout(&checkout, None).await.unwrap();
        assert_eq!(envelope.data.transaction_id.as_deref(), Some("tx-1"));
    }

    #[tokio::test]
    async fn test_authenticate_failure_returns_error_unchanged() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/AppRegistration/GenerateToken")
            .with_status(400)
            .with_body(json!({"message": "Invalid credentials"}).to_string())
            .create_async()
            .await;

        let config = ClientConfig::new().with_authenticator_base(server.url());
        let failure = authenticate_with_config(&payload(), config)
            .await
            .unwrap_err();

        assert!(!failure.success);
        assert_eq!(failure.status_code, 400);
        assert_eq!(failure.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_authenticate_rejects_tokenless_success() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/AppRegistration/GenerateToken")
            .with_status(200)
            .with_body(json!({"message": "ok but empty"}).to_string())
            .create_async()
            .await;

        let config = ClientConfig::new().with_authenticator_base(server.url());
        let failure = authenticate_with_config(&payload(), config)
            .await
            .unwrap_err();

        assert_eq!(failure.status_code, 400);
        assert_eq!(failure.code, "FAILED");
    }

    #[tokio::test]
    async fn test_bound_session_matches_unbound_client() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/AppRegistration/GenerateToken")
            .with_status(200)
            .with_body(token_body())
            .create_async()
            .await;
        let _checkout = server
            .mock("POST", "/azampay/bank/checkout")
            .match_header("authorization", "Bearer session-token")
            .match_header("x-api-key", "api-key")
            .with_status(200)
            .with_body(json!({"transactionId": "tx-same", "msg": "ok"}).to_string())
            .expect(2)
            .create_async()
            .await;

        let config = ClientConfig::new()
            .with_authenticator_base(server.url())
            .with_checkout_base(server.url());
        let session = authenticate_with_config(&payload(), config.clone())
            .await
            .unwrap();

        let checkout = BankCheckout::new(
            "1000",
            "TZS",
            "00110232",
            "0700000000",
            "1234",
            BankProvider::Nmb,
            "ref-1",
        );

        let bound = session.bank_checkout(&checkout, None).await.unwrap();

        let unbound = AzamPay::with_config(config);
        let options = RequestOptions::new()
            .with_access_token("session-token")
            .with_api_key("api-key");
        let explicit = unbound
            .bank_checkout(&checkout, Some(&options))
            .await
            .unwrap();

        assert_eq!(bound.data.transaction_id, explicit.data.transaction_id);
        assert_eq!(bound.status_code, explicit.status_code);
        assert_eq!(bound.success, explicit.success);
    }

    #[test]
    fn test_expired_session() {
        let session = Session {
            token: TokenDetails {
                access_token: "t".to_string(),
                expire: Some("2001-01-01T00:00:00Z".to_string()),
            },
            message: None,
            client: AzamPay::new(),
        };
        assert!(session.is_expired());
    }
}
