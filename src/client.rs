//! AzamPay client: request execution and the remote operations
//!
//! [`AzamPay`] exposes one method per remote capability. Every method issues
//! exactly one outbound HTTP request (no retries, no backoff) and returns the
//! uniform [`ApiResult`] envelope; failures of any kind are routed through
//! the normalizer in [`crate::error`] and never panic or propagate a raw
//! transport fault.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::env::{Environment, ServiceFamily};
use crate::error::{ApiResult, ErrorResponse};
use crate::types::{
    ApiSuccess, BankCheckout, CheckoutResponse, ClientConfig, Disburse, DisburseResponse,
    Instance, MnoCheckout, NameLookup, NameLookupResponse, Partner, PostCheckout, RequestOptions,
    TokenPayload, TokenResponse, TransactionStatus, TransactionStatusResponse,
};

/// Header carrying the AzamPay API key on checkout operations
pub const API_KEY_HEADER: &str = "X-API-Key";

/// AzamPay request client
#[derive(Debug, Clone)]
pub struct AzamPay {
    /// Underlying HTTP client
    http: Client,
    /// Credentials bound to this client
    instance: Instance,
    /// Transport configuration
    config: ClientConfig,
}

impl AzamPay {
    /// Create an unbound client with default configuration
    pub fn new() -> Self {
        Self::with_instance_and_config(Instance::new(), ClientConfig::new())
    }

    /// Create a client bound to the given credentials
    pub fn with_instance(instance: Instance) -> Self {
        Self::with_instance_and_config(instance, ClientConfig::new())
    }

    /// Create an unbound client with custom transport configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_instance_and_config(Instance::new(), config)
    }

    /// Create a client with bound credentials and custom configuration
    pub fn with_instance_and_config(instance: Instance, config: ClientConfig) -> Self {
        let mut builder = Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if config.danger_accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().unwrap_or_else(|_| Client::new());

        Self {
            http,
            instance,
            config,
        }
    }

    /// Get the credentials bound to this client
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Get the transport configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Acquire a bearer token from the authenticator service.
    ///
    /// The environment is taken from the payload, then from this client's
    /// bindings, then defaults to sandbox.
    pub async fn get_token(&self, payload: &TokenPayload) -> ApiResult<TokenResponse> {
        let url = format!(
            "{}/AppRegistration/GenerateToken",
            self.base_url(ServiceFamily::Authenticator, payload.env)
        );
        self.post_json(url, self.base_headers(), payload).await
    }

    /// Bank checkout: charge the given bank account
    pub async fn bank_checkout(
        &self,
        payload: &BankCheckout,
        options: Option<&RequestOptions>,
    ) -> ApiResult<CheckoutResponse> {
        let url = format!(
            "{}/azampay/bank/checkout",
            self.checkout_base(options)
        );
        self.post_json(url, self.auth_headers(options, true), payload)
            .await
    }

    /// Mobile-money checkout: charge the given MSISDN
    pub async fn mno_checkout(
        &self,
        payload: &MnoCheckout,
        options: Option<&RequestOptions>,
    ) -> ApiResult<CheckoutResponse> {
        let url = format!("{}/azampay/mno/checkout", self.checkout_base(options));
        self.post_json(url, self.auth_headers(options, true), payload)
            .await
    }

    /// Hosted checkout: create a checkout page and return its redirect data
    pub async fn post_checkout(
        &self,
        payload: &PostCheckout,
        options: Option<&RequestOptions>,
    ) -> ApiResult<Value> {
        let url = format!(
            "{}/api/v1/Partner/PostCheckout",
            self.checkout_base(options)
        );
        self.post_json(url, self.base_headers(), payload).await
    }

    /// Disburse money to a bank or mobile-money account
    pub async fn disburse(
        &self,
        payload: &Disburse,
        options: Option<&RequestOptions>,
    ) -> ApiResult<DisburseResponse> {
        let url = format!("{}/azampay/createtransfer", self.checkout_base(options));
        self.post_json(url, self.auth_headers(options, false), payload)
            .await
    }

    /// Retrieve the status of a disbursement transaction
    pub async fn transaction_status(
        &self,
        payload: &TransactionStatus,
        options: Option<&RequestOptions>,
    ) -> ApiResult<TransactionStatusResponse> {
        let url = format!(
            "{}/azampay/gettransactionstatus?pgReferenceId={}&bankName={}",
            self.checkout_base(options),
            utf8_percent_encode(&payload.reference, NON_ALPHANUMERIC),
            utf8_percent_encode(&payload.bank_name, NON_ALPHANUMERIC),
        );
        self.get_json(url, self.auth_headers(options, false)).await
    }

    /// Look up the name associated with a bank or mobile-money account
    pub async fn name_lookup(
        &self,
        payload: &NameLookup,
        options: Option<&RequestOptions>,
    ) -> ApiResult<NameLookupResponse> {
        let url = format!("{}/azampay/namelookup", self.checkout_base(options));
        self.post_json(url, self.auth_headers(options, false), payload)
            .await
    }

    /// List the payment partners available to this application
    pub async fn partners(&self, options: Option<&RequestOptions>) -> ApiResult<Vec<Partner>> {
        let url = format!(
            "{}/api/v1/Partner/GetPaymentPartners",
            self.checkout_base(options)
        );
        self.get_json(url, self.auth_headers(options, false)).await
    }

    fn checkout_base(&self, options: Option<&RequestOptions>) -> String {
        self.base_url(ServiceFamily::Checkout, options.and_then(|o| o.env))
    }

    fn base_url(&self, family: ServiceFamily, per_call: Option<Environment>) -> String {
        let override_base = match family {
            ServiceFamily::Authenticator => &self.config.authenticator_base,
            ServiceFamily::Checkout => &self.config.checkout_base,
        };
        if let Some(base) = override_base {
            return base.trim_end_matches('/').to_string();
        }
        let env = Environment::resolve(per_call, self.instance.env.or(self.config.env));
        env.base_url(family).to_string()
    }

    fn base_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Assemble auth headers for one call. Per-call options win over bound
    /// instance values; an unresolved token still sends an empty bearer so
    /// the gateway, not the client, rejects the request.
    fn auth_headers(&self, options: Option<&RequestOptions>, include_api_key: bool) -> HeaderMap {
        let mut headers = self.base_headers();

        let token = options
            .and_then(|o| o.access_token.as_deref())
            .or(self.instance.access_token.as_deref())
            .unwrap_or("");
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
            headers.insert(AUTHORIZATION, value);
        }

        if include_api_key {
            let api_key = options
                .and_then(|o| o.api_key.as_deref())
                .or(self.instance.api_key.as_deref());
            if let Some(key) = api_key {
                if let Ok(value) = HeaderValue::from_str(key) {
                    headers.insert(API_KEY_HEADER, value);
                }
            }
        }

        headers
    }

    async fn post_json<T, B>(&self, url: String, headers: HeaderMap, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.post(&url).headers(headers).json(body);
        self.dispatch(Method::POST, url, request).await
    }

    async fn get_json<T>(&self, url: String, headers: HeaderMap) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.http.get(&url).headers(headers);
        self.dispatch(Method::GET, url, request).await
    }

    /// Perform exactly one request and shape the outcome into the envelope.
    async fn dispatch<T>(
        &self,
        method: Method,
        url: String,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(%method, %url, "dispatching request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return Err(ErrorResponse::from_transport(&err)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return Err(ErrorResponse::from_transport(&err)),
        };

        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "request rejected");
            return Err(ErrorResponse::from_response(status, &body));
        }

        match serde_json::from_str::<T>(&body) {
            Ok(data) => Ok(ApiSuccess::new(data)),
            Err(err) => Err(ErrorResponse::from_decode(&err)),
        }
    }
}

impl Default for AzamPay {
    fn default() -> Self {
        Self::new()
    }
}
