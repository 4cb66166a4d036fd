//! Wire types for the AzamPay APIs
//!
//! Request payloads serialize to the camelCase shapes the gateway expects.
//! Response types keep their declared fields typed and collect any
//! provider-added fields into an `extra` map, so new gateway fields never
//! break deserialization.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::env::Environment;

/// Success envelope wrapping a parsed operation response.
///
/// The executor always reports `status_code = 200` on the success path
/// regardless of the actual 2xx code returned, for compatibility with
/// existing AzamPay SDK behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    /// Always `true`; the discriminant mirrored from the wire shape
    pub success: bool,
    /// Reported HTTP status, always 200 on the success path
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// The operation-specific response payload
    pub data: T,
}

impl<T> ApiSuccess<T> {
    /// Wrap a parsed response payload
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            status_code: 200,
            data,
        }
    }
}

/// Credentials used to acquire a bearer token
#[derive(Debug, Clone, Serialize)]
pub struct TokenPayload {
    /// Name of the registered application
    #[serde(rename = "appName")]
    pub app_name: String,
    /// Client id generated during application registration
    #[serde(rename = "clientId")]
    pub client_id: String,
    /// Secret key generated during application registration
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    /// API key from the settings page; sent as the `X-API-Key` header on
    /// checkout calls, never in the token request body
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Target environment; not part of the wire payload
    #[serde(skip_serializing)]
    pub env: Option<Environment>,
}

impl TokenPayload {
    /// Create a token payload
    pub fn new(
        app_name: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_key: api_key.into(),
            env: None,
        }
    }

    /// Set the target environment
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }
}

/// Access token and its expiry time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDetails {
    /// Bearer token for authenticated operations
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// Expiry time as reported by the authenticator
    #[serde(default)]
    pub expire: Option<String>,
}

impl TokenDetails {
    /// Parse the reported expiry time. Expiry is the caller's
    /// responsibility; tokens are never refreshed automatically.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.expire.as_deref()?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Body of a successful token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Token details, absent on some gateway error shapes
    #[serde(default)]
    pub data: Option<TokenDetails>,
    /// Status message from the authenticator
    #[serde(default)]
    pub message: Option<String>,
    /// Provider-added fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Mobile network operators supported for MNO checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MnoProvider {
    Airtel,
    Tigo,
    Halopesa,
    Azampesa,
    Mpesa,
}

/// Banks supported for bank checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankProvider {
    #[serde(rename = "CRDB")]
    Crdb,
    #[serde(rename = "NMB")]
    Nmb,
}

/// Bank checkout request
#[derive(Debug, Clone, Serialize)]
pub struct BankCheckout {
    /// Amount to charge the given account
    pub amount: String,
    /// Currency code, e.g. `TZS`
    #[serde(rename = "currencyCode")]
    pub currency_code: String,
    /// Account number the amount is deducted from
    #[serde(rename = "merchantAccountNumber")]
    pub merchant_account_number: String,
    /// Consumer mobile number
    #[serde(rename = "merchantMobileNumber")]
    pub merchant_mobile_number: String,
    /// Optional consumer name
    #[serde(rename = "merchantName", skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    /// One-time password
    pub otp: String,
    /// Bank provider
    pub provider: BankProvider,
    /// Caller-side reference id, up to 128 ASCII characters
    #[serde(rename = "referenceId")]
    pub reference_id: String,
    /// Optional additional JSON data
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Map<String, Value>>,
}

impl BankCheckout {
    /// Create a bank checkout request
    pub fn new(
        amount: impl Into<String>,
        currency_code: impl Into<String>,
        merchant_account_number: impl Into<String>,
        merchant_mobile_number: impl Into<String>,
        otp: impl Into<String>,
        provider: BankProvider,
        reference_id: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
            merchant_account_number: merchant_account_number.into(),
            merchant_mobile_number: merchant_mobile_number.into(),
            merchant_name: None,
            otp: otp.into(),
            provider,
            reference_id: reference_id.into(),
            additional_properties: None,
        }
    }

    /// Set the consumer name
    pub fn with_merchant_name(mut self, name: impl Into<String>) -> Self {
        self.merchant_name = Some(name.into());
        self
    }

    /// Attach additional JSON data
    pub fn with_additional_properties(mut self, properties: Map<String, Value>) -> Self {
        self.additional_properties = Some(properties);
        self
    }
}

/// Mobile-money checkout request
#[derive(Debug, Clone, Serialize)]
pub struct MnoCheckout {
    /// Account number / MSISDN the amount is deducted from
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    /// Amount to charge the given account
    pub amount: String,
    /// Transaction currency; currently only `TZS` is supported
    pub currency: String,
    /// Caller-side id, up to 128 ASCII characters
    #[serde(rename = "externalId")]
    pub external_id: String,
    /// Mobile network operator
    pub provider: MnoProvider,
    /// Optional additional JSON data
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Map<String, Value>>,
}

impl MnoCheckout {
    /// Create an MNO checkout request
    pub fn new(
        account_number: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
        external_id: impl Into<String>,
        provider: MnoProvider,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            amount: amount.into(),
            currency: currency.into(),
            external_id: external_id.into(),
            provider,
            additional_properties: None,
        }
    }

    /// Attach additional JSON data
    pub fn with_additional_properties(mut self, properties: Map<String, Value>) -> Self {
        self.additional_properties = Some(properties);
        self
    }
}

/// Response for both bank and MNO checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Transaction id assigned by the gateway
    #[serde(rename = "transactionId", default)]
    pub transaction_id: Option<String>,
    /// Short status message
    #[serde(default)]
    pub msg: Option<String>,
    /// Status message
    #[serde(default)]
    pub message: Option<String>,
    /// Provider-added fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Item in a hosted-checkout cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Vendor item name
    pub name: String,
}

/// Shopping cart for hosted checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Vendor items
    pub items: Vec<CartItem>,
}

/// Hosted (post) checkout request
#[derive(Debug, Clone, Serialize)]
pub struct PostCheckout {
    /// Name of the registered application
    #[serde(rename = "appName")]
    pub app_name: String,
    /// Client id identifying the caller
    #[serde(rename = "clientId")]
    pub client_id: String,
    /// Vendor UUID
    #[serde(rename = "vendorId")]
    pub vendor_id: String,
    /// Language code for the hosted page
    pub language: String,
    /// Currency code
    pub currency: String,
    /// 30-character unique external id
    #[serde(rename = "externalId")]
    pub external_id: String,
    /// URL the request originates from
    #[serde(rename = "requestOrigin")]
    pub request_origin: String,
    /// Redirect target on transaction failure
    #[serde(rename = "redirectFailURL")]
    pub redirect_fail_url: String,
    /// Redirect target on transaction success
    #[serde(rename = "redirectSuccessURL")]
    pub redirect_success_url: String,
    /// Vendor name
    #[serde(rename = "vendorName")]
    pub vendor_name: String,
    /// Amount to charge
    pub amount: String,
    /// Shopping cart
    pub cart: Cart,
}

/// Bank or mobile-money account details for a transfer endpoint.
/// Used for both the source and the destination side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDetail {
    /// Country code
    #[serde(rename = "countryCode")]
    pub country_code: String,
    /// Account holder full name
    #[serde(rename = "fullName")]
    pub full_name: String,
    /// Bank or MNO name
    #[serde(rename = "bankName")]
    pub bank_name: String,
    /// Account number
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    /// Account currency
    pub currency: String,
}

impl AccountDetail {
    /// Create account details
    pub fn new(
        country_code: impl Into<String>,
        full_name: impl Into<String>,
        bank_name: impl Into<String>,
        account_number: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            full_name: full_name.into(),
            bank_name: bank_name.into(),
            account_number: account_number.into(),
            currency: currency.into(),
        }
    }
}

/// Details of the transfer itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferDetails {
    /// Transfer type
    #[serde(rename = "type")]
    pub transfer_type: String,
    /// Transfer amount
    pub amount: f64,
    /// Transfer date
    pub date: String,
}

/// Disbursement request
#[derive(Debug, Clone, Serialize)]
pub struct Disburse {
    /// Source account
    pub source: AccountDetail,
    /// Destination account
    pub destination: AccountDetail,
    /// Transfer details
    #[serde(rename = "transferDetails")]
    pub transfer_details: TransferDetails,
    /// External reference id to track the transaction
    #[serde(rename = "externalReferenceId")]
    pub external_reference_id: String,
    /// Free-form remarks
    pub remarks: String,
}

/// Disbursement response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisburseResponse {
    /// Transaction status string
    #[serde(default)]
    pub data: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
    /// Provider-added fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Name lookup request for a bank or mobile-money account
#[derive(Debug, Clone, Serialize)]
pub struct NameLookup {
    /// Bank or MNO name associated with the account
    #[serde(rename = "bankName")]
    pub bank_name: String,
    /// Account number or mobile-money number
    #[serde(rename = "accountNumber")]
    pub account_number: String,
}

impl NameLookup {
    /// Create a name lookup request
    pub fn new(bank_name: impl Into<String>, account_number: impl Into<String>) -> Self {
        Self {
            bank_name: bank_name.into(),
            account_number: account_number.into(),
        }
    }
}

/// Name lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameLookupResponse {
    /// Name associated with the account
    #[serde(default)]
    pub name: Option<String>,
    /// Status message
    #[serde(default)]
    pub message: Option<String>,
    /// Account number echoed back
    #[serde(rename = "accountNumber", default)]
    pub account_number: Option<String>,
    /// Bank or MNO name echoed back
    #[serde(rename = "bankName", default)]
    pub bank_name: Option<String>,
    /// Provider-added fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Transaction status request
#[derive(Debug, Clone)]
pub struct TransactionStatus {
    /// Transaction id received from the disbursement request
    pub reference: String,
    /// Bank or MNO used for the disbursement
    pub bank_name: String,
}

impl TransactionStatus {
    /// Create a transaction status request
    pub fn new(reference: impl Into<String>, bank_name: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            bank_name: bank_name.into(),
        }
    }
}

/// Transaction status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStatusResponse {
    /// Transaction status string
    #[serde(default)]
    pub data: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
    /// Provider-added fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A payment partner returned by the partner listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    /// Partner logo URL
    #[serde(rename = "logoUrl", default)]
    pub logo_url: Option<String>,
    /// Partner name, e.g. Azampesa, Airtel, Halopesa
    #[serde(rename = "partnerName")]
    pub partner_name: String,
    /// Provider enum value, e.g. airtel=2, tigo=3, azampesa=5
    #[serde(default)]
    pub provider: Option<i64>,
    /// Vendor name
    #[serde(rename = "vendorName", default)]
    pub vendor_name: Option<String>,
    /// Payment vendor id
    #[serde(rename = "paymentVendorId", default)]
    pub payment_vendor_id: Option<String>,
    /// Payment partner id
    #[serde(rename = "paymentPartnerId", default)]
    pub payment_partner_id: Option<String>,
    /// Currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// Provider-added fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-call overrides for a single request.
///
/// Values set here take precedence over the ones bound to a client or
/// session, for that call only.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// API key override for the `X-API-Key` header
    pub api_key: Option<String>,
    /// Bearer token override
    pub access_token: Option<String>,
    /// Environment override
    pub env: Option<Environment>,
}

impl RequestOptions {
    /// Create empty request options
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API key for this call
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the bearer token for this call
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Override the environment for this call
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }
}

/// Credentials bound to a client instance
#[derive(Debug, Clone, Default)]
pub struct Instance {
    /// Bearer token used for authenticated operations
    pub access_token: Option<String>,
    /// API key for the `X-API-Key` header
    pub api_key: Option<String>,
    /// Default environment for this instance
    pub env: Option<Environment>,
}

impl Instance {
    /// Create an empty instance binding
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a bearer token
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Bind an API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Bind a default environment
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }
}

/// Transport configuration for an AzamPay client
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Default environment, `Sandbox` when unset
    pub env: Option<Environment>,
    /// Request timeout; transport default when unset
    pub timeout: Option<Duration>,
    /// Accept invalid TLS certificates. Off by default; only enable this
    /// against the sandbox, never in production.
    pub danger_accept_invalid_certs: bool,
    /// Override the authenticator service base URL
    pub authenticator_base: Option<String>,
    /// Override the checkout service base URL
    pub checkout_base: Option<String>,
}

impl ClientConfig {
    /// Create a default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default environment
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Accept invalid TLS certificates. Explicit opt-in; the sandbox gateway
    /// has historically served certificates that fail verification.
    pub fn with_danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    /// Override the authenticator service base URL
    pub fn with_authenticator_base(mut self, base: impl Into<String>) -> Self {
        self.authenticator_base = Some(base.into());
        self
    }

    /// Override the checkout service base URL
    pub fn with_checkout_base(mut self, base: impl Into<String>) -> Self {
        self.checkout_base = Some(base.into());
        self
    }

    /// Validate the configured base-URL overrides
    pub fn validate(&self) -> Result<(), crate::ErrorResponse> {
        for base in [&self.authenticator_base, &self.checkout_base]
            .into_iter()
            .flatten()
        {
            let parsed = url::Url::parse(base).map_err(|e| {
                crate::ErrorResponse::new(
                    format!("Invalid base URL {}: {}", base, e),
                    crate::error::DEFAULT_ERROR_CODE,
                    crate::error::DEFAULT_ERROR_STATUS,
                )
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(crate::ErrorResponse::new(
                    format!("Base URL must be http or https: {}", base),
                    crate::error::DEFAULT_ERROR_CODE,
                    crate::error::DEFAULT_ERROR_STATUS,
                ));
            }
        }
        Ok(())
    }
}
