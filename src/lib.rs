//! # azampay - AzamPay payment gateway SDK
//!
//! A Rust client for the AzamPay payment gateway: token acquisition, bank
//! and mobile-money checkout, disbursement, transaction status, name lookup,
//! partner listing and hosted checkout.
//!
//! Every operation returns the uniform [`ApiResult`] envelope: `Ok` carries
//! the parsed response with `success = true`, `Err` carries the canonical
//! [`ErrorResponse`] with `success = false`. Transport faults, non-2xx
//! responses and malformed bodies are all normalized into that one shape;
//! nothing panics and no raw transport error escapes.
//!
//! ```no_run
//! use azampay::{authenticate, Environment, MnoCheckout, MnoProvider, TokenPayload};
//!
//! # async fn run() -> Result<(), azampay::ErrorResponse> {
//! let credentials = TokenPayload::new("my-app", "client-id", "client-secret", "api-key")
//!     .with_env(Environment::Sandbox);
//! let session = authenticate(&credentials).await?;
//!
//! let checkout = MnoCheckout::new("0700000000", "2000", "TZS", "order-1", MnoProvider::Mpesa);
//! let result = session.mno_checkout(&checkout, None).await?;
//! println!("transaction: {:?}", result.data.transaction_id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod env;
pub mod error;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use client::AzamPay;
pub use env::{Environment, ServiceFamily};
pub use error::{flatten_error_message, ApiResult, ErrorResponse};
pub use session::{authenticate, authenticate_with_config, Session};
pub use types::*;

/// Current version of the azampay crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_envelope_discriminants() {
        let success: ApiResult<&str> = Ok(ApiSuccess::new("payload"));
        let failure: ApiResult<&str> = Err(ErrorResponse::internal());

        assert!(success.as_ref().unwrap().success);
        assert!(!failure.as_ref().unwrap_err().success);
    }

    #[test]
    fn test_default_environment_is_sandbox() {
        assert_eq!(Environment::default(), Environment::Sandbox);
    }
}
