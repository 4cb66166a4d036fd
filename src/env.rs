//! Environment selection and base-URL resolution

use serde::{Deserialize, Serialize};

/// Authenticator service base URL for the sandbox environment
pub const AUTHENTICATOR_SANDBOX: &str = "https://authenticator-sandbox.azampay.co.tz";
/// Authenticator service base URL for the live environment
pub const AUTHENTICATOR_LIVE: &str = "https://authenticator.azampay.co.tz";
/// Checkout service base URL for the sandbox environment
pub const CHECKOUT_SANDBOX: &str = "https://sandbox.azampay.co.tz";
/// Checkout service base URL for the live environment
pub const CHECKOUT_LIVE: &str = "https://checkout.azampay.co.tz";

/// AzamPay environment selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Environment {
    /// Sandbox environment for testing (the default)
    #[default]
    #[serde(rename = "SANDBOX")]
    Sandbox,
    /// Live production environment
    #[serde(rename = "LIVE")]
    Live,
}

/// AzamPay exposes two distinct service families, each with its own host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFamily {
    /// Token issuance (`/AppRegistration/GenerateToken`)
    Authenticator,
    /// Checkout, disbursement and lookup operations
    Checkout,
}

impl Environment {
    /// Get the environment tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "SANDBOX",
            Environment::Live => "LIVE",
        }
    }

    /// Get the fixed base URL for a service family in this environment
    pub fn base_url(&self, family: ServiceFamily) -> &'static str {
        match (self, family) {
            (Environment::Sandbox, ServiceFamily::Authenticator) => AUTHENTICATOR_SANDBOX,
            (Environment::Live, ServiceFamily::Authenticator) => AUTHENTICATOR_LIVE,
            (Environment::Sandbox, ServiceFamily::Checkout) => CHECKOUT_SANDBOX,
            (Environment::Live, ServiceFamily::Checkout) => CHECKOUT_LIVE,
        }
    }

    /// Parse an environment tag. Unknown tags resolve to `Sandbox`, the
    /// documented default, rather than failing.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "LIVE" | "live" | "Live" => Environment::Live,
            _ => Environment::Sandbox,
        }
    }

    /// Resolve the effective environment for one call.
    ///
    /// Precedence: per-call override, then the value bound to the client or
    /// session, then `Sandbox`.
    pub fn resolve(per_call: Option<Environment>, bound: Option<Environment>) -> Self {
        per_call.or(bound).unwrap_or_default()
    }
}

impl std::str::FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Environment::from_tag(s))
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sandbox() {
        assert_eq!(Environment::default(), Environment::Sandbox);
        assert_eq!(Environment::resolve(None, None), Environment::Sandbox);
    }

    #[test]
    fn test_base_urls() {
        assert_eq!(
            Environment::Sandbox.base_url(ServiceFamily::Authenticator),
            "https://authenticator-sandbox.azampay.co.tz"
        );
        assert_eq!(
            Environment::Live.base_url(ServiceFamily::Authenticator),
            "https://authenticator.azampay.co.tz"
        );
        assert_eq!(
            Environment::Sandbox.base_url(ServiceFamily::Checkout),
            "https://sandbox.azampay.co.tz"
        );
        assert_eq!(
            Environment::Live.base_url(ServiceFamily::Checkout),
            "https://checkout.azampay.co.tz"
        );
    }

    #[test]
    fn test_resolution_precedence() {
        // per-call override wins over the bound value
        assert_eq!(
            Environment::resolve(Some(Environment::Live), Some(Environment::Sandbox)),
            Environment::Live
        );
        // bound value wins over the default
        assert_eq!(
            Environment::resolve(None, Some(Environment::Live)),
            Environment::Live
        );
    }

    #[test]
    fn test_unknown_tag_falls_back_to_sandbox() {
        assert_eq!(Environment::from_tag("STAGING"), Environment::Sandbox);
        assert_eq!(Environment::from_tag(""), Environment::Sandbox);
        assert_eq!(Environment::from_tag("LIVE"), Environment::Live);
    }

    #[test]
    fn test_tag_serialization() {
        assert_eq!(
            serde_json::to_string(&Environment::Sandbox).unwrap(),
            "\"SANDBOX\""
        );
        assert_eq!(
            serde_json::to_string(&Environment::Live).unwrap(),
            "\"LIVE\""
        );
        let parsed: Environment = serde_json::from_str("\"LIVE\"").unwrap();
        assert_eq!(parsed, Environment::Live);
    }
}
