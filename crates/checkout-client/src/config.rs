//! Client Configuration

use checkout_core::PackageId;

/// Checkout client configuration
#[derive(Clone, Debug)]
pub struct CheckoutConfig {
    /// Gateway public key handed to the hosted widget
    pub public_key: Option<String>,

    /// Verification endpoint URL
    pub verify_url: String,

    /// Package preselected when checkout opens without one
    pub default_package: PackageId,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            public_key: None,
            verify_url: "http://localhost:3000/api/verify-payment".into(),
            default_package: PackageId::default(),
        }
    }
}

impl CheckoutConfig {
    pub fn from_env() -> Self {
        let public_key = std::env::var("PAYSTACK_PUBLIC_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let verify_url = std::env::var("CHECKOUT_VERIFY_URL")
            .unwrap_or_else(|_| Self::default().verify_url);

        Self {
            public_key,
            verify_url,
            ..Default::default()
        }
    }

    /// Configuration with a public key, for wiring and tests
    pub fn with_public_key(public_key: impl Into<String>) -> Self {
        Self {
            public_key: Some(public_key.into()),
            ..Default::default()
        }
    }
}
