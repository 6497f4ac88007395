//! Application State

use std::sync::Arc;

use checkout_payments::VerificationService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Gateway-backed verification (unconfigured when no secret key is set)
    pub verifier: Arc<VerificationService>,

    /// Public key handed to the browser for the hosted widget
    pub public_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(verifier: VerificationService, public_key: Option<String>) -> Self {
        Self {
            verifier: Arc::new(verifier),
            public_key: public_key
                .filter(|k| !k.trim().is_empty())
                .map(Arc::from),
        }
    }
}
