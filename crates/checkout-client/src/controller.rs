//! Checkout Controller
//!
//! Owns at most one open checkout for a page. Anything on the page that
//! offers a "Pay" button talks to the controller it was handed, instead of
//! reaching for page-global state.

use std::sync::Arc;

use checkout_core::{CheckoutError, PackageId, Result};

use crate::config::CheckoutConfig;
use crate::gateway::{GatewayTransaction, PaymentGateway};
use crate::session::{CheckoutSession, CheckoutState};
use crate::verifier::VerificationClient;

/// What the checkout needs from the page hosting it
pub trait PageHost: Send + Sync {
    /// Suspend or resume background page scrolling
    fn set_scroll_locked(&self, locked: bool);
}

/// Host with no page behind it (server-side rendering, tests)
pub struct NoopPageHost;

impl PageHost for NoopPageHost {
    fn set_scroll_locked(&self, _locked: bool) {}
}

/// Single owner of the page's checkout session
pub struct CheckoutController {
    config: CheckoutConfig,
    gateway: Arc<dyn PaymentGateway>,
    verifier: Arc<dyn VerificationClient>,
    host: Arc<dyn PageHost>,
    session: Option<CheckoutSession>,
}

impl CheckoutController {
    pub fn new(
        config: CheckoutConfig,
        gateway: Arc<dyn PaymentGateway>,
        verifier: Arc<dyn VerificationClient>,
        host: Arc<dyn PageHost>,
    ) -> Self {
        Self {
            config,
            gateway,
            verifier,
            host,
            session: None,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Current step, or `None` when checkout is closed
    pub fn state(&self) -> Option<&CheckoutState> {
        self.session.as_ref().map(CheckoutSession::state)
    }

    pub const fn session(&self) -> Option<&CheckoutSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut CheckoutSession> {
        self.session.as_mut()
    }

    /// Open checkout with a fresh draft. Reopening replaces any previous
    /// session unless a payment is in flight.
    pub fn open(&mut self, package_id: Option<PackageId>) -> Result<&CheckoutState> {
        if self.session.as_ref().is_some_and(|s| !s.can_close()) {
            return Err(CheckoutError::InvalidTransition {
                action: "open",
                state: "processing",
            });
        }

        let package_id = package_id.unwrap_or(self.config.default_package);
        tracing::debug!(package = %package_id, "Opening checkout");

        let session = CheckoutSession::new(
            package_id,
            self.config.public_key.clone(),
            self.gateway.clone(),
            self.verifier.clone(),
        );
        self.host.set_scroll_locked(true);
        Ok(self.session.insert(session).state())
    }

    /// Close checkout and discard the draft. Refused while processing.
    pub fn close(&mut self) -> Result<()> {
        match &self.session {
            None => Ok(()),
            Some(session) if !session.can_close() => Err(CheckoutError::InvalidTransition {
                action: "close",
                state: session.state().name(),
            }),
            Some(_) => {
                self.session = None;
                self.host.set_scroll_locked(false);
                Ok(())
            }
        }
    }

    /// Submit the open checkout. Scrolling resumes once the payment is
    /// confirmed.
    pub async fn submit(&mut self) -> Result<&CheckoutState> {
        let session = self.session.as_mut().ok_or(closed("submit"))?;
        session.submit().await?;

        release_scroll_if_done(self.host.as_ref(), session.state());
        Ok(session.state())
    }

    /// Forward the widget's success callback to the open session, for hosts
    /// that drive the gateway themselves after `begin_payment`.
    pub async fn on_gateway_success(
        &mut self,
        transaction: GatewayTransaction,
    ) -> Result<&CheckoutState> {
        let session = self.session.as_mut().ok_or(closed("confirm"))?;
        session.on_gateway_success(transaction).await;

        release_scroll_if_done(self.host.as_ref(), session.state());
        Ok(session.state())
    }
}

const fn closed(action: &'static str) -> CheckoutError {
    CheckoutError::InvalidTransition {
        action,
        state: "closed",
    }
}

fn release_scroll_if_done(host: &dyn PageHost, state: &CheckoutState) {
    if state.is_terminal() {
        host.set_scroll_locked(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayOutcome, GatewayRequest};
    use async_trait::async_trait;
    use checkout_core::{TransactionReference, VerifiedPayment, VerifyPaymentResponse};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct RecordingHost {
        locked: AtomicBool,
    }

    impl PageHost for RecordingHost {
        fn set_scroll_locked(&self, locked: bool) {
            self.locked.store(locked, Ordering::SeqCst);
        }
    }

    struct PayingGateway;

    #[async_trait]
    impl PaymentGateway for PayingGateway {
        async fn open(&self, request: GatewayRequest) -> Result<GatewayOutcome> {
            Ok(GatewayOutcome::Success(GatewayTransaction {
                reference: request.reference.to_string(),
                ..Default::default()
            }))
        }
    }

    struct ApprovingVerifier;

    #[async_trait]
    impl VerificationClient for ApprovingVerifier {
        async fn verify(&self, reference: &TransactionReference) -> Result<VerifyPaymentResponse> {
            Ok(VerifyPaymentResponse::verified(VerifiedPayment {
                reference: reference.to_string(),
                amount: dec!(19322),
                currency: "KES".into(),
                status: "success".into(),
                paid_at: None,
                channel: None,
                customer_email: None,
            }))
        }
    }

    fn controller(host: Arc<RecordingHost>) -> CheckoutController {
        CheckoutController::new(
            CheckoutConfig::with_public_key("pk_test"),
            Arc::new(PayingGateway),
            Arc::new(ApprovingVerifier),
            host,
        )
    }

    #[test]
    fn test_open_and_close_toggle_scroll() {
        let host = Arc::new(RecordingHost::default());
        let mut checkout = controller(host.clone());
        assert!(checkout.state().is_none());

        checkout.open(None).unwrap();
        assert!(host.locked.load(Ordering::SeqCst));
        assert_eq!(
            checkout.session().and_then(|s| s.draft()).map(|d| d.selected_package_id()),
            Some(PackageId::AiAudit)
        );

        checkout.close().unwrap();
        assert!(!host.locked.load(Ordering::SeqCst));
        assert!(!checkout.is_open());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = controller(Arc::new(RecordingHost::default()));
        let mut b = controller(Arc::new(RecordingHost::default()));

        a.open(Some(PackageId::Growth)).unwrap();
        b.open(Some(PackageId::Starter)).unwrap();
        a.session_mut()
            .unwrap()
            .edit_draft(|d| d.customer_name = "Alice".into())
            .unwrap();

        assert_eq!(
            b.session().and_then(|s| s.draft()).map(|d| d.customer_name.clone()),
            Some(String::new())
        );
    }

    #[test]
    fn test_close_refused_while_processing() {
        let mut checkout = controller(Arc::new(RecordingHost::default()));
        checkout.open(Some(PackageId::AiAudit)).unwrap();
        let session = checkout.session_mut().unwrap();
        session
            .edit_draft(|d| {
                d.customer_name = "John Doe".into();
                d.customer_email = "john@example.com".into();
                d.set_phone_number("+254712345678");
            })
            .unwrap();
        session.begin_payment().unwrap().unwrap();

        assert!(checkout.close().is_err());
        assert!(checkout.open(None).is_err());

        checkout.session_mut().unwrap().on_gateway_cancel();
        assert!(checkout.close().is_ok());
    }

    #[tokio::test]
    async fn test_success_releases_scroll() {
        let host = Arc::new(RecordingHost::default());
        let mut checkout = controller(host.clone());
        checkout.open(Some(PackageId::AiAudit)).unwrap();
        checkout
            .session_mut()
            .unwrap()
            .edit_draft(|d| {
                d.customer_name = "John Doe".into();
                d.customer_email = "john@example.com".into();
                d.set_phone_number("+254712345678");
            })
            .unwrap();

        let state = checkout.submit().await.unwrap();
        assert!(state.is_terminal());
        assert!(!host.locked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_step_by_step_success_releases_scroll() {
        let host = Arc::new(RecordingHost::default());
        let mut checkout = controller(host.clone());
        checkout.open(Some(PackageId::AiAudit)).unwrap();

        let session = checkout.session_mut().unwrap();
        session
            .edit_draft(|d| {
                d.customer_name = "John Doe".into();
                d.customer_email = "john@example.com".into();
                d.set_phone_number("+254712345678");
            })
            .unwrap();
        let request = session.begin_payment().unwrap().unwrap();
        assert!(host.locked.load(Ordering::SeqCst));

        let state = checkout
            .on_gateway_success(GatewayTransaction {
                reference: request.reference.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(state.is_terminal());
        assert!(!host.locked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_submit_when_closed() {
        let mut checkout = controller(Arc::new(RecordingHost::default()));
        assert!(checkout.submit().await.is_err());
    }
}
