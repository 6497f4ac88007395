//! Checkout Session
//!
//! State machine for a single open checkout: `Form → Processing →
//! {Success, Error}`. Every path out of `Processing` lands in `Success`,
//! `Error`, or back in `Form`.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use checkout_core::currency::SETTLEMENT_CURRENCY;
use checkout_core::validation::{self, Field, ValidationReport};
use checkout_core::{CheckoutDraft, CheckoutError, PackageId, Result, TransactionReference};

use crate::gateway::{GatewayOutcome, GatewayRequest, GatewayTransaction, PaymentGateway};
use crate::verifier::VerificationClient;

const GATEWAY_FAILED: &str = "Payment failed. Please try again.";
const VERIFICATION_REJECTED: &str = "Payment verification failed";

/// What the customer sees after a verified payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub reference: TransactionReference,
    #[serde(with = "rust_decimal::serde::float")]
    pub settlement_amount: Decimal,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_usd: Decimal,
    pub package_name: String,
}

/// Checkout step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutState {
    /// Editing; carries errors from the last failed submit
    Form { errors: ValidationReport },

    /// Popup open or verification in flight
    Processing { reference: TransactionReference },

    /// Verified by the server. Terminal.
    Success(PaymentSummary),

    /// Failed attempt; the reference is kept for support
    Error {
        message: String,
        reference: Option<TransactionReference>,
    },
}

impl CheckoutState {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Form { .. } => "form",
            Self::Processing { .. } => "processing",
            Self::Success(_) => "success",
            Self::Error { .. } => "error",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub const fn is_processing(&self) -> bool {
        matches!(self, Self::Processing { .. })
    }

    fn form() -> Self {
        Self::Form {
            errors: ValidationReport::default(),
        }
    }
}

/// One open checkout: the draft plus its state machine
pub struct CheckoutSession {
    draft: Option<CheckoutDraft>,
    state: CheckoutState,
    public_key: Option<String>,
    gateway: Arc<dyn PaymentGateway>,
    verifier: Arc<dyn VerificationClient>,
}

impl CheckoutSession {
    pub fn new(
        package_id: PackageId,
        public_key: Option<String>,
        gateway: Arc<dyn PaymentGateway>,
        verifier: Arc<dyn VerificationClient>,
    ) -> Self {
        Self {
            draft: Some(CheckoutDraft::new(package_id)),
            state: CheckoutState::form(),
            public_key,
            gateway,
            verifier,
        }
    }

    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// `None` once the payment succeeded and the draft was discarded
    pub const fn draft(&self) -> Option<&CheckoutDraft> {
        self.draft.as_ref()
    }

    /// Closing mid-payment would orphan the gateway popup
    pub const fn can_close(&self) -> bool {
        !self.state.is_processing()
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Edit the draft. Only allowed in `Form`; errors on the fields that
    /// changed are cleared.
    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut CheckoutDraft)) -> Result<()> {
        if !matches!(self.state, CheckoutState::Form { .. }) {
            return Err(self.invalid("edit"));
        }
        let (CheckoutState::Form { errors }, Some(draft)) = (&mut self.state, self.draft.as_mut())
        else {
            return Err(CheckoutError::InvalidTransition {
                action: "edit",
                state: "success",
            });
        };

        let before = draft.clone();
        edit(draft);

        if draft.customer_name != before.customer_name {
            errors.clear(Field::Name);
        }
        if draft.customer_email != before.customer_email {
            errors.clear(Field::Email);
        }
        if draft.phone_number() != before.phone_number() {
            errors.clear(Field::Phone);
        }
        if draft.amount_usd != before.amount_usd
            || draft.selected_package_id() != before.selected_package_id()
        {
            errors.clear(Field::Amount);
        }
        Ok(())
    }

    /// Validate and, if the draft is good, mint a reference and move to
    /// `Processing`. Returns the request to hand to the gateway.
    ///
    /// `Ok(None)` means the session stayed in `Form` with field errors, or
    /// moved to `Error` because no public key is configured.
    pub fn begin_payment(&mut self) -> Result<Option<GatewayRequest>> {
        if !matches!(self.state, CheckoutState::Form { .. }) {
            return Err(self.invalid("submit"));
        }
        // A fixed-price package is always charged at its list price
        if let Some(draft) = self.draft.as_mut() {
            draft.amount_usd = draft.charge_amount_usd();
        }
        let Some(draft) = self.draft.as_ref() else {
            return Err(self.invalid("submit"));
        };

        let report = validation::validate(draft);
        if !report.is_valid() {
            tracing::debug!(fields = ?report.field_errors.keys(), "Checkout form rejected");
            self.state = CheckoutState::Form { errors: report };
            return Ok(None);
        }

        let Some(public_key) = self.public_key.as_deref() else {
            tracing::error!("Gateway public key not configured");
            self.state = CheckoutState::Error {
                message: CheckoutError::Config(String::new()).user_message().into(),
                reference: None,
            };
            return Ok(None);
        };

        let reference = TransactionReference::generate(draft.selected_package_id());
        let request = GatewayRequest::from_draft(draft, public_key, reference.clone());

        tracing::info!(
            reference = %reference,
            package = %draft.selected_package_id(),
            amount_usd = %draft.charge_amount_usd(),
            "Starting payment"
        );
        self.state = CheckoutState::Processing { reference };
        Ok(Some(request))
    }

    /// Submit the form and drive the attempt to its next resting state
    pub async fn submit(&mut self) -> Result<&CheckoutState> {
        let Some(request) = self.begin_payment()? else {
            return Ok(&self.state);
        };

        let outcome = self.gateway.open(request).await;
        match outcome {
            Ok(GatewayOutcome::Success(transaction)) => {
                self.on_gateway_success(transaction).await;
            }
            Ok(GatewayOutcome::Cancelled) => {
                self.on_gateway_cancel();
            }
            Ok(GatewayOutcome::Failed { message }) => {
                self.on_gateway_error(message);
            }
            Err(e) => {
                self.on_gateway_unavailable(&e);
            }
        }
        Ok(&self.state)
    }

    fn pending_reference(&self, event: &str) -> Option<TransactionReference> {
        if let CheckoutState::Processing { reference } = &self.state {
            Some(reference.clone())
        } else {
            tracing::warn!(event, state = self.state.name(), "Ignoring gateway event");
            None
        }
    }

    /// The popup reported a charge. Confirm it server-side before
    /// believing it.
    pub async fn on_gateway_success(&mut self, transaction: GatewayTransaction) -> &CheckoutState {
        let Some(pending) = self.pending_reference("success") else {
            return &self.state;
        };

        if transaction.reference != pending.as_str() {
            tracing::error!(
                expected = %pending,
                reported = %transaction.reference,
                "Gateway reported a different reference"
            );
            self.state = CheckoutState::Error {
                message: CheckoutError::Verification(String::new()).user_message().into(),
                reference: Some(pending),
            };
            return &self.state;
        }

        let verdict = self.verifier.verify(&pending).await;
        self.state = match verdict {
            Ok(verdict) if verdict.success => {
                let summary = self.summarize(pending, verdict.data);
                tracing::info!(reference = %summary.reference, "Payment verified");
                self.draft = None;
                CheckoutState::Success(summary)
            }
            Ok(verdict) => {
                tracing::warn!(reference = %pending, message = %verdict.message, "Payment not verified");
                let message = if verdict.message.is_empty() {
                    VERIFICATION_REJECTED.to_string()
                } else {
                    verdict.message
                };
                CheckoutState::Error {
                    message,
                    reference: Some(pending),
                }
            }
            Err(e) => {
                tracing::error!(reference = %pending, error = %e, "Verification call failed");
                CheckoutState::Error {
                    message: e.user_message().into(),
                    reference: Some(pending),
                }
            }
        };
        &self.state
    }

    /// Customer closed the popup. Back to the form, draft untouched.
    pub fn on_gateway_cancel(&mut self) -> &CheckoutState {
        if let Some(reference) = self.pending_reference("cancel") {
            tracing::info!(reference = %reference, "Payment cancelled by customer");
            self.state = CheckoutState::form();
        }
        &self.state
    }

    /// The popup reported a failure
    pub fn on_gateway_error(&mut self, message: Option<String>) -> &CheckoutState {
        if let Some(reference) = self.pending_reference("error") {
            let message = message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GATEWAY_FAILED.to_string());
            tracing::warn!(reference = %reference, message = %message, "Gateway reported failure");
            self.state = CheckoutState::Error {
                message,
                reference: Some(reference),
            };
        }
        &self.state
    }

    /// The popup never opened
    pub fn on_gateway_unavailable(&mut self, error: &CheckoutError) -> &CheckoutState {
        if let Some(reference) = self.pending_reference("unavailable") {
            tracing::error!(reference = %reference, error = %error, "Could not open payment popup");
            self.state = CheckoutState::Error {
                message: CheckoutError::Gateway(String::new()).user_message().into(),
                reference: Some(reference),
            };
        }
        &self.state
    }

    /// Leave `Error` for `Form`, keeping the draft
    pub fn retry(&mut self) -> Result<&CheckoutState> {
        if !matches!(self.state, CheckoutState::Error { .. }) {
            return Err(self.invalid("retry"));
        }
        self.state = CheckoutState::form();
        Ok(&self.state)
    }

    fn summarize(
        &self,
        reference: TransactionReference,
        verified: Option<checkout_core::VerifiedPayment>,
    ) -> PaymentSummary {
        let (amount_usd, package_name, fallback_amount) = self.draft.as_ref().map_or_else(
            || (Decimal::ZERO, String::new(), Decimal::ZERO),
            |d| {
                (
                    d.charge_amount_usd(),
                    d.package().name.to_string(),
                    Decimal::from(d.settlement_amount()),
                )
            },
        );

        // The server's figure wins over our own conversion
        let (settlement_amount, currency) = verified.map_or_else(
            || (fallback_amount, SETTLEMENT_CURRENCY.to_string()),
            |v| (v.amount, v.currency),
        );

        PaymentSummary {
            reference,
            settlement_amount,
            currency,
            amount_usd,
            package_name,
        }
    }
}
