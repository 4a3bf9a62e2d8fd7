use thiserror::Error;

use crate::checkout::stages::{CheckoutAction, OrderField, OrderForm, Stage, TransitionOutcome};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Required inputs for the stage being left are empty. Display is the
    /// fixed per-stage banner text; the `missing` payload exists for logs
    /// and assertions only.
    #[error("{}", .stage.missing_fields_message())]
    MissingFields { stage: Stage, missing: Vec<OrderField> },
    #[error("no {action:?} transition is defined from the {stage:?} stage")]
    InvalidTransition { stage: Stage, action: CheckoutAction },
}

/// Per-stage guard, checked only when leaving a stage forward. Shipping
/// needs `name` and `address`; payment needs `cardNumber`, `expiry` and
/// `cvv`. Review has no rule. Non-emptiness is the whole check: formats
/// (card length, expiry shape) are deliberately not enforced.
pub fn validate_stage(stage: &Stage, form: &OrderForm) -> Result<(), CheckoutError> {
    let missing: Vec<OrderField> = stage
        .required_fields()
        .iter()
        .copied()
        .filter(|field| form.is_blank(*field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::MissingFields { stage: stage.clone(), missing })
    }
}

/// Pure transition table for the checkout wizard.
///
/// Advancing out of Shipping or Payment is guarded by [`validate_stage`];
/// back navigation is unguarded; Review completes unconditionally into
/// Confirmation. Every other (stage, action) pair is rejected, including
/// anything at Confirmation.
pub fn transition(
    current: &Stage,
    action: &CheckoutAction,
    form: &OrderForm,
) -> Result<TransitionOutcome, CheckoutError> {
    use CheckoutAction::{Advance, Complete, Retreat};
    use Stage::{Confirmation, Payment, Review, Shipping};

    let to = match (current, action) {
        (Shipping, Advance) => {
            validate_stage(current, form)?;
            Payment
        }
        (Payment, Advance) => {
            validate_stage(current, form)?;
            Review
        }
        (Payment, Retreat) => Shipping,
        (Review, Retreat) => Payment,
        (Review, Complete) => Confirmation,
        _ => {
            return Err(CheckoutError::InvalidTransition {
                stage: current.clone(),
                action: action.clone(),
            });
        }
    };

    Ok(TransitionOutcome { from: current.clone(), to, action: action.clone() })
}

/// One user's traversal of the checkout wizard: the current stage, the
/// collected form values, and the single visible validation message.
///
/// Owned exclusively by one view instance; dropped with it. Nothing here
/// is persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutFlow {
    stage: Stage,
    form: OrderForm,
    error: Option<String>,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn step(&self) -> u8 {
        self.stage.step()
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    /// The currently displayed validation message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Confirmation
    }

    pub fn set_field(&mut self, field: OrderField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Leave the current stage forward. On a failed guard the stage is
    /// unchanged and the validation message is replaced.
    pub fn advance(&mut self) -> Result<&Stage, CheckoutError> {
        self.apply(CheckoutAction::Advance)
    }

    /// Step back one stage, unconditionally, clearing any message.
    pub fn retreat(&mut self) -> Result<&Stage, CheckoutError> {
        self.apply(CheckoutAction::Retreat)
    }

    /// Confirm the order from the Review stage. Unguarded: review has no
    /// rule left to check. An order-submission request would be issued
    /// here; this client stops at the stage change.
    pub fn complete(&mut self) -> Result<&Stage, CheckoutError> {
        self.apply(CheckoutAction::Complete)
    }

    fn apply(&mut self, action: CheckoutAction) -> Result<&Stage, CheckoutError> {
        match transition(&self.stage, &action, &self.form) {
            Ok(outcome) => {
                self.stage = outcome.to;
                self.error = None;
                Ok(&self.stage)
            }
            Err(error) => {
                // An undefined (stage, action) pair is a caller bug, not a
                // user-visible validation failure; leave the banner alone.
                if matches!(error, CheckoutError::MissingFields { .. }) {
                    self.error = Some(error.to_string());
                }
                Err(error)
            }
        }
    }
}
