pub mod flow;
pub mod stages;

pub use flow::{transition, validate_stage, CheckoutError, CheckoutFlow};
pub use stages::{
    CheckoutAction, OrderField, OrderForm, Stage, TransitionOutcome, UnknownFieldError,
};
