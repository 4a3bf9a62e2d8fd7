pub mod checkout;
pub mod config;
pub mod domain;
pub mod errors;
pub mod session;

pub use checkout::{
    transition, validate_stage, CheckoutAction, CheckoutError, CheckoutFlow, OrderField, OrderForm,
    Stage, TransitionOutcome,
};
pub use domain::book::{Book, BookDraft, BookId};
pub use domain::borrow::{BorrowId, BorrowRecord, BorrowedBookRef, BorrowerRef};
pub use domain::user::{User, UserId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use session::{Session, SessionError, SessionStore};
