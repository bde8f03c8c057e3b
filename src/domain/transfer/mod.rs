//! Transfer domain module

mod amount;
mod extractor;
mod request;
mod result;
mod state;

pub use amount::{group_thousands, Amount, CHEON, MAN};
pub use extractor::{TransferExtractor, TransferPattern};
pub use request::TransferRequest;
pub use result::{TransactionId, TransferResult};
pub use state::{FailureKind, InvalidStateTransition, TransferEvent, TransferFailure, TransferState};
