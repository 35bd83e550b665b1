mod collection_session;
mod queue_session;
pub mod selection;

pub use collection_session::{
    CollectionSession, CollectionSnapshot, LoadOutcome, EMPTY_USERNAME_ERROR,
};
pub use queue_session::{QueueSession, QueueSnapshot, ALREADY_QUEUED_ERROR};
