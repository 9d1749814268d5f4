//! Types shared by every layer of the delivery backend.

pub mod types;

pub use types::RecordId;
