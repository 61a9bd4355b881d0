#![deny(missing_docs)]
#![doc = "Candidate record schema, presence rule and shared error types for the recruitment funnel engine."]

pub mod errors;
pub mod lenient;
mod record;

pub use errors::{ErrorInfo, FunnelError};
pub use record::{CandidateRecord, Presence, PLACEHOLDER};
