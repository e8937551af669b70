// Application layer - use cases and orchestration.
// The CLI (or any other front end) talks to LedgerService only; it never
// touches the CSV tables directly.

pub mod error;
pub mod reporting;
mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
