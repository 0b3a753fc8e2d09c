pub mod outcome;
pub mod report;
pub mod request;

pub use outcome::{FailureKind, ModelFailure, ModelOutcome, Verdict};
pub use report::{BatchReport, BatchStatus};
pub use request::DryRunRequest;
