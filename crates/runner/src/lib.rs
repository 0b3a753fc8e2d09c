pub mod batch;
pub mod error;
pub mod runner;
pub mod validate;


pub use batch::{BatchValidator, FailurePolicy};
pub use error::RunnerError;
pub use runner::DryRunner;
pub use validate::{ModelUnit, UnitResult, validate_model};
