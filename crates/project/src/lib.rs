pub mod config;
pub mod discover;
pub mod error;
pub mod layout;

pub use config::{DbtProject, PROJECT_DESCRIPTOR};
pub use discover::{MODELS_SEGMENT, discover_models, trim_from_segment};
pub use error::ProjectError;
pub use layout::{BuildTarget, ProjectLayout, TargetDir};
