use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving a project and its compiled output.
///
/// All of these are configuration-class failures: they abort the run before
/// any model is submitted.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project descriptor not found: {0}")]
    DescriptorMissing(PathBuf),

    #[error("Failed to read project descriptor {path}: {source}")]
    DescriptorRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse project descriptor {path}: {source}")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Project descriptor {0} does not declare a project name")]
    NameMissing(PathBuf),

    #[error("Compiled models directory not found: {0}")]
    TargetDirMissing(PathBuf),

    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
