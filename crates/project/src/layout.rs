use crate::error::ProjectError;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Which compiled flavor of the project to validate. dbt writes each flavor
/// under its own sub-directory of `target/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildTarget {
    /// Plain `dbt compile` output, directly under `target/`.
    #[default]
    Default,
    Incremental,
    FullRefresh,
}

impl BuildTarget {
    /// Directory segment between `target/` and `compiled/`, if any.
    pub fn sub_dir(&self) -> Option<&'static str> {
        match self {
            BuildTarget::Default => None,
            BuildTarget::Incremental => Some("incremental"),
            BuildTarget::FullRefresh => Some("full_refresh"),
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sub_dir().unwrap_or("default"))
    }
}

/// Project root plus project name: everything needed to locate compiled
/// model trees by convention.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    project_name: String,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        ProjectLayout {
            root: root.into(),
            project_name: project_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// `<root>/target[/<sub>]/compiled/<name>/models`
    pub fn compiled_models_dir(&self, target: BuildTarget) -> TargetDir {
        let mut path = self.root.join("target");
        if let Some(sub) = target.sub_dir() {
            path.push(sub);
        }
        path.push("compiled");
        path.push(&self.project_name);
        path.push("models");
        TargetDir { path }
    }
}

/// A resolved compiled-models directory. Construction never touches the
/// filesystem; call [`TargetDir::verify`] before enumerating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDir {
    path: PathBuf,
}

impl TargetDir {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail fast when the directory is absent, before any unit work starts.
    pub fn verify(&self) -> Result<(), ProjectError> {
        if !self.path.exists() {
            return Err(ProjectError::TargetDirMissing(self.path.clone()));
        }
        if !self.path.is_dir() {
            return Err(ProjectError::NotADirectory(self.path.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for TargetDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.display().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn compiled_models_dir_follows_the_target_conventions() {
        let layout = ProjectLayout::new("/work/acme", "acme_analytics");

        assert_eq!(
            layout.compiled_models_dir(BuildTarget::Default).path(),
            Path::new("/work/acme/target/compiled/acme_analytics/models")
        );
        assert_eq!(
            layout.compiled_models_dir(BuildTarget::Incremental).path(),
            Path::new("/work/acme/target/incremental/compiled/acme_analytics/models")
        );
        assert_eq!(
            layout.compiled_models_dir(BuildTarget::FullRefresh).path(),
            Path::new("/work/acme/target/full_refresh/compiled/acme_analytics/models")
        );
    }

    #[test]
    fn verify_rejects_a_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path(), "acme");
        let target = layout.compiled_models_dir(BuildTarget::Incremental);

        assert!(matches!(
            target.verify().unwrap_err(),
            ProjectError::TargetDirMissing(_)
        ));
    }

    #[test]
    fn verify_rejects_a_file_where_a_directory_is_expected() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path(), "acme");
        let target = layout.compiled_models_dir(BuildTarget::Default);

        fs::create_dir_all(target.path().parent().unwrap()).unwrap();
        fs::write(target.path(), "not a directory").unwrap();

        assert!(matches!(
            target.verify().unwrap_err(),
            ProjectError::NotADirectory(_)
        ));
    }
}
