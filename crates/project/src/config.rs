use crate::error::ProjectError;
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};

/// File name dbt gives its project descriptor.
pub const PROJECT_DESCRIPTOR: &str = "dbt_project.yml";

/// The slice of `dbt_project.yml` this tool needs. dbt ships many more keys;
/// they are carried as an opaque map rather than validated here.
#[derive(Debug, Clone, Deserialize)]
pub struct DbtProject {
    name: String,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

impl DbtProject {
    /// Read `<dir>/dbt_project.yml`. Loaded once per run, never written back.
    pub fn load(dir: &Path) -> Result<Self, ProjectError> {
        let path = dir.join(PROJECT_DESCRIPTOR);
        if !path.is_file() {
            return Err(ProjectError::DescriptorMissing(path));
        }

        let raw = fs::read_to_string(&path).map_err(|source| ProjectError::DescriptorRead {
            path: path.clone(),
            source,
        })?;
        let project: DbtProject =
            serde_yaml::from_str(&raw).map_err(|source| ProjectError::DescriptorParse {
                path: path.clone(),
                source,
            })?;

        if project.name.trim().is_empty() {
            return Err(ProjectError::NameMissing(path));
        }
        Ok(project)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extra(&self) -> &BTreeMap<String, serde_yaml::Value> {
        &self.extra
    }
}
