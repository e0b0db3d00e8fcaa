//! Chart model and directory loading

use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Chart metadata, parsed from `Chart.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    /// Chart name (required)
    pub name: String,

    /// Chart version (SemVer)
    #[serde(default)]
    pub version: Option<Version>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Application version
    #[serde(default)]
    pub app_version: Option<String>,

    /// Keywords
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Source URLs
    #[serde(default)]
    pub sources: Vec<String>,
}

/// A single file inside a chart, addressed by its `/`-separated relative path
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFile {
    /// Path relative to the chart root (e.g. `templates/deployment.yaml`)
    pub path: String,

    /// Raw file contents
    pub data: Vec<u8>,
}

/// An in-memory chart tree
///
/// `Chart.yaml` and `values.yaml` are held separately from the remaining
/// files (templates, CRDs, helper documents).
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Chart metadata
    pub metadata: ChartMetadata,

    /// Raw `values.yaml` contents, if present
    pub values_yaml: Option<String>,

    /// All other files, sorted by path
    pub files: Vec<ChartFile>,
}

impl Chart {
    /// Load a chart from a directory
    pub fn load_dir<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref();

        if !root.is_dir() {
            return Err(CoreError::ChartNotFound {
                path: root.display().to_string(),
            });
        }

        let metadata_path = root.join("Chart.yaml");
        if !metadata_path.exists() {
            return Err(CoreError::InvalidChart {
                message: format!("Chart.yaml not found in {}", root.display()),
            });
        }

        let metadata_content = std::fs::read_to_string(&metadata_path)?;
        let metadata: ChartMetadata = serde_yaml::from_str(&metadata_content)?;
        if metadata.name.is_empty() {
            return Err(CoreError::InvalidChart {
                message: format!("chart name is empty in {}", metadata_path.display()),
            });
        }

        let values_path = root.join("values.yaml");
        let values_yaml = if values_path.exists() {
            Some(std::fs::read_to_string(&values_path)?)
        } else {
            None
        };

        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let file_path = entry.path();
            if !file_path.is_file() {
                continue;
            }

            let relative = file_path
                .strip_prefix(root)
                .unwrap_or(file_path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if relative == "Chart.yaml" || relative == "values.yaml" {
                continue;
            }

            files.push(ChartFile {
                path: relative,
                data: std::fs::read(file_path)?,
            });
        }

        // Sort for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Self {
            metadata,
            values_yaml,
            files,
        })
    }

    /// Look up a file by its relative path
    pub fn file(&self, path: &str) -> Option<&ChartFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// The chart name
    #[inline]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_test_chart(dir: &Path) {
        std::fs::write(
            dir.join("Chart.yaml"),
            "name: testchart\nversion: 1.2.3\ndescription: A test chart\n",
        )
        .unwrap();
        std::fs::write(dir.join("values.yaml"), "replicas: 3\n").unwrap();

        let templates = dir.join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(
            templates.join("deployment.yaml"),
            "apiVersion: apps/v1\nkind: Deployment\n",
        )
        .unwrap();
        std::fs::write(templates.join("service.yaml"), "kind: Service\n").unwrap();
    }

    #[test]
    fn test_metadata_deserialize() {
        let yaml = "name: myapp\nversion: 1.0.0\nappVersion: \"2.4\"\nkeywords: [web]\n";
        let metadata: ChartMetadata = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(metadata.name, "myapp");
        assert_eq!(metadata.version, Some(Version::new(1, 0, 0)));
        assert_eq!(metadata.app_version.as_deref(), Some("2.4"));
        assert_eq!(metadata.keywords, vec!["web"]);
    }

    #[test]
    fn test_metadata_version_optional() {
        let metadata: ChartMetadata = serde_yaml::from_str("name: bare\n").unwrap();
        assert_eq!(metadata.name, "bare");
        assert!(metadata.version.is_none());
    }

    #[test]
    fn test_load_dir() {
        let temp = TempDir::new().unwrap();
        write_test_chart(temp.path());

        let chart = Chart::load_dir(temp.path()).unwrap();

        assert_eq!(chart.name(), "testchart");
        assert_eq!(chart.metadata.version, Some(Version::new(1, 2, 3)));
        assert_eq!(chart.values_yaml.as_deref(), Some("replicas: 3\n"));
        assert_eq!(chart.files.len(), 2);
        assert!(chart.file("templates/deployment.yaml").is_some());
        assert!(chart.file("templates/service.yaml").is_some());
        // Chart.yaml and values.yaml are held separately, not in files
        assert!(chart.file("Chart.yaml").is_none());
    }

    #[test]
    fn test_load_dir_files_sorted() {
        let temp = TempDir::new().unwrap();
        write_test_chart(temp.path());

        let chart = Chart::load_dir(temp.path()).unwrap();
        let paths: Vec<_> = chart.files.iter().map(|f| f.path.as_str()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn test_load_dir_missing() {
        let temp = TempDir::new().unwrap();
        let result = Chart::load_dir(temp.path().join("nope"));
        assert!(matches!(result, Err(CoreError::ChartNotFound { .. })));
    }

    #[test]
    fn test_load_dir_without_metadata() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("values.yaml"), "a: 1\n").unwrap();

        let result = Chart::load_dir(temp.path());
        assert!(matches!(result, Err(CoreError::InvalidChart { .. })));
    }

    #[test]
    fn test_load_dir_empty_name() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Chart.yaml"), "name: \"\"\n").unwrap();

        let result = Chart::load_dir(temp.path());
        assert!(matches!(result, Err(CoreError::InvalidChart { .. })));
    }
}
