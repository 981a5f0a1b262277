use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use log::trace;

use super::{ManifestLocation, ManifestSource, SourceError};

/// Manifests read from a checkout of the benchmark project.
#[derive(Debug, Clone)]
pub struct FileManifestSource {
    root: PathBuf,
}

impl FileManifestSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileManifestSource { root: root.into() }
    }

    pub fn path(&self, location: &ManifestLocation) -> PathBuf {
        self.root.join(location.relative_path())
    }
}

#[async_trait]
impl ManifestSource for FileManifestSource {
    async fn read(&self, location: &ManifestLocation) -> Result<String, SourceError> {
        let path = self.path(location);
        trace!("Reading manifest from {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|error| match error.kind() {
                ErrorKind::NotFound => SourceError::NotFound {
                    location: location.clone(),
                },
                _ => SourceError::IO {
                    location: location.clone(),
                    source: error,
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::framework::FrameworkName;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn read_root_and_framework_manifests() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("build.zig.zon"), "root").unwrap();
        let nested = dir.path().join("src/frameworks/zzz");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("build.zig.zon"), "nested").unwrap();

        let source = FileManifestSource::new(dir.path());
        assert_eq!(source.read(&ManifestLocation::Root).await.unwrap(), "root");
        assert_eq!(
            source
                .read(&ManifestLocation::Framework(FrameworkName::from("zzz")))
                .await
                .unwrap(),
            "nested"
        );
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileManifestSource::new(dir.path());
        let err = source.read(&ManifestLocation::Root).await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }), "{err}");
    }
}
