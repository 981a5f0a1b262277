//! Where `build.zig.zon` manifests are read from.

mod embedded;
mod file;
mod remote;

use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use log::debug;
use thiserror::Error;

use crate::model::{
    framework::FrameworkName,
    manifest::{DependencyManifest, MANIFEST_FILE_NAME},
    ParseError,
};

pub use embedded::EmbeddedManifestSource;
pub use file::FileManifestSource;
pub use remote::{RemoteManifestSource, DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT};

/// Identifies one manifest of the benchmark project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ManifestLocation {
    /// The project's own `build.zig.zon`.
    Root,
    /// `src/frameworks/<name>/build.zig.zon`, shipped by a benchmark app that
    /// pins its own version of the framework.
    Framework(FrameworkName),
}

impl ManifestLocation {
    /// Path relative to the project root, always `/` separated.
    pub fn relative_path(&self) -> String {
        match self {
            ManifestLocation::Root => MANIFEST_FILE_NAME.to_string(),
            ManifestLocation::Framework(name) => {
                format!("src/frameworks/{name}/{MANIFEST_FILE_NAME}")
            }
        }
    }
}

impl Display for ManifestLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.relative_path())
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Manifest {location} not found")]
    NotFound { location: ManifestLocation },
    #[error("IO error reading manifest {location}: {source}")]
    IO {
        location: ManifestLocation,
        source: std::io::Error,
    },
    #[error("HTTP error fetching {url}: {source}")]
    Http { url: String, source: reqwest::Error },
    #[error("Timed out fetching {url}")]
    Timeout { url: String },
    #[error("Could not parse manifest {location}: {source}")]
    Parse {
        location: ManifestLocation,
        source: ParseError,
    },
}

#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Returns the raw text of the manifest at `location`.
    async fn read(&self, location: &ManifestLocation) -> Result<String, SourceError>;
}

/// Reads and parses the manifest at `location`.
pub async fn load_manifest(
    source: &dyn ManifestSource,
    location: &ManifestLocation,
) -> Result<DependencyManifest, SourceError> {
    debug!("Loading manifest {}", location);
    let contents = source.read(location).await?;
    DependencyManifest::from_zon_str(&contents).map_err(|source| SourceError::Parse {
        location: location.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn manifest_paths() {
        assert_eq!(ManifestLocation::Root.relative_path(), "build.zig.zon");
        assert_eq!(
            ManifestLocation::Framework(FrameworkName::from("zzz")).relative_path(),
            "src/frameworks/zzz/build.zig.zon"
        );
    }

    #[tokio::test]
    async fn parse_error_names_the_manifest() {
        let source = EmbeddedManifestSource::new().with_manifest(ManifestLocation::Root, ".{");
        let err = load_manifest(&source, &ManifestLocation::Root)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, SourceError::Parse { location: ManifestLocation::Root, .. }),
            "{err}"
        );
    }

    #[tokio::test]
    async fn missing_manifest() {
        let source = EmbeddedManifestSource::new();
        let err = load_manifest(&source, &ManifestLocation::Root)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Manifest build.zig.zon not found");
    }
}
