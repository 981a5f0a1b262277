use std::collections::HashMap;

use async_trait::async_trait;

use super::{ManifestLocation, ManifestSource, SourceError};

/// Manifests held in memory, e.g. compiled in with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedManifestSource {
    manifests: HashMap<ManifestLocation, String>,
}

impl EmbeddedManifestSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(mut self, location: ManifestLocation, contents: impl Into<String>) -> Self {
        self.manifests.insert(location, contents.into());
        self
    }
}

#[async_trait]
impl ManifestSource for EmbeddedManifestSource {
    async fn read(&self, location: &ManifestLocation) -> Result<String, SourceError> {
        self.manifests
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                location: location.clone(),
            })
    }
}
