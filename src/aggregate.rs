use std::collections::HashSet;

use log::{debug, info};
use thiserror::Error;

use crate::{
    model::{
        benchmark::{BenchmarkDataset, BenchmarkEntry},
        framework::{Framework, FrameworkName, ResolvedIdentity},
    },
    resolver::IdentityResolver,
    results::{ResultError, ResultLoader},
    source::{load_manifest, ManifestLocation, ManifestSource, SourceError},
};

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error("Framework {0} is configured more than once")]
    DuplicateFramework(FrameworkName),
}

/// Builds the ranked benchmark dataset out of the project manifests and the
/// per-framework result artifacts.
pub struct Aggregator {
    frameworks: Vec<Framework>,
    source: Box<dyn ManifestSource>,
    results: Box<dyn ResultLoader>,
}

impl Aggregator {
    pub fn new(
        frameworks: Vec<Framework>,
        source: Box<dyn ManifestSource>,
        results: Box<dyn ResultLoader>,
    ) -> Self {
        Aggregator {
            frameworks,
            source,
            results,
        }
    }

    pub fn frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    /// Resolves every configured framework's version and repository, in
    /// configured order.
    pub async fn resolve(&self) -> Result<Vec<ResolvedIdentity>, AggregateError> {
        self.check_unique()?;

        let manifest = load_manifest(self.source.as_ref(), &ManifestLocation::Root).await?;
        debug!(
            "Root manifest {} {} declares {} dependencies",
            manifest.name,
            manifest.version,
            manifest.dependencies.len()
        );
        let resolver = IdentityResolver::new(self.source.as_ref(), &manifest);

        let mut identities = Vec::with_capacity(self.frameworks.len());
        for framework in &self.frameworks {
            identities.push(resolver.resolve(framework).await?);
        }
        Ok(identities)
    }

    /// Runs the whole pipeline. Any unreadable manifest or missing result
    /// fails the run, there is no partial dataset.
    pub async fn aggregate(&self) -> Result<BenchmarkDataset, AggregateError> {
        let identities = self.resolve().await?;

        let mut entries = Vec::with_capacity(identities.len());
        for identity in identities {
            let result = self.results.load(&identity.name).await?;
            debug!(
                "{} {}: {} requests/s",
                identity.name, identity.version, result.summary.requests_per_sec
            );
            entries.push(BenchmarkEntry::new(identity, &result));
        }

        let dataset = BenchmarkDataset::from_entries(entries);
        info!(
            "Aggregated {} benchmark results, top throughput {} requests/s",
            dataset.len(),
            dataset.max_rps()
        );
        Ok(dataset)
    }

    fn check_unique(&self) -> Result<(), AggregateError> {
        let mut seen = HashSet::new();
        for framework in &self.frameworks {
            if !seen.insert(&framework.name) {
                return Err(AggregateError::DuplicateFramework(framework.name.clone()));
            }
        }
        Ok(())
    }
}
