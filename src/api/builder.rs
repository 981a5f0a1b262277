use std::{env, path::PathBuf};

use anyhow::bail;

use crate::{
    aggregate::Aggregator,
    config::{default_frameworks, DEFAULT_RESULTS_DIRECTORY},
    model::framework::Framework,
    results::{FsResultLoader, ResultLoader},
    source::{FileManifestSource, ManifestSource},
    Zigbench,
};

#[derive(Default)]
pub struct ZigbenchBuilder {
    // All other paths are relative to `root`
    root: Option<PathBuf>,
    results_directory: Option<PathBuf>,
    frameworks: Option<Vec<Framework>>,
    manifest_source: Option<Box<dyn ManifestSource>>,
    result_loader: Option<Box<dyn ResultLoader>>,
}

impl ZigbenchBuilder {
    /// Benchmark project root directory.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Directory holding `<framework>/bench.json` result artifacts.
    ///
    /// Defaults to `results`.
    pub fn results_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_directory = Some(path.into());
        self
    }

    /// Frameworks to include, in tie-break order.
    ///
    /// Defaults to `httpz`, `zap`, `std`, `zinc` and `zzz:0.14.0`.
    pub fn frameworks(mut self, frameworks: impl IntoIterator<Item = Framework>) -> Self {
        self.frameworks = Some(frameworks.into_iter().collect());
        self
    }

    /// Where manifests are read from.
    ///
    /// Defaults to the `build.zig.zon` files under `root`.
    pub fn manifest_source(mut self, source: impl ManifestSource + 'static) -> Self {
        self.manifest_source = Some(Box::new(source));
        self
    }

    /// Where benchmark results are read from. Overrides `results_directory`.
    pub fn result_loader(mut self, loader: impl ResultLoader + 'static) -> Self {
        self.result_loader = Some(Box::new(loader));
        self
    }

    pub fn try_build(self) -> anyhow::Result<Zigbench> {
        let Self {
            root,
            results_directory,
            frameworks,
            manifest_source,
            result_loader,
        } = self;
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let frameworks = frameworks.unwrap_or_else(default_frameworks);
        if frameworks.is_empty() {
            bail!("No frameworks configured");
        }

        let manifest_source: Box<dyn ManifestSource> = match manifest_source {
            Some(source) => source,
            None => Box::new(FileManifestSource::new(&root)),
        };

        let result_loader: Box<dyn ResultLoader> = match result_loader {
            Some(loader) => loader,
            None => {
                let results_directory = results_directory
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIRECTORY));
                Box::new(FsResultLoader::new(root.join(results_directory)))
            }
        };

        Ok(Zigbench {
            aggregator: Aggregator::new(frameworks, manifest_source, result_loader),
        })
    }
}
