use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use clap::ValueEnum;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::{
    model::framework::Framework,
    source::{DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT},
};

pub const CONFIG_FILE_NAME: &str = "zigbench.toml";
pub const DEFAULT_RESULTS_DIRECTORY: &str = "results";
pub const DEFAULT_FRAMEWORKS: [&str; 5] = ["httpz", "zap", "std", "zinc", "zzz:0.14.0"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Read manifests from the project checkout.
    #[default]
    Local,
    /// Fetch manifests over HTTPS.
    Remote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZigbenchConfig {
    pub source: SourceKind,
    pub remote_url: Option<String>,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub results_dir: PathBuf,
    pub frameworks: Vec<Framework>,
}

impl ZigbenchConfig {
    /// Loads `zigbench.toml` from `root` if present, overridden by
    /// `ZIGBENCH_*` environment variables.
    ///
    /// The result is not validated, callers apply their own overrides first.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let raw_config = RawConfig::load(Some(&root.join(CONFIG_FILE_NAME)), None)?;
        Self::from_raw(raw_config)
    }

    fn from_raw(raw_config: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            source,
            results,
            frameworks,
        } = raw_config;

        let frameworks = match frameworks {
            Some(frameworks) => frameworks
                .iter()
                .map(|f| f.parse::<Framework>())
                .collect::<Result<Vec<_>, _>>()
                .context("Invalid framework list")?,
            None => default_frameworks(),
        };

        Ok(ZigbenchConfig {
            source: source.kind.unwrap_or_default(),
            remote_url: source.url,
            cache_ttl: source
                .ttl
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CACHE_TTL),
            fetch_timeout: source
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT),
            results_dir: results
                .dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIRECTORY)),
            frameworks,
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.source == SourceKind::Remote && self.remote_url.is_none() {
            bail!("The remote manifest source requires a URL (ZIGBENCH_SOURCE_URL)");
        }
        if self.frameworks.is_empty() {
            bail!("No frameworks configured");
        }
        Ok(())
    }
}

pub fn default_frameworks() -> Vec<Framework> {
    DEFAULT_FRAMEWORKS
        .iter()
        .filter_map(|f| f.parse().ok())
        .collect()
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    source: SourceConfig,
    #[serde(default)]
    results: ResultsConfig,
    frameworks: Option<Vec<String>>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct SourceConfig {
    kind: Option<SourceKind>,
    url: Option<String>,
    ttl: Option<u64>,
    timeout: Option<u64>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct ResultsConfig {
    dir: Option<PathBuf>,
}

impl RawConfig {
    fn load(file: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(file).format(FileFormat::Toml).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("ZIGBENCH")
                    .separator("_")
                    .list_separator(",")
                    .with_list_parse_key("frameworks")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
