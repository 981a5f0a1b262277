//! Loads the per-framework benchmark result artifacts.

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use log::trace;
use thiserror::Error;

use crate::model::{benchmark::BenchmarkResult, framework::FrameworkName};

pub const RESULT_FILE_NAME: &str = "bench.json";

#[derive(Error, Debug)]
pub enum ResultError {
    #[error("No benchmark result for {framework} at {path}")]
    MissingResultArtifact { framework: FrameworkName, path: String },
    #[error("IO error reading benchmark result {path}: {source}")]
    IO {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed benchmark result for {framework}: {source}")]
    Malformed {
        framework: FrameworkName,
        source: serde_json::Error,
    },
    #[error("Invalid benchmark result for {framework}: {field} is {value}")]
    InvalidValue {
        framework: FrameworkName,
        field: &'static str,
        value: f64,
    },
}

#[async_trait]
pub trait ResultLoader: Send + Sync {
    async fn load(&self, framework: &FrameworkName) -> Result<BenchmarkResult, ResultError>;
}

/// Reads `<results_dir>/<framework>/bench.json`.
#[derive(Debug, Clone)]
pub struct FsResultLoader {
    results_dir: PathBuf,
}

impl FsResultLoader {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        FsResultLoader {
            results_dir: results_dir.into(),
        }
    }

    pub fn path(&self, framework: &FrameworkName) -> PathBuf {
        self.results_dir
            .join(framework.as_str())
            .join(RESULT_FILE_NAME)
    }
}

#[async_trait]
impl ResultLoader for FsResultLoader {
    async fn load(&self, framework: &FrameworkName) -> Result<BenchmarkResult, ResultError> {
        let path = self.path(framework);
        trace!("Reading benchmark result from {}", path.display());

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|error| match error.kind() {
                ErrorKind::NotFound => ResultError::MissingResultArtifact {
                    framework: framework.clone(),
                    path: path.display().to_string(),
                },
                _ => ResultError::IO {
                    path: path.display().to_string(),
                    source: error,
                },
            })?;

        parse_result(framework, &contents)
    }
}

pub fn parse_result(
    framework: &FrameworkName,
    contents: &str,
) -> Result<BenchmarkResult, ResultError> {
    let result = serde_json::from_str::<BenchmarkResult>(contents).map_err(|source| {
        ResultError::Malformed {
            framework: framework.clone(),
            source,
        }
    })?;

    match result.invalid_field() {
        Some((field, value)) => Err(ResultError::InvalidValue {
            framework: framework.clone(),
            field,
            value,
        }),
        None => Ok(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    const RESULT: &str = r#"{
        "summary": { "requestsPerSec": 80000, "average": 0.001, "fastest": 0.0001, "slowest": 0.02, "successRate": 1 },
        "latencyPercentiles": { "p50": 0.001, "p95": 0.003, "p99": 0.006 }
    }"#;

    #[tokio::test]
    async fn load_result_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("zap")).unwrap();
        std::fs::write(dir.path().join("zap/bench.json"), RESULT).unwrap();

        let loader = FsResultLoader::new(dir.path());
        let result = loader.load(&FrameworkName::from("zap")).await.unwrap();
        assert_eq!(result.summary.requests_per_sec, 80000.0);
        assert_eq!(result.latency_percentiles.p99, 0.006);
    }

    #[tokio::test]
    async fn missing_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsResultLoader::new(dir.path());
        let err = loader.load(&FrameworkName::from("zap")).await.unwrap_err();
        assert!(
            matches!(&err, ResultError::MissingResultArtifact { framework, .. } if framework.as_str() == "zap"),
            "{err}"
        );
    }

    #[test]
    fn reject_wrong_shape() {
        let err = parse_result(&FrameworkName::from("zap"), r#"{ "summary": {} }"#).unwrap_err();
        assert!(matches!(err, ResultError::Malformed { .. }), "{err}");
    }

    #[test]
    fn reject_out_of_range_success_rate() {
        let contents = RESULT.replace(r#""successRate": 1"#, r#""successRate": 2"#);
        let err = parse_result(&FrameworkName::from("zap"), &contents).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid benchmark result for zap: summary.successRate is 2"
        );
    }
}
