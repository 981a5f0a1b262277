use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::framework::{FrameworkName, ResolvedIdentity};

/// Contents of a `results/<framework>/bench.json` artifact.
///
/// Timings are in seconds, `success_rate` is a fraction in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    pub summary: Summary,
    pub latency_percentiles: LatencyPercentiles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub requests_per_sec: f64,
    pub average: f64,
    pub fastest: f64,
    pub slowest: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyPercentiles {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl BenchmarkResult {
    /// Checks the values a well-formed result must satisfy, returning the
    /// name of the first offending field.
    pub fn invalid_field(&self) -> Option<(&'static str, f64)> {
        let Summary {
            requests_per_sec,
            average,
            fastest,
            slowest,
            success_rate,
        } = self.summary;
        let LatencyPercentiles { p50, p95, p99 } = self.latency_percentiles;

        [
            ("summary.requestsPerSec", requests_per_sec),
            ("summary.average", average),
            ("summary.fastest", fastest),
            ("summary.slowest", slowest),
            ("latencyPercentiles.p50", p50),
            ("latencyPercentiles.p95", p95),
            ("latencyPercentiles.p99", p99),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
        .or_else(|| {
            (!(0.0..=1.0).contains(&success_rate)).then_some(("summary.successRate", success_rate))
        })
    }
}

/// One framework's identity merged with its benchmark summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkEntry {
    pub name: FrameworkName,
    pub rps: f64,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    pub average: f64,
    pub fastest: f64,
    pub slowest: f64,
    pub success_rate: f64,
    pub latency_p50: f64,
    pub latency_p95: f64,
    pub latency_p99: f64,
}

impl BenchmarkEntry {
    pub fn new(identity: ResolvedIdentity, result: &BenchmarkResult) -> Self {
        BenchmarkEntry {
            name: identity.name,
            rps: result.summary.requests_per_sec,
            version: identity.version,
            repo_url: identity.repo_url,
            average: result.summary.average,
            fastest: result.summary.fastest,
            slowest: result.summary.slowest,
            success_rate: result.summary.success_rate,
            latency_p50: result.latency_percentiles.p50,
            latency_p95: result.latency_percentiles.p95,
            latency_p99: result.latency_percentiles.p99,
        }
    }
}

/// Benchmark entries ranked by throughput, highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkDataset {
    entries: Vec<BenchmarkEntry>,
}

impl BenchmarkDataset {
    /// Ranks `entries` by `rps` descending. Entries with equal throughput keep
    /// their relative order, `0.0` and `-0.0` included.
    pub fn from_entries(mut entries: Vec<BenchmarkEntry>) -> Self {
        entries.sort_by(|a, b| b.rps.partial_cmp(&a.rps).unwrap_or(Ordering::Equal));
        BenchmarkDataset { entries }
    }

    pub fn entries(&self) -> &[BenchmarkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest throughput in the dataset, `0.0` when it is empty.
    pub fn max_rps(&self) -> f64 {
        self.entries.first().map_or(0.0, |entry| entry.rps)
    }
}

impl Serialize for BenchmarkDataset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output<'a> {
            benchmark_data: &'a [BenchmarkEntry],
            max_rps: f64,
        }

        Output {
            benchmark_data: &self.entries,
            max_rps: self.max_rps(),
        }
        .serialize(serializer)
    }
}
