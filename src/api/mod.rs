use crate::{
    aggregate::Aggregator,
    model::{
        benchmark::BenchmarkDataset,
        framework::{Framework, ResolvedIdentity},
    },
};

mod builder;

pub use builder::ZigbenchBuilder;

pub struct Zigbench {
    aggregator: Aggregator,
}

impl Zigbench {
    pub fn builder() -> ZigbenchBuilder {
        ZigbenchBuilder::default()
    }

    pub fn frameworks(&self) -> &[Framework] {
        self.aggregator.frameworks()
    }

    /// Builds the ranked benchmark dataset for every configured framework
    pub async fn collect(&self) -> anyhow::Result<BenchmarkDataset> {
        Ok(self.aggregator.aggregate().await?)
    }

    /// Resolves framework versions and repositories without reading results
    pub async fn resolve(&self) -> anyhow::Result<Vec<ResolvedIdentity>> {
        Ok(self.aggregator.resolve().await?)
    }
}
