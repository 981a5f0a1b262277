use std::path::Path;

use anyhow::Context;
use log::info;

use crate::{
    cli::args::{CliArgs, Command},
    config::{SourceKind, ZigbenchConfig},
    model::framework::Framework,
    source::{FileManifestSource, RemoteManifestSource},
    Zigbench,
};

pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let zigbench = build(&args)?;
    match args.cmd {
        Command::Collect { output, pretty } => {
            do_collect(&zigbench, output.as_deref(), pretty).await
        }
        Command::Resolve => do_resolve(&zigbench).await,
    }
}

/// Layers command line flags over the configuration file and environment
fn load_config(args: &CliArgs) -> anyhow::Result<ZigbenchConfig> {
    let mut config = ZigbenchConfig::load(&args.root)?;
    if let Some(frameworks) = &args.frameworks {
        config.frameworks = frameworks
            .iter()
            .map(|f| f.parse::<Framework>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid --frameworks")?;
    }
    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(url) = &args.remote_url {
        config.remote_url = Some(url.clone());
    }
    if let Some(dir) = &args.results_directory {
        config.results_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn build(args: &CliArgs) -> anyhow::Result<Zigbench> {
    let config = load_config(args)?;
    let builder = Zigbench::builder()
        .root(&args.root)
        .results_directory(config.results_dir)
        .frameworks(config.frameworks);

    let builder = match config.source {
        SourceKind::Local => builder.manifest_source(FileManifestSource::new(&args.root)),
        SourceKind::Remote => {
            let url = config
                .remote_url
                .context("The remote manifest source requires a URL")?;
            builder.manifest_source(RemoteManifestSource::new(
                url,
                config.cache_ttl,
                config.fetch_timeout,
            )?)
        }
    };

    builder.try_build()
}

/// Handler to collect command
pub async fn do_collect(
    zigbench: &Zigbench,
    output: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let dataset = zigbench.collect().await?;
    let json = if pretty {
        serde_json::to_string_pretty(&dataset)?
    } else {
        serde_json::to_string(&dataset)?
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Could not write {}", path.display()))?;
            info!("Wrote {} benchmark entries to {}", dataset.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Handler to resolve command
pub async fn do_resolve(zigbench: &Zigbench) -> anyhow::Result<()> {
    for identity in zigbench.resolve().await? {
        println!(
            "{}\t{}\t{}",
            identity.name,
            identity.version,
            identity.repo_url.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
