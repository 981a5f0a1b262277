use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use zigbench::{
    model::framework::Framework,
    source::{EmbeddedManifestSource, ManifestLocation},
    Zigbench,
};

fn fixture_root() -> PathBuf {
    project_root::get_project_root()
        .unwrap()
        .join("tests/fixtures/site")
}

fn frameworks(names: &[&str]) -> Vec<Framework> {
    names.iter().map(|f| f.parse().unwrap()).collect()
}

fn copy_fixture(to: &Path) {
    let from = fixture_root();
    for relative in [
        "build.zig.zon",
        "src/frameworks/zzz/build.zig.zon",
        "results/httpz/bench.json",
        "results/zap/bench.json",
        "results/std/bench.json",
        "results/zinc/bench.json",
        "results/zzz/bench.json",
    ] {
        let target = to.join(relative);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::copy(from.join(relative), target).unwrap();
    }
}

#[tokio::test]
async fn collect_default_frameworks() {
    let zigbench = Zigbench::builder().root(fixture_root()).try_build().unwrap();
    let dataset = zigbench.collect().await.unwrap();

    let ranked: Vec<_> = dataset
        .entries()
        .iter()
        .map(|e| {
            (
                e.name.as_str(),
                e.rps,
                e.version.as_str(),
                e.repo_url.as_deref(),
            )
        })
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("zap", 120000.0, "0.10.1", Some("https://github.com/zigzap/zap")),
            ("zzz", 95000.0, "0.3.0-dev", Some("https://github.com/tardy-org/zzz")),
            ("zinc", 80000.0, "1.2.0-rc.3", Some("https://github.com/zon-dev/zinc")),
            ("httpz", 50000.0, "0.0.0", Some("https://github.com/karlseguin/http.zig")),
            ("std", 30000.0, "0.14.0", Some("https://github.com/ziglang/zig")),
        ]
    );
    assert_eq!(dataset.max_rps(), 120000.0);

    let zap = &dataset.entries()[0];
    assert_eq!(zap.success_rate, 1.0);
    assert_eq!(zap.average, 0.00082);
    assert_eq!(
        (zap.latency_p50, zap.latency_p95, zap.latency_p99),
        (0.0007, 0.0014, 0.0026)
    );
}

#[tokio::test]
async fn collect_four_frameworks() {
    let zigbench = Zigbench::builder()
        .root(fixture_root())
        .frameworks(frameworks(&["httpz", "zap", "std", "zinc"]))
        .try_build()
        .unwrap();
    let dataset = zigbench.collect().await.unwrap();

    let rps: Vec<_> = dataset.entries().iter().map(|e| e.rps).collect();
    assert_eq!(rps, vec![120000.0, 80000.0, 50000.0, 30000.0]);
    assert!(dataset.entries().windows(2).all(|w| w[0].rps >= w[1].rps));

    let mut names: Vec<_> = dataset.entries().iter().map(|e| e.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["httpz", "std", "zap", "zinc"]);
}

#[tokio::test]
async fn unpinned_zzz_uses_root_manifest() {
    let zigbench = Zigbench::builder()
        .root(fixture_root())
        .frameworks(frameworks(&["zzz"]))
        .try_build()
        .unwrap();
    let identities = zigbench.resolve().await.unwrap();
    assert_eq!(identities[0].version, "0.2.0");
}

#[tokio::test]
async fn embedded_manifests_with_fixture_results() {
    let root = fixture_root();
    let manifest = std::fs::read_to_string(root.join("build.zig.zon")).unwrap();
    let zigbench = Zigbench::builder()
        .root(&root)
        .frameworks(frameworks(&["httpz", "std"]))
        .manifest_source(
            EmbeddedManifestSource::new().with_manifest(ManifestLocation::Root, manifest),
        )
        .try_build()
        .unwrap();

    let dataset = zigbench.collect().await.unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.entries()[0].name.as_str(), "httpz");
}

#[tokio::test]
async fn framework_without_dependency_is_unknown() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    std::fs::create_dir_all(dir.path().join("results/jetzig")).unwrap();
    std::fs::copy(
        dir.path().join("results/zap/bench.json"),
        dir.path().join("results/jetzig/bench.json"),
    )
    .unwrap();

    let zigbench = Zigbench::builder()
        .root(dir.path())
        .frameworks(frameworks(&["jetzig", "httpz"]))
        .try_build()
        .unwrap();
    let dataset = zigbench.collect().await.unwrap();

    let jetzig = dataset
        .entries()
        .iter()
        .find(|e| e.name.as_str() == "jetzig")
        .unwrap();
    assert_eq!(jetzig.version, "unknown");
    assert_eq!(jetzig.repo_url, None);
}

#[tokio::test]
async fn missing_result_fails_collect() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    std::fs::remove_file(dir.path().join("results/zinc/bench.json")).unwrap();

    let zigbench = Zigbench::builder().root(dir.path()).try_build().unwrap();
    let err = zigbench.collect().await.unwrap_err();
    assert!(err.to_string().contains("No benchmark result for zinc"), "{err}");
}

#[tokio::test]
async fn malformed_manifest_fails_collect() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    std::fs::write(dir.path().join("build.zig.zon"), ".{ .name = .broken, ").unwrap();

    let zigbench = Zigbench::builder().root(dir.path()).try_build().unwrap();
    let err = zigbench.collect().await.unwrap_err();
    assert!(
        err.to_string().contains("Could not parse manifest build.zig.zon"),
        "{err}"
    );
}
