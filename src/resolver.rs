//! Resolves the display version and repository of each framework.

use log::{debug, warn};

use crate::{
    model::{
        framework::{Framework, FrameworkName, ResolvedIdentity},
        manifest::{DependencyManifest, DependencySpec},
    },
    normalize::{extract_repo_url, extract_version, UNKNOWN_VERSION},
    source::{load_manifest, ManifestLocation, ManifestSource, SourceError},
};

/// The Zig standard library, benchmarked through `std.http`.
pub const BASELINE_FRAMEWORK: &str = "std";
pub const BASELINE_REPO_URL: &str = "https://github.com/ziglang/zig";

pub struct IdentityResolver<'a> {
    source: &'a dyn ManifestSource,
    manifest: &'a DependencyManifest,
}

impl<'a> IdentityResolver<'a> {
    /// `manifest` is the project's root manifest, already loaded from `source`.
    pub fn new(source: &'a dyn ManifestSource, manifest: &'a DependencyManifest) -> Self {
        IdentityResolver { source, manifest }
    }

    pub async fn resolve(&self, framework: &Framework) -> Result<ResolvedIdentity, SourceError> {
        let name = &framework.name;

        let mut identity = if name.as_str() == BASELINE_FRAMEWORK {
            Some(baseline_identity(self.manifest))
        } else {
            self.manifest
                .dependency(name.as_str())
                .map(|spec| identity_from_spec(name, spec))
        };

        if framework.is_pinned() {
            if let Some(spec) = self.pinned_dependency(framework).await? {
                identity = Some(identity_from_spec(name, &spec));
            }
        }

        let identity = identity.unwrap_or_else(|| {
            debug!("No dependency entry for {}, version is unknown", name);
            ResolvedIdentity {
                name: name.clone(),
                version: UNKNOWN_VERSION.to_string(),
                repo_url: None,
            }
        });
        debug!(
            "Resolved {} to version {} ({})",
            name,
            identity.version,
            identity.repo_url.as_deref().unwrap_or("no repository")
        );
        Ok(identity)
    }

    /// Looks the framework up in the manifest its benchmark app ships.
    async fn pinned_dependency(
        &self,
        framework: &Framework,
    ) -> Result<Option<DependencySpec>, SourceError> {
        let location = ManifestLocation::Framework(framework.name.clone());
        let nested = load_manifest(self.source, &location).await?;
        let spec = nested.dependency(framework.name.as_str()).cloned();
        if spec.is_none() {
            warn!(
                "{} does not declare a {} dependency, keeping the root manifest entry",
                location, framework.name
            );
        }
        Ok(spec)
    }
}

fn identity_from_spec(name: &FrameworkName, spec: &DependencySpec) -> ResolvedIdentity {
    ResolvedIdentity {
        name: name.clone(),
        version: extract_version(&spec.content_hash),
        repo_url: Some(extract_repo_url(&spec.source_locator)),
    }
}

/// `std` ships with the compiler, so its version is the minimum Zig version
/// the project declares, taken verbatim.
pub fn baseline_identity(manifest: &DependencyManifest) -> ResolvedIdentity {
    ResolvedIdentity {
        name: FrameworkName::from(BASELINE_FRAMEWORK),
        version: manifest
            .minimum_zig_version
            .clone()
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        repo_url: Some(BASELINE_REPO_URL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::source::EmbeddedManifestSource;
    use pretty_assertions::assert_eq;

    const ROOT: &str = r#"
        .{
            .name = .bench,
            .version = "0.0.1",
            .minimum_zig_version = "0.14.0",
            .dependencies = .{
                .fw = .{ .url = "git+https://github.com/org/fw.git#aaa", .hash = "fw-1.0.0-xyz" },
                .zap = .{ .url = "git+https://github.com/zigzap/zap#bbb", .hash = "zap-0.10.1-abc" },
            },
        }
    "#;

    const NESTED: &str = r#"
        .{
            .name = .fw_app,
            .version = "0.0.1",
            .dependencies = .{
                .fw = .{ .url = "git+https://github.com/other/fw#ccc", .hash = "fw-2.0.0-xyz" },
            },
        }
    "#;

    async fn resolve(source: &EmbeddedManifestSource, framework: &str) -> ResolvedIdentity {
        let manifest = DependencyManifest::from_zon_str(ROOT).unwrap();
        let resolver = IdentityResolver::new(source, &manifest);
        let framework = framework.parse::<Framework>().unwrap();
        resolver.resolve(&framework).await.unwrap()
    }

    fn nested_source(contents: &str) -> EmbeddedManifestSource {
        EmbeddedManifestSource::new().with_manifest(
            ManifestLocation::Framework(FrameworkName::from("fw")),
            contents,
        )
    }

    #[tokio::test]
    async fn resolve_from_root_manifest() {
        let identity = resolve(&EmbeddedManifestSource::new(), "zap").await;
        assert_eq!(
            identity,
            ResolvedIdentity {
                name: FrameworkName::from("zap"),
                version: "0.10.1".to_string(),
                repo_url: Some("https://github.com/zigzap/zap".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn pinned_manifest_takes_precedence() {
        let identity = resolve(&nested_source(NESTED), "fw:2.0.0").await;
        assert_eq!(identity.version, "2.0.0");
        assert_eq!(identity.repo_url.as_deref(), Some("https://github.com/other/fw"));
    }

    #[tokio::test]
    async fn unpinned_framework_ignores_nested_manifest() {
        let identity = resolve(&nested_source(NESTED), "fw").await;
        assert_eq!(identity.version, "1.0.0");
    }

    #[tokio::test]
    async fn pinned_manifest_without_entry_keeps_root() {
        let nested = r#".{ .name = .fw_app, .version = "0.0.1", .dependencies = .{} }"#;
        let identity = resolve(&nested_source(nested), "fw:2.0.0").await;
        assert_eq!(identity.version, "1.0.0");
        assert_eq!(identity.repo_url.as_deref(), Some("https://github.com/org/fw"));
    }

    #[tokio::test]
    async fn baseline_uses_minimum_zig_version() {
        let identity = resolve(&EmbeddedManifestSource::new(), "std").await;
        assert_eq!(
            identity,
            ResolvedIdentity {
                name: FrameworkName::from("std"),
                version: "0.14.0".to_string(),
                repo_url: Some(BASELINE_REPO_URL.to_string()),
            }
        );
    }

    #[tokio::test]
    async fn undeclared_framework_is_unknown() {
        let nested = r#".{ .name = .x, .version = "0.0.1" }"#;
        let source = EmbeddedManifestSource::new().with_manifest(
            ManifestLocation::Framework(FrameworkName::from("ghost")),
            nested,
        );
        for framework in ["ghost", "ghost:1.0.0"] {
            let identity = resolve(&source, framework).await;
            assert_eq!(identity.version, UNKNOWN_VERSION);
            assert_eq!(identity.repo_url, None);
        }
    }
}
