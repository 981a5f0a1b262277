use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::Serialize;

use super::ParseError;

#[derive(Clone, Hash, Serialize, Debug, PartialEq, Eq, Ord, PartialOrd)]
pub struct FrameworkName(String);

impl FrameworkName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FrameworkName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameworkName {
    fn from(s: &str) -> Self {
        FrameworkName(s.to_string())
    }
}

/// One item of the configured framework list.
///
/// Written as `httpz`, or as `zzz:0.14.0` when the framework's benchmark app
/// carries its own `build.zig.zon` pinning a version of the framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framework {
    pub name: FrameworkName,
    pub pinned_version: Option<String>,
}

impl Framework {
    pub fn new(name: impl Into<FrameworkName>) -> Self {
        Framework {
            name: name.into(),
            pinned_version: None,
        }
    }

    pub fn pinned(name: impl Into<FrameworkName>, version: impl Into<String>) -> Self {
        Framework {
            name: name.into(),
            pinned_version: Some(version.into()),
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_version.is_some()
    }
}

impl FromStr for Framework {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let (name, pinned_version) = match value.split_once(':') {
            Some((name, version)) => (name, Some(version)),
            None => (value, None),
        };
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_name || pinned_version.is_some_and(str::is_empty) {
            return Err(ParseError::InvalidFramework(value.to_string()));
        }
        Ok(Framework {
            name: FrameworkName::from(name),
            pinned_version: pinned_version.map(str::to_string),
        })
    }
}

impl Display for Framework {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.pinned_version {
            Some(version) => write!(f, "{}:{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Display identity of a framework, derived from the manifests on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIdentity {
    pub name: FrameworkName,
    /// A semver-shaped string, or [`crate::normalize::UNKNOWN_VERSION`].
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
}
