use std::collections::BTreeMap;

use log::debug;

use super::{
    zon::{self, Value},
    ParseError,
};

pub const MANIFEST_FILE_NAME: &str = "build.zig.zon";

/// Where a dependency was fetched from, and the content hash the build pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// e.g. `git+https://github.com/zon-dev/zinc.git#<commit>`
    pub source_locator: String,
    /// e.g. `zinc-0.1.0-beta.6-...`
    pub content_hash: String,
}

impl DependencySpec {
    pub fn new(source_locator: impl Into<String>, content_hash: impl Into<String>) -> Self {
        DependencySpec {
            source_locator: source_locator.into(),
            content_hash: content_hash.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyManifest {
    pub name: String,
    pub version: String,
    pub minimum_zig_version: Option<String>,
    pub dependencies: BTreeMap<String, DependencySpec>,
}

impl DependencyManifest {
    pub fn dependency(&self, name: &str) -> Option<&DependencySpec> {
        self.dependencies.get(name)
    }

    pub fn from_zon_str(data: &str) -> Result<DependencyManifest, ParseError> {
        let mut fields = into_fields("<root>", zon::from_str(data)?)?;

        let name = take(&mut fields, "name")
            .ok_or_else(|| ParseError::MissingKey("name".to_string()))
            .and_then(|v| match v {
                // Zig 0.14 writes the package name as an enum literal
                Value::String(s) | Value::EnumLiteral(s) => Ok(s),
                other => Err(unexpected_type("name", "string", &other)),
            })?;

        let version = take(&mut fields, "version")
            .ok_or_else(|| ParseError::MissingKey("version".to_string()))
            .and_then(|v| into_string("version", v))?;

        let minimum_zig_version = take(&mut fields, "minimum_zig_version")
            .map(|v| into_string("minimum_zig_version", v))
            .map_or(Ok(None), |v| v.map(Some))?;

        let mut dependencies = BTreeMap::new();
        if let Some(value) = take(&mut fields, "dependencies") {
            for (dependency, value) in into_fields("dependencies", value)? {
                if let Some(spec) = parse_dependency(&dependency, value)? {
                    dependencies.insert(dependency, spec);
                }
            }
        }

        Ok(DependencyManifest {
            name,
            version,
            minimum_zig_version,
            dependencies,
        })
    }
}

fn parse_dependency(name: &str, value: Value) -> Result<Option<DependencySpec>, ParseError> {
    let key = format!("dependencies.{name}");
    let mut fields = into_fields(&key, value)?;

    if take(&mut fields, "path").is_some() {
        debug!("Dependency {name} is a local path, it has no source locator");
        return Ok(None);
    }

    let source_locator = take(&mut fields, "url")
        .ok_or_else(|| ParseError::MissingKey(format!("{key}.url")))
        .and_then(|v| into_string(&format!("{key}.url"), v))?;

    let content_hash = take(&mut fields, "hash")
        .ok_or_else(|| ParseError::MissingKey(format!("{key}.hash")))
        .and_then(|v| into_string(&format!("{key}.hash"), v))?;

    Ok(Some(DependencySpec::new(source_locator, content_hash)))
}

fn take(fields: &mut Vec<(String, Value)>, key: &str) -> Option<Value> {
    let index = fields.iter().position(|(k, _)| k == key)?;
    Some(fields.remove(index).1)
}

fn into_fields(key: &str, value: Value) -> Result<Vec<(String, Value)>, ParseError> {
    match value {
        Value::Struct(fields) => Ok(fields),
        other => Err(unexpected_type(key, "struct", &other)),
    }
}

fn into_string(key: &str, value: Value) -> Result<String, ParseError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(unexpected_type(key, "string", &other)),
    }
}

fn unexpected_type(key: &str, expected: &'static str, found: &Value) -> ParseError {
    ParseError::UnexpectedType {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}
