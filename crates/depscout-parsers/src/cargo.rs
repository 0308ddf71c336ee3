// Cargo format handlers: Cargo.toml and Cargo.lock

use depscout_core::{Dependency, Error, Handler, Result, Scope};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A dependency spec in Cargo.toml is either a bare version string or a
/// table with more detail. Modeled as a tagged variant up front instead of
/// poking at a dynamic value afterwards.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VersionSpec {
    Plain(String),
    Detailed(DetailedSpec),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DetailedSpec {
    pub version: Option<String>,
    pub path: Option<String>,
    pub git: Option<String>,
    pub registry: Option<String>,
    pub optional: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CargoManifest {
    dependencies: BTreeMap<String, VersionSpec>,
    #[serde(rename = "dev-dependencies")]
    dev_dependencies: BTreeMap<String, VersionSpec>,
    #[serde(rename = "build-dependencies")]
    build_dependencies: BTreeMap<String, VersionSpec>,
}

/// Parse `Cargo.toml` - the declared manifest.
pub struct CargoTomlParser;

impl Handler for CargoTomlParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let manifest: CargoManifest =
            toml::from_str(text).map_err(|e| Error::parse(filename, e))?;

        let mut dependencies = Vec::new();
        for (table, scope) in [
            (&manifest.dependencies, Scope::Runtime),
            (&manifest.dev_dependencies, Scope::Development),
            (&manifest.build_dependencies, Scope::Build),
        ] {
            for (name, spec) in table {
                let dep = match spec {
                    VersionSpec::Plain(version) => {
                        let mut dep = Dependency::new(name.clone(), version.clone());
                        dep.scope = scope;
                        dep
                    }
                    VersionSpec::Detailed(detail) => {
                        // Local path overrides without a version are not
                        // registry packages; skip them.
                        if detail.version.is_none() && detail.path.is_some() {
                            continue;
                        }
                        let mut dep = Dependency::new(
                            name.clone(),
                            detail.version.clone().unwrap_or_else(|| "*".to_string()),
                        );
                        dep.scope = if detail.optional { Scope::Optional } else { scope };
                        if let Some(git) = &detail.git {
                            dep.registry_url = Some(git.clone());
                        }
                        dep
                    }
                };
                dependencies.push(dep);
            }
        }

        Ok(dependencies)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CargoLock {
    package: Vec<LockPackage>,
}

#[derive(Debug, Deserialize)]
struct LockPackage {
    name: String,
    version: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    checksum: Option<String>,
}

/// Parse `Cargo.lock` - the resolved lockfile.
///
/// Workspace members carry no `source` and are skipped; everything else in
/// the lock is part of the resolved graph. Directness is not recoverable
/// from this file alone, so every entry reports `direct = false`.
pub struct CargoLockParser;

impl Handler for CargoLockParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let lock: CargoLock = toml::from_str(text).map_err(|e| Error::parse(filename, e))?;

        let mut dependencies = Vec::new();
        for package in lock.package {
            let Some(source) = package.source else {
                continue;
            };

            let mut dep = Dependency::new(package.name, package.version);
            dep.direct = false;
            if let Some(checksum) = package.checksum {
                dep.integrity = checksum;
            }
            // The default registry index says nothing useful; anything else
            // (alternate registry, git source) is worth keeping.
            let source = source
                .trim_start_matches("registry+")
                .trim_start_matches("git+");
            if !source.contains("crates.io") {
                dep.registry_url = Some(source.to_string());
            }
            dependencies.push(dep);
        }

        Ok(dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cargo_toml_plain_and_detailed_specs() {
        let content = br#"
[package]
name = "app"
version = "0.1.0"

[dependencies]
serde = "1.0"
tokio = { version = "1.0", features = ["full"] }
backtrace = { version = "0.3", optional = true }
local-helper = { path = "../helper" }

[dev-dependencies]
tempfile = "3"

[build-dependencies]
cc = "1"
"#;

        let deps = CargoTomlParser.parse("Cargo.toml", content).unwrap();
        // local-helper is a path override without a version: skipped.
        assert_eq!(deps.len(), 5);

        let serde_dep = deps.iter().find(|d| d.name == "serde").unwrap();
        assert_eq!(serde_dep.version, "1.0");
        assert_eq!(serde_dep.scope, Scope::Runtime);

        let tokio = deps.iter().find(|d| d.name == "tokio").unwrap();
        assert_eq!(tokio.version, "1.0");

        let backtrace = deps.iter().find(|d| d.name == "backtrace").unwrap();
        assert_eq!(backtrace.scope, Scope::Optional);

        assert_eq!(
            deps.iter().find(|d| d.name == "tempfile").unwrap().scope,
            Scope::Development
        );
        assert_eq!(
            deps.iter().find(|d| d.name == "cc").unwrap().scope,
            Scope::Build
        );
    }

    #[test]
    fn test_cargo_toml_git_dependency_keeps_url() {
        let content = br#"
[dependencies]
fork = { version = "0.2", git = "https://github.com/example/fork" }
"#;
        let deps = CargoTomlParser.parse("Cargo.toml", content).unwrap();
        assert_eq!(
            deps[0].registry_url.as_deref(),
            Some("https://github.com/example/fork")
        );
    }

    #[test]
    fn test_cargo_toml_malformed() {
        let err = CargoTomlParser.parse("Cargo.toml", b"[dependencies\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_cargo_lock_skips_workspace_members() {
        let content = br#"
version = 3

[[package]]
name = "app"
version = "0.1.0"

[[package]]
name = "serde"
version = "1.0.200"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "deadbeef"

[[package]]
name = "fork"
version = "0.2.0"
source = "git+https://github.com/example/fork#abc123"
"#;

        let deps = CargoLockParser.parse("Cargo.lock", content).unwrap();
        assert_eq!(deps.len(), 2);

        let serde_dep = deps.iter().find(|d| d.name == "serde").unwrap();
        assert_eq!(serde_dep.version, "1.0.200");
        assert_eq!(serde_dep.integrity, "deadbeef");
        assert!(serde_dep.registry_url.is_none());
        assert!(!serde_dep.direct);

        let fork = deps.iter().find(|d| d.name == "fork").unwrap();
        assert!(fork.registry_url.as_deref().unwrap().starts_with("https://github.com"));
    }
}
