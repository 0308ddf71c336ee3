// PHP Composer format handlers: composer.json and composer.lock

use depscout_core::{Dependency, Error, Handler, Result, Scope};
use serde_json::Value;

/// Platform pseudo-packages (`php`, `ext-mbstring`, `lib-openssl`) describe
/// the runtime, not a dependency anyone installs.
fn is_platform_package(name: &str) -> bool {
    name == "php"
        || name == "hhvm"
        || name.starts_with("ext-")
        || name.starts_with("lib-")
        || name.starts_with("composer-")
}

/// Parse `composer.json` - the declared manifest.
pub struct ComposerJsonParser;

impl Handler for ComposerJsonParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let package: Value =
            serde_json::from_slice(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        for (section, scope) in [
            ("require", Scope::Runtime),
            ("require-dev", Scope::Development),
        ] {
            if let Some(deps) = package.get(section).and_then(|v| v.as_object()) {
                for (name, value) in deps {
                    if is_platform_package(name) {
                        continue;
                    }
                    let version = value.as_str().unwrap_or("*").to_string();
                    let mut dep = Dependency::new(name.clone(), version);
                    dep.scope = scope;
                    dependencies.push(dep);
                }
            }
        }

        Ok(dependencies)
    }
}

/// Parse `composer.lock` - the resolved lockfile. `packages-dev` entries
/// come back with the development scope; dist URLs and shasums are kept.
pub struct ComposerLockParser;

impl Handler for ComposerLockParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let lock: Value =
            serde_json::from_slice(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        for (section, scope) in [
            ("packages", Scope::Runtime),
            ("packages-dev", Scope::Development),
        ] {
            if let Some(packages) = lock.get(section).and_then(|v| v.as_array()) {
                for package in packages {
                    let Some(name) = package.get("name").and_then(|v| v.as_str()) else {
                        continue;
                    };
                    let version = package
                        .get("version")
                        .and_then(|v| v.as_str())
                        .unwrap_or("");
                    let mut dep = Dependency::new(name, version);
                    dep.direct = false;
                    dep.scope = scope;
                    if let Some(dist) = package.get("dist") {
                        if let Some(url) = dist.get("url").and_then(|v| v.as_str()) {
                            dep.registry_url = Some(url.to_string());
                        }
                        if let Some(shasum) = dist.get("shasum").and_then(|v| v.as_str()) {
                            if !shasum.is_empty() {
                                dep.integrity = shasum.to_string();
                            }
                        }
                    }
                    dependencies.push(dep);
                }
            }
        }

        Ok(dependencies)
    }
}
