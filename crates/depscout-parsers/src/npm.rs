// npm format handlers: package.json, package-lock.json (v1 and v2/v3), yarn.lock

use depscout_core::{Dependency, Error, Handler, Result, Scope};
use serde_json::Value;
use tracing::trace;

/// Parse `package.json` - the declared manifest.
pub struct PackageJsonParser;

impl Handler for PackageJsonParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let package: Value =
            serde_json::from_slice(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        for (section, scope) in [
            ("dependencies", Scope::Runtime),
            ("devDependencies", Scope::Development),
            ("optionalDependencies", Scope::Optional),
        ] {
            if let Some(deps) = package.get(section).and_then(|v| v.as_object()) {
                for (name, value) in deps {
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

/// Parse `package-lock.json` / `npm-shrinkwrap.json` - the resolved lockfile.
///
/// Handles the v2/v3 `packages` map and falls back to the v1 `dependencies`
/// tree. Entries not listed by the root package's own dependency sections
/// are reported as transitive.
pub struct PackageLockParser;

impl Handler for PackageLockParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let lock: Value =
            serde_json::from_slice(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        if let Some(packages) = lock.get("packages").and_then(|p| p.as_object()) {
            // The root entry ("") tells us which names are directly declared.
            let direct_names: Vec<&str> = packages
                .get("")
                .map(|root| {
                    ["dependencies", "devDependencies", "optionalDependencies"]
                        .into_iter()
                        .filter_map(|s| root.get(s).and_then(|v| v.as_object()))
                        .flat_map(|o| o.keys().map(String::as_str))
                        .collect()
                })
                .unwrap_or_default();

            for (path, info) in packages {
                // Skip the root entry and anything without a node_modules path.
                let Some(stripped) = path.strip_prefix("node_modules/") else {
                    continue;
                };
                // Nested installs keep only the innermost package name.
                let name = stripped
                    .rsplit_once("node_modules/")
                    .map(|(_, n)| n)
                    .unwrap_or(stripped);
                if name.is_empty() {
                    continue;
                }

                let mut dep = Dependency::new(
                    name,
                    info.get("version").and_then(|v| v.as_str()).unwrap_or(""),
                );
                dep.direct = direct_names.contains(&name);
                dep.scope = if info.get("dev").and_then(|v| v.as_bool()).unwrap_or(false) {
                    Scope::Development
                } else if info
                    .get("optional")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false)
                {
                    Scope::Optional
                } else {
                    Scope::Runtime
                };
                if let Some(integrity) = info.get("integrity").and_then(|v| v.as_str()) {
                    dep.integrity = integrity.to_string();
                }
                if let Some(resolved) = info.get("resolved").and_then(|v| v.as_str()) {
                    dep.registry_url = Some(resolved.to_string());
                }
                dependencies.push(dep);
            }
        } else if let Some(tree) = lock.get("dependencies").and_then(|d| d.as_object()) {
            // v1 format: top level is direct, nested blocks are transitive.
            collect_v1(tree, true, &mut dependencies);
        }

        trace!(count = dependencies.len(), "package-lock entries");
        Ok(dependencies)
    }
}

fn collect_v1(tree: &serde_json::Map<String, Value>, direct: bool, out: &mut Vec<Dependency>) {
    for (name, info) in tree {
        let mut dep = Dependency::new(
            name.clone(),
            info.get("version").and_then(|v| v.as_str()).unwrap_or(""),
        );
        dep.direct = direct;
        if info.get("dev").and_then(|v| v.as_bool()).unwrap_or(false) {
            dep.scope = Scope::Development;
        }
        if let Some(integrity) = info.get("integrity").and_then(|v| v.as_str()) {
            dep.integrity = integrity.to_string();
        }
        if let Some(resolved) = info.get("resolved").and_then(|v| v.as_str()) {
            dep.registry_url = Some(resolved.to_string());
        }
        out.push(dep);

        if let Some(nested) = info.get("dependencies").and_then(|d| d.as_object()) {
            collect_v1(nested, false, out);
        }
    }
}

/// Parse `yarn.lock` - a line-oriented format, no JSON in sight.
///
/// Entry headers are unindented lines ending in `:`; the fields we care
/// about (`version`, `resolved`, `integrity`) are indented beneath them.
/// Anything that does not fit the shape is skipped, not fatal.
pub struct YarnLockParser;

impl Handler for YarnLockParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();
        let mut current: Option<Dependency> = None;

        for line in text.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if !line.starts_with(' ') && line.ends_with(':') {
                // New entry: flush the previous one if it got a version.
                if let Some(dep) = current.take() {
                    if !dep.version.is_empty() {
                        dependencies.push(dep);
                    }
                }
                if let Some(name) = entry_name(line.trim_end_matches(':')) {
                    let mut dep = Dependency::new(name, "");
                    // yarn.lock flattens the whole graph; directness is not
                    // recoverable from this file alone.
                    dep.direct = false;
                    current = Some(dep);
                }
            } else if let Some(dep) = current.as_mut() {
                let trimmed = line.trim();
                if let Some(version) = field_value(trimmed, "version") {
                    dep.version = version;
                } else if let Some(resolved) = field_value(trimmed, "resolved") {
                    dep.registry_url = Some(resolved);
                } else if let Some(integrity) = field_value(trimmed, "integrity") {
                    dep.integrity = integrity;
                }
            }
        }
        if let Some(dep) = current.take() {
            if !dep.version.is_empty() {
                dependencies.push(dep);
            }
        }

        Ok(dependencies)
    }
}

/// Pull the package name out of a yarn.lock entry header like
/// `express@^4.15.3, express@^4.16.0` or `"@babel/core@^7.0.0"`.
fn entry_name(header: &str) -> Option<String> {
    let first = header.split(',').next()?.trim().trim_matches('"');
    let (name, _selector) = first.rsplit_once('@')?;
    if name.is_empty() {
        // "@1.2.3" style garbage - no usable name.
        return None;
    }
    Some(name.to_string())
}

/// `version "4.15.3"` -> `4.15.3`
fn field_value(line: &str, field: &str) -> Option<String> {
    let rest = line.strip_prefix(field)?.trim();
    let value = rest.trim_matches('"');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
