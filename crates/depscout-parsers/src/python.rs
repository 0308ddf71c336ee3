// Python format handlers: requirements.txt and pyproject.toml

use depscout_core::{Dependency, Error, Handler, Result, Scope};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Parse `requirements.txt` (and its `requirements-*.txt` variants).
///
/// Line-oriented, observed in the wild with every flavor of noise: comments,
/// pip flags, environment markers, extras, hash pins. Unusable lines are
/// skipped rather than failing the file.
pub struct RequirementsTxtParser;

impl Handler for RequirementsTxtParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            // Comments, blank lines and pip flags (-r, -e, --index-url ...)
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                continue;
            }

            // Environment markers come after ';', hashes after whitespace.
            let (spec, tail) = match line.split_once(';') {
                Some((spec, tail)) => (spec.trim(), tail),
                None => (line, ""),
            };
            let integrity = tail
                .split_whitespace()
                .chain(spec.split_whitespace())
                .find_map(|tok| tok.strip_prefix("--hash="))
                .map(str::to_string);
            let spec = spec.split_whitespace().next().unwrap_or(spec);

            if let Some((name, version)) = split_requirement(spec) {
                let mut dep = Dependency::new(name, version);
                if let Some(hash) = integrity {
                    dep.integrity = hash;
                }
                dependencies.push(dep);
            }
        }

        Ok(dependencies)
    }
}

/// `requests[security]==2.28.0` -> ("requests", "==2.28.0")
/// `flask>=2.0` -> ("flask", ">=2.0"), `numpy` -> ("numpy", "")
fn split_requirement(spec: &str) -> Option<(String, String)> {
    let op_start = spec.find(['=', '>', '<', '~', '!']);
    let (raw_name, version) = match op_start {
        Some(idx) => (&spec[..idx], spec[idx..].to_string()),
        None => (spec, String::new()),
    };
    // Strip extras: "requests[security]" -> "requests"
    let name = raw_name.split('[').next().unwrap_or(raw_name).trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), version))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PyProject {
    project: Project,
    #[serde(rename = "build-system")]
    build_system: BuildSystem,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Project {
    dependencies: Vec<String>,
    #[serde(rename = "optional-dependencies")]
    optional_dependencies: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BuildSystem {
    requires: Vec<String>,
}

/// Parse `pyproject.toml` - PEP 621 `[project]` tables.
pub struct PyProjectParser;

impl Handler for PyProjectParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let pyproject: PyProject =
            toml::from_str(text).map_err(|e| Error::parse(filename, e))?;

        let mut dependencies = Vec::new();
        for spec in &pyproject.project.dependencies {
            if let Some((name, version)) = split_requirement(spec.trim()) {
                dependencies.push(Dependency::new(name, version));
            }
        }
        for specs in pyproject.project.optional_dependencies.values() {
            for spec in specs {
                if let Some((name, version)) = split_requirement(spec.trim()) {
                    let mut dep = Dependency::new(name, version);
                    dep.scope = Scope::Optional;
                    dependencies.push(dep);
                }
            }
        }
        for spec in &pyproject.build_system.requires {
            if let Some((name, version)) = split_requirement(spec.trim()) {
                let mut dep = Dependency::new(name, version);
                dep.scope = Scope::Build;
                dependencies.push(dep);
            }
        }

        Ok(dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_basic_lines() {
        let content = br#"
# Python dependencies
requests==2.28.0
flask>=2.0.0
pandas~=1.5.0
numpy
-r other-requirements.txt
--index-url https://pypi.corp.example.com/simple
"#;

        let deps = RequirementsTxtParser.parse("requirements.txt", content).unwrap();
        assert_eq!(deps.len(), 4);
        assert_eq!(deps[0].name, "requests");
        assert_eq!(deps[0].version, "==2.28.0");
        assert_eq!(deps[1].version, ">=2.0.0");
        assert_eq!(deps[3].name, "numpy");
        assert_eq!(deps[3].version, "");
    }

    #[test]
    fn test_requirements_extras_markers_and_hashes() {
        let content = br#"
requests[security]==2.28.0 ; python_version >= "3.8" --hash=sha256:abc123
"#;
        let deps = RequirementsTxtParser.parse("requirements.txt", content).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "requests");
        assert_eq!(deps[0].version, "==2.28.0");
        assert_eq!(deps[0].integrity, "sha256:abc123");
    }

    #[test]
    fn test_pyproject_sections() {
        let content = br#"
[project]
name = "app"
dependencies = ["requests>=2.28", "click"]

[project.optional-dependencies]
dev = ["pytest>=7.0"]

[build-system]
requires = ["setuptools>=61"]
"#;

        let deps = PyProjectParser.parse("pyproject.toml", content).unwrap();
        assert_eq!(deps.len(), 4);
        assert_eq!(
            deps.iter().find(|d| d.name == "pytest").unwrap().scope,
            Scope::Optional
        );
        assert_eq!(
            deps.iter().find(|d| d.name == "setuptools").unwrap().scope,
            Scope::Build
        );
    }

    #[test]
    fn test_pyproject_without_project_table_is_empty_ok() {
        let deps = PyProjectParser
            .parse("pyproject.toml", b"[tool.black]\nline-length = 100\n")
            .unwrap();
        assert!(deps.is_empty());
    }
}
