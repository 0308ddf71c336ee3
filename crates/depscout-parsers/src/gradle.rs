// Gradle format handlers: build.gradle / build.gradle.kts and gradle.lockfile

use depscout_core::{Dependency, Error, Handler, Result, Scope};
use regex::Regex;
use std::sync::OnceLock;

fn shorthand_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // implementation 'group:artifact:version' / api("group:artifact:version")
        Regex::new(
            r#"(implementation|api|compileOnly|runtimeOnly|testImplementation|testRuntimeOnly)\s*[\("]?\s*['"]([^'"]+):([^'"]+):([^'"]+)['"]"#,
        )
        .expect("invalid gradle shorthand regex")
    })
}

fn map_notation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // implementation group: 'com.example', name: 'foo', version: '1.0'
        Regex::new(
            r#"(implementation|api|compileOnly|runtimeOnly|testImplementation|testRuntimeOnly)\s+group:\s*['"]([^'"]+)['"]\s*,\s*name:\s*['"]([^'"]+)['"]\s*,\s*version:\s*['"]([^'"]+)['"]"#,
        )
        .expect("invalid gradle map-notation regex")
    })
}

fn configuration_scope(configuration: &str) -> Scope {
    match configuration {
        "testImplementation" | "testRuntimeOnly" => Scope::Test,
        _ => Scope::Runtime,
    }
}

/// Parse `build.gradle` / `build.gradle.kts` - the declared manifest.
///
/// Groovy and Kotlin build scripts are full programming languages; a real
/// evaluation is out of the question, so this scans for the two dependency
/// notations that cover the overwhelming majority of real build files and
/// ignores everything else.
pub struct GradleBuildParser;

impl Handler for GradleBuildParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        for caps in shorthand_re().captures_iter(text) {
            let mut dep = Dependency::new(format!("{}:{}", &caps[2], &caps[3]), &caps[4]);
            dep.scope = configuration_scope(&caps[1]);
            dependencies.push(dep);
        }
        for caps in map_notation_re().captures_iter(text) {
            let mut dep = Dependency::new(format!("{}:{}", &caps[2], &caps[3]), &caps[4]);
            dep.scope = configuration_scope(&caps[1]);
            dependencies.push(dep);
        }

        Ok(dependencies)
    }
}

/// Parse `gradle.lockfile` - resolved `group:artifact:version=configurations`
/// lines, one per locked dependency.
pub struct GradleLockfileParser;

impl Handler for GradleLockfileParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("empty=") {
                continue;
            }
            let coordinate = line.split('=').next().unwrap_or(line);
            let mut parts = coordinate.split(':');
            let (Some(group), Some(artifact), Some(version)) =
                (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            let mut dep = Dependency::new(format!("{}:{}", group, artifact), version);
            dep.direct = false;
            if line.contains("testCompileClasspath") || line.contains("testRuntimeClasspath") {
                dep.scope = Scope::Test;
            }
            dependencies.push(dep);
        }

        Ok(dependencies)
    }
}
