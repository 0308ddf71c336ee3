// Go format handlers: go.mod (manifest) and go.sum (supplement)

use depscout_core::{Dependency, Error, Handler, Result};

/// Parse `go.mod` - the declared module manifest.
///
/// Handles both the single-line `require x v1` form and `require ( ... )`
/// blocks. Modules tagged `// indirect` are reported with `direct = false`.
pub struct GoModParser;

impl Handler for GoModParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();
        let mut in_require = false;

        for line in text.lines() {
            let trimmed = line.trim();

            if trimmed == "require (" {
                in_require = true;
                continue;
            }
            if in_require && trimmed == ")" {
                in_require = false;
                continue;
            }

            let entry = if in_require {
                trimmed
            } else if let Some(rest) = trimmed.strip_prefix("require ") {
                rest.trim()
            } else {
                continue;
            };
            if entry.starts_with("//") || entry.is_empty() {
                continue;
            }

            let mut parts = entry.split_whitespace();
            let (Some(name), Some(version)) = (parts.next(), parts.next()) else {
                continue;
            };
            let mut dep = Dependency::new(name, version);
            dep.direct = !entry.contains("// indirect");
            dependencies.push(dep);
        }

        Ok(dependencies)
    }
}

/// Parse `go.sum` - a supplement, not a standalone dependency list.
///
/// Each line is `module version hash`. The `version/go.mod` rows hash the
/// module's own manifest rather than its content and are skipped, so each
/// module shows up once with its content hash as integrity. Dependencies
/// from this file augment go.mod's and must not be double-counted against
/// it by callers.
pub struct GoSumParser;

impl Handler for GoSumParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        for line in text.lines() {
            let mut parts = line.split_whitespace();
            let (Some(name), Some(version), Some(hash)) =
                (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            if version.ends_with("/go.mod") {
                continue;
            }

            let mut dep = Dependency::new(name, version);
            dep.direct = false;
            dep.integrity = hash.to_string();
            dependencies.push(dep);
        }

        Ok(dependencies)
    }
}
