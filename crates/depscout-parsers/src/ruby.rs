// Ruby format handlers: Gemfile and Gemfile.lock

use depscout_core::{Dependency, Error, Handler, Result, Scope};
use regex::Regex;
use std::sync::OnceLock;

fn gem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // gem 'rails', '~> 7.0.4'  (the second literal is optional)
        Regex::new(r#"^\s*gem\s+['"]([^'"]+)['"](?:\s*,\s*['"]([^'"]+)['"])?"#)
            .expect("invalid gem regex")
    })
}

fn locked_gem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Resolved gems sit at exactly four spaces of indent; deeper rows are
    // their requirement lists.
    RE.get_or_init(|| Regex::new(r"^ {4}(\S+) \(([^)]+)\)").expect("invalid locked gem regex"))
}

/// Parse `Gemfile` - the declared manifest.
///
/// Understands `gem` lines and `group :test do ... end` blocks well enough
/// to scope dependencies; everything Ruby beyond that (conditionals, custom
/// sources, inline platforms) is ignored rather than fatal.
pub struct GemfileParser;

impl Handler for GemfileParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();
        let mut group_scope: Option<Scope> = None;

        for line in text.lines() {
            let trimmed = line.trim();

            if trimmed.starts_with("group") && trimmed.ends_with("do") {
                group_scope = if trimmed.contains(":test") {
                    Some(Scope::Test)
                } else if trimmed.contains(":development") {
                    Some(Scope::Development)
                } else {
                    None
                };
                continue;
            }
            if trimmed == "end" {
                group_scope = None;
                continue;
            }

            if let Some(caps) = gem_re().captures(line) {
                let version = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                let mut dep = Dependency::new(&caps[1], version);
                if let Some(scope) = group_scope {
                    dep.scope = scope;
                }
                dependencies.push(dep);
            }
        }

        Ok(dependencies)
    }
}

/// Parse `Gemfile.lock` - the resolved lockfile. Only the four-space-indented
/// `name (version)` rows under GEM are real resolutions.
pub struct GemfileLockParser;

impl Handler for GemfileLockParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        for line in text.lines() {
            if let Some(caps) = locked_gem_re().captures(line) {
                let mut dep = Dependency::new(&caps[1], &caps[2]);
                dep.direct = false;
                dependencies.push(dep);
            }
        }

        Ok(dependencies)
    }
}
