// GitHub Actions workflow handler
// Only recognized inside a .github/workflows directory, which is what the
// path-aware matcher in the composition root is for

use depscout_core::{Dependency, Error, Handler, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Path predicate for workflow files. Gets the full relative path and must
/// tolerate both separator styles; a bare `ci.yml` leaf is not a workflow.
pub fn is_workflow_path(path: &str) -> bool {
    let normalized = path.replace('\\', "/");
    let Some((dir, leaf)) = normalized.rsplit_once('/') else {
        return false;
    };
    (dir == ".github/workflows" || dir.ends_with("/.github/workflows"))
        && (leaf.ends_with(".yml") || leaf.ends_with(".yaml"))
}

fn uses_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    //   - uses: actions/checkout@v4
    //     uses: "docker://alpine:3.18"   (skipped below)
    RE.get_or_init(|| {
        Regex::new(r##"(?m)^\s*-?\s*uses:\s*['"]?([^\s'"#]+)"##).expect("invalid uses regex")
    })
}

/// Parse a workflow file for the actions it runs.
///
/// `uses:` references are the dependency declarations; local composite
/// actions (`./...`) and raw docker images are not registry packages and
/// are skipped. No yaml parsing - a line scan over `uses:` gets every
/// realistic workflow and shrugs off broken yaml the same way the other
/// line-oriented handlers do.
pub struct WorkflowParser;

impl Handler for WorkflowParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        for caps in uses_re().captures_iter(text) {
            let reference = &caps[1];
            if reference.starts_with("./") || reference.starts_with("docker://") {
                continue;
            }
            let (name, version) = match reference.rsplit_once('@') {
                Some((name, version)) => (name, version),
                None => (reference, ""),
            };
            if name.is_empty() {
                continue;
            }
            dependencies.push(Dependency::new(name, version));
        }

        Ok(dependencies)
    }
}
