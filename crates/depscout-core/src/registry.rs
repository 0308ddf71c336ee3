// The registry: ordered format registrations, filename dispatch, and the
// parse pipeline that turns raw handler output into canonicalized results

use crate::error::Error;
use crate::matcher::Matcher;
use crate::models::{Dependency, FileKind, Match, ParseResult};
use crate::purl;
use crate::Result;
use tracing::{debug, trace};

/// The one-method contract every format collaborator satisfies.
///
/// Handlers treat `content` as read-only, never set `purl` (the pipeline
/// overwrites it regardless), and may legitimately return an empty list -
/// "nothing declared" is a success, not an error. On failure they wrap the
/// underlying cause once via [`Error::parse`] so callers can reach it
/// through `source()`.
pub trait Handler: Send + Sync {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>>;
}

/// One (ecosystem, kind, handler, matcher) tuple. Immutable once registered;
/// registration order decides which one wins an ambiguous filename.
pub struct Registration {
    ecosystem: String,
    kind: FileKind,
    handler: Box<dyn Handler>,
    matcher: Matcher,
}

/// One-time composition phase. Collect every registration in a fixed,
/// auditable order, then `build()` into an immutable [`Registry`]. There is
/// no way to register after build, which is what makes lock-free concurrent
/// lookups sound.
#[derive(Default)]
pub struct RegistryBuilder {
    registrations: Vec<Registration>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration. Order is significant: earlier registrations
    /// win when more than one matcher recognizes the same filename.
    pub fn register(
        mut self,
        ecosystem: impl Into<String>,
        kind: FileKind,
        handler: impl Handler + 'static,
        matcher: Matcher,
    ) -> Self {
        self.registrations.push(Registration {
            ecosystem: ecosystem.into(),
            kind,
            handler: Box::new(handler),
            matcher,
        });
        self
    }

    pub fn build(self) -> Registry {
        debug!(registrations = self.registrations.len(), "registry built");
        Registry {
            registrations: self.registrations,
        }
    }
}

/// Read-only set of format registrations. All lookups are pure reads, so a
/// shared `Registry` can serve any number of threads without locking.
pub struct Registry {
    registrations: Vec<Registration>,
}

/// The path's leaf component, tolerating both separator styles.
fn leaf(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}

impl Registry {
    /// Resolve a filename to the first matching registration.
    ///
    /// Each matcher is tried against the full input string first (a few
    /// formats are directory-sensitive) and then against the leaf name
    /// (everything else). `None` means no registration recognized the file -
    /// an expected outcome the caller branches on, not a failure.
    pub fn identify(&self, filename: &str) -> Option<Match> {
        self.find(filename).map(|r| Match {
            ecosystem: r.ecosystem.clone(),
            kind: r.kind,
        })
    }

    /// Every registration that recognizes the filename, in registration
    /// order. More than one ecosystem can legitimately claim the same
    /// physical filename (a generic suffix matcher and a specific exact
    /// matcher both firing).
    pub fn identify_all(&self, filename: &str) -> Vec<Match> {
        let name = leaf(filename);
        self.registrations
            .iter()
            .filter(|r| r.matcher.matches(filename) || r.matcher.matches(name))
            .map(|r| Match {
                ecosystem: r.ecosystem.clone(),
                kind: r.kind,
            })
            .collect()
    }

    /// Distinct ecosystem tags across all registrations, first-seen order.
    pub fn ecosystems(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for r in &self.registrations {
            if !seen.contains(&r.ecosystem.as_str()) {
                seen.push(r.ecosystem.as_str());
            }
        }
        seen
    }

    /// The main entry point: classify, invoke the handler, attach canonical
    /// identifiers, assemble the result.
    ///
    /// Handler errors come back exactly as the handler produced them. The
    /// version goes into the identifier only for pinned kinds (lockfile,
    /// supplement) - a manifest usually states a range, and embedding a
    /// range into a canonical identifier would be misleading.
    pub fn parse(&self, filename: &str, content: &[u8]) -> Result<ParseResult> {
        let registration = self
            .find(filename)
            .ok_or_else(|| Error::unknown_file(filename))?;
        debug!(
            filename,
            ecosystem = %registration.ecosystem,
            kind = %registration.kind,
            "dispatching to handler"
        );

        let mut dependencies = registration.handler.parse(filename, content)?;

        let pinned = matches!(registration.kind, FileKind::Lockfile | FileKind::Supplement);
        for dep in &mut dependencies {
            let version = if pinned { dep.version.as_str() } else { "" };
            dep.purl = purl::package_url(
                &registration.ecosystem,
                &dep.name,
                version,
                dep.registry_url.as_deref(),
            );
            trace!(name = %dep.name, purl = %dep.purl, "canonicalized");
        }

        Ok(ParseResult {
            ecosystem: registration.ecosystem.clone(),
            kind: registration.kind,
            dependencies,
        })
    }

    fn find(&self, filename: &str) -> Option<&Registration> {
        let name = leaf(filename);
        self.registrations
            .iter()
            .find(|r| r.matcher.matches(filename) || r.matcher.matches(name))
    }
}
