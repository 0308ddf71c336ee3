// Data model for classified dependency files
// Everything a handler reports, plus the canonical identifier the core attaches

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single dependency as stated by a manifest or lockfile.
///
/// Handlers fill everything except `purl` - that field belongs to the
/// canonicalization step and gets overwritten there unconditionally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name as the source file states it. May be a bare name,
    /// a scoped name (`@babel/core`) or a `group:artifact` composite.
    pub name: String,
    /// Free-form version string. May be empty, pinned, or a range - the
    /// core does not normalize it outside the identifier builder.
    pub version: String,
    pub scope: Scope,
    /// Integrity hash if the file states one, empty otherwise.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub integrity: String,
    /// True when the file declares this dependency directly rather than
    /// recording it as pulled in transitively.
    pub direct: bool,
    /// Canonical package identifier, populated by `Registry::parse`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purl: String,
    /// Source location (tarball, VCS or registry URL) if the file states one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
}

impl Dependency {
    /// Convenience constructor for the common case: a direct runtime
    /// dependency with nothing but a name and a version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            scope: Scope::Runtime,
            direct: true,
            ..Self::default()
        }
    }
}

/// Where a dependency applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Runtime,
    Development,
    Test,
    Build,
    Optional,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Runtime => write!(f, "runtime"),
            Scope::Development => write!(f, "development"),
            Scope::Test => write!(f, "test"),
            Scope::Build => write!(f, "build"),
            Scope::Optional => write!(f, "optional"),
        }
    }
}

/// What role the file itself plays in its ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Declares intended dependencies, possibly as ranges.
    Manifest,
    /// Declares resolved, pinned dependencies.
    Lockfile,
    /// Adds integrity data to an existing manifest's dependencies rather
    /// than standing alone (go.sum). Versions are pinned like a lockfile;
    /// callers merging results across files must not double-count these
    /// against the manifest they augment.
    Supplement,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Manifest => write!(f, "manifest"),
            FileKind::Lockfile => write!(f, "lockfile"),
            FileKind::Supplement => write!(f, "supplement"),
        }
    }
}

/// One registration that recognized a filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub ecosystem: String,
    pub kind: FileKind,
}

/// Everything a single `parse` call produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub ecosystem: String,
    pub kind: FileKind,
    pub dependencies: Vec<Dependency>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_new_defaults() {
        let dep = Dependency::new("serde", "1.0");
        assert_eq!(dep.name, "serde");
        assert_eq!(dep.version, "1.0");
        assert_eq!(dep.scope, Scope::Runtime);
        assert!(dep.direct);
        assert!(dep.purl.is_empty());
        assert!(dep.integrity.is_empty());
        assert!(dep.registry_url.is_none());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FileKind::Manifest.to_string(), "manifest");
        assert_eq!(FileKind::Lockfile.to_string(), "lockfile");
        assert_eq!(FileKind::Supplement.to_string(), "supplement");
    }

    #[test]
    fn test_scope_serializes_lowercase() {
        let json = serde_json::to_string(&Scope::Development).unwrap();
        assert_eq!(json, "\"development\"");
    }
}
