// Format collaborators: one thin extractor per dependency file format,
// assembled into a Registry by the composition root below

pub mod actions;
pub mod cargo;
pub mod composer;
pub mod golang;
pub mod gradle;
pub mod maven;
pub mod npm;
pub mod nuget;
pub mod python;
pub mod ruby;

use depscout_core::{FileKind, Matcher, Registry, RegistryBuilder};

/// Build the registry of every built-in format.
///
/// This is the one place registration happens, in one fixed order, so
/// which handler wins an ambiguous filename is decided here and nowhere
/// else. The returned registry is immutable; build it once at startup and
/// share it.
pub fn builtin() -> Registry {
    RegistryBuilder::new()
        // npm
        .register(
            "npm",
            FileKind::Manifest,
            npm::PackageJsonParser,
            Matcher::exact(["package.json"]),
        )
        .register(
            "npm",
            FileKind::Lockfile,
            npm::PackageLockParser,
            Matcher::exact(["package-lock.json", "npm-shrinkwrap.json"]),
        )
        .register(
            "npm",
            FileKind::Lockfile,
            npm::YarnLockParser,
            Matcher::exact(["yarn.lock"]),
        )
        // cargo
        .register(
            "cargo",
            FileKind::Manifest,
            cargo::CargoTomlParser,
            Matcher::exact(["Cargo.toml"]),
        )
        .register(
            "cargo",
            FileKind::Lockfile,
            cargo::CargoLockParser,
            Matcher::exact(["Cargo.lock"]),
        )
        // python
        .register(
            "pypi",
            FileKind::Manifest,
            python::RequirementsTxtParser,
            Matcher::any_of([
                Matcher::glob("requirements*.txt"),
                Matcher::suffix(["-requirements.txt"]),
            ]),
        )
        .register(
            "pypi",
            FileKind::Manifest,
            python::PyProjectParser,
            Matcher::exact(["pyproject.toml"]),
        )
        // go
        .register(
            "golang",
            FileKind::Manifest,
            golang::GoModParser,
            Matcher::exact(["go.mod"]),
        )
        .register(
            "golang",
            FileKind::Supplement,
            golang::GoSumParser,
            Matcher::exact(["go.sum"]),
        )
        // jvm
        .register(
            "maven",
            FileKind::Manifest,
            maven::PomXmlParser,
            Matcher::exact(["pom.xml"]),
        )
        .register(
            "gradle",
            FileKind::Manifest,
            gradle::GradleBuildParser,
            Matcher::exact(["build.gradle", "build.gradle.kts"]),
        )
        .register(
            "gradle",
            FileKind::Lockfile,
            gradle::GradleLockfileParser,
            Matcher::exact(["gradle.lockfile"]),
        )
        // ruby
        .register(
            "gem",
            FileKind::Manifest,
            ruby::GemfileParser,
            Matcher::exact(["Gemfile"]),
        )
        .register(
            "gem",
            FileKind::Lockfile,
            ruby::GemfileLockParser,
            Matcher::exact(["Gemfile.lock"]),
        )
        // php
        .register(
            "composer",
            FileKind::Manifest,
            composer::ComposerJsonParser,
            Matcher::exact(["composer.json"]),
        )
        .register(
            "composer",
            FileKind::Lockfile,
            composer::ComposerLockParser,
            Matcher::exact(["composer.lock"]),
        )
        // .NET
        .register(
            "nuget",
            FileKind::Manifest,
            nuget::CsprojParser,
            Matcher::glob("*.csproj"),
        )
        .register(
            "nuget",
            FileKind::Lockfile,
            nuget::PackagesLockParser,
            Matcher::exact(["packages.lock.json"]),
        )
        // CI
        .register(
            "githubactions",
            FileKind::Manifest,
            actions::WorkflowParser,
            Matcher::path(actions::is_workflow_path),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ecosystems_unique_first_seen() {
        let registry = builtin();
        let ecosystems = registry.ecosystems();
        assert_eq!(
            ecosystems,
            vec![
                "npm",
                "cargo",
                "pypi",
                "golang",
                "maven",
                "gradle",
                "gem",
                "composer",
                "nuget",
                "githubactions"
            ]
        );
    }

    #[test]
    fn test_builtin_identifies_common_files() {
        let registry = builtin();

        let cases = [
            ("package.json", "npm", FileKind::Manifest),
            ("package-lock.json", "npm", FileKind::Lockfile),
            ("yarn.lock", "npm", FileKind::Lockfile),
            ("Cargo.toml", "cargo", FileKind::Manifest),
            ("requirements-dev.txt", "pypi", FileKind::Manifest),
            ("go.sum", "golang", FileKind::Supplement),
            ("backend/pom.xml", "maven", FileKind::Manifest),
            ("App.csproj", "nuget", FileKind::Manifest),
            (".github/workflows/ci.yml", "githubactions", FileKind::Manifest),
        ];
        for (filename, ecosystem, kind) in cases {
            let m = registry.identify(filename).unwrap();
            assert_eq!(m.ecosystem, ecosystem, "{filename}");
            assert_eq!(m.kind, kind, "{filename}");
        }

        assert!(registry.identify("unknown.txt").is_none());
        // The workflow handler only applies inside .github/workflows.
        assert!(registry.identify("ci.yml").is_none());
    }

    #[test]
    fn test_end_to_end_manifest_purls_omit_versions() {
        let registry = builtin();
        let content = br#"{ "dependencies": { "@scope/pkg": "^1.2.3", "express": "^4.15.3" } }"#;

        let result = registry.parse("web/package.json", content).unwrap();
        assert_eq!(result.ecosystem, "npm");
        assert_eq!(result.kind, FileKind::Manifest);

        let scoped = result.dependencies.iter().find(|d| d.name == "@scope/pkg").unwrap();
        assert_eq!(scoped.purl, "pkg:npm/scope/pkg");
        let express = result.dependencies.iter().find(|d| d.name == "express").unwrap();
        assert_eq!(express.purl, "pkg:npm/express");
    }

    #[test]
    fn test_end_to_end_lockfile_purls_carry_versions() {
        let registry = builtin();
        let content = br#"
[[package]]
name = "serde"
version = "1.0.200"
source = "registry+https://github.com/rust-lang/crates.io-index"
"#;

        let result = registry.parse("Cargo.lock", content).unwrap();
        assert_eq!(result.kind, FileKind::Lockfile);
        assert_eq!(result.dependencies[0].purl, "pkg:cargo/serde@1.0.200");
    }

    #[test]
    fn test_end_to_end_supplement_purls_carry_versions() {
        let registry = builtin();
        let content =
            b"github.com/pkg/errors v0.8.0 h1:WdK/asTD0HN+q6hsWO3/vpuAkAr+tw6aNJNDFFf0+qw=\n";

        let result = registry.parse("go.sum", content).unwrap();
        assert_eq!(result.kind, FileKind::Supplement);
        assert_eq!(
            result.dependencies[0].purl,
            "pkg:golang/github.com/pkg/errors@v0.8.0"
        );
        assert!(!result.dependencies[0].integrity.is_empty());
    }

    #[test]
    fn test_end_to_end_handler_error_carries_filename() {
        let registry = builtin();
        let err = registry.parse("package.json", b"{not json").unwrap_err();
        assert!(matches!(
            err,
            depscout_core::Error::Parse { ref filename, .. } if filename == "package.json"
        ));
    }
}
