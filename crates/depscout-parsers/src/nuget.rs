// .NET format handlers: *.csproj project files and packages.lock.json

use depscout_core::{Dependency, Error, Handler, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::Value;

/// Parse a `*.csproj` project file - the declared manifest.
///
/// Reads `<PackageReference Include="..." Version="..." />` items. SDK-style
/// projects put the version in an attribute; the old child-element form is
/// rare enough to skip.
pub struct CsprojParser;

fn package_reference(e: &BytesStart<'_>) -> Option<Dependency> {
    let mut include = None;
    let mut version = None;
    for attr in e.attributes().flatten() {
        let key = attr.key.local_name();
        let value = attr.unescape_value().ok()?;
        match key.as_ref() {
            b"Include" => include = Some(value.into_owned()),
            b"Version" => version = Some(value.into_owned()),
            _ => {}
        }
    }
    Some(Dependency::new(include?, version.unwrap_or_default()))
}

impl Handler for CsprojParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut dependencies = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().local_name().as_ref() == b"PackageReference" =>
                {
                    if let Some(dep) = package_reference(e) {
                        dependencies.push(dep);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::parse(filename, e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(dependencies)
    }
}

/// Parse `packages.lock.json` - the resolved NuGet lockfile, one dependency
/// map per target framework. `type` distinguishes direct from transitive;
/// `Project` entries are sibling projects, not packages.
pub struct PackagesLockParser;

impl Handler for PackagesLockParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let lock: Value =
            serde_json::from_slice(content).map_err(|e| Error::parse(filename, e))?;
        let mut dependencies = Vec::new();

        let Some(frameworks) = lock.get("dependencies").and_then(|v| v.as_object()) else {
            return Ok(dependencies);
        };
        for packages in frameworks.values().filter_map(|v| v.as_object()) {
            for (name, info) in packages {
                let kind = info.get("type").and_then(|v| v.as_str()).unwrap_or("");
                if kind == "Project" {
                    continue;
                }
                let mut dep = Dependency::new(
                    name.clone(),
                    info.get("resolved").and_then(|v| v.as_str()).unwrap_or(""),
                );
                dep.direct = kind == "Direct";
                if let Some(hash) = info.get("contentHash").and_then(|v| v.as_str()) {
                    dep.integrity = hash.to_string();
                }
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
    fn test_csproj_package_references() {
        let content = br#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Newtonsoft.Json" Version="13.0.1" />
    <PackageReference Include="Serilog" Version="3.1.1" />
  </ItemGroup>
</Project>"#;

        let deps = CsprojParser.parse("App.csproj", content).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "Newtonsoft.Json");
        assert_eq!(deps[0].version, "13.0.1");
    }

    #[test]
    fn test_packages_lock_direct_and_transitive() {
        let content = br#"{
            "version": 1,
            "dependencies": {
                "net8.0": {
                    "Newtonsoft.Json": {
                        "type": "Direct",
                        "requested": "[13.0.1, )",
                        "resolved": "13.0.1",
                        "contentHash": "hash-a"
                    },
                    "System.Memory": {
                        "type": "Transitive",
                        "resolved": "4.5.5"
                    },
                    "MyOtherProject": {
                        "type": "Project"
                    }
                }
            }
        }"#;

        let deps = PackagesLockParser.parse("packages.lock.json", content).unwrap();
        assert_eq!(deps.len(), 2);

        let newtonsoft = deps.iter().find(|d| d.name == "Newtonsoft.Json").unwrap();
        assert!(newtonsoft.direct);
        assert_eq!(newtonsoft.version, "13.0.1");
        assert_eq!(newtonsoft.integrity, "hash-a");

        let memory = deps.iter().find(|d| d.name == "System.Memory").unwrap();
        assert!(!memory.direct);
    }
}
