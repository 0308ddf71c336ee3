// Maven format handler: pom.xml via the quick-xml event API

use depscout_core::{Dependency, Error, Handler, Result, Scope};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Parse `pom.xml` - the declared Maven manifest.
///
/// Walks `<dependencies><dependency>` blocks and records each as
/// `groupId:artifactId`. Property references like `${spring.version}` are
/// kept verbatim; resolving them would need the full POM inheritance chain,
/// which is out of scope for a single-file scan.
pub struct PomXmlParser;

impl Handler for PomXmlParser {
    fn parse(&self, filename: &str, content: &[u8]) -> Result<Vec<Dependency>> {
        let text = std::str::from_utf8(content).map_err(|e| Error::parse(filename, e))?;
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut dependencies = Vec::new();
        let mut buf = Vec::new();

        let mut in_dependency = false;
        let mut in_exclusions = false;
        let mut current_tag = String::new();
        let mut group_id = String::new();
        let mut artifact_id = String::new();
        let mut version = String::new();
        let mut maven_scope = String::new();
        let mut optional = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name =
                        String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                    if name == "dependency" && !in_exclusions {
                        in_dependency = true;
                        group_id.clear();
                        artifact_id.clear();
                        version.clear();
                        maven_scope.clear();
                        optional = false;
                    } else if name == "exclusions" {
                        // Excluded coordinates reuse the groupId/artifactId
                        // tags; they must not clobber the dependency's own.
                        in_exclusions = true;
                    }
                    current_tag = name;
                }
                Ok(Event::End(ref e)) => {
                    let name =
                        String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                    if name == "exclusions" {
                        in_exclusions = false;
                    } else if name == "dependency" && in_dependency && !in_exclusions {
                        if !artifact_id.is_empty() {
                            let full_name = if group_id.is_empty() {
                                artifact_id.clone()
                            } else {
                                format!("{}:{}", group_id, artifact_id)
                            };
                            let mut dep = Dependency::new(full_name, version.clone());
                            dep.scope = if optional {
                                Scope::Optional
                            } else {
                                match maven_scope.as_str() {
                                    "test" => Scope::Test,
                                    _ => Scope::Runtime,
                                }
                            };
                            dependencies.push(dep);
                        }
                        in_dependency = false;
                    }
                    current_tag.clear();
                }
                Ok(Event::Text(ref e)) => {
                    if in_dependency && !in_exclusions {
                        let text = e.unescape().unwrap_or_default();
                        match current_tag.as_str() {
                            "groupId" => group_id = text.to_string(),
                            "artifactId" => artifact_id = text.to_string(),
                            "version" => version = text.to_string(),
                            "scope" => maven_scope = text.to_string(),
                            "optional" => optional = text.trim() == "true",
                            _ => {}
                        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pom_dependencies_with_scopes() {
        let content = br#"<?xml version="1.0"?>
<project>
  <dependencies>
    <dependency>
      <groupId>org.springframework.security</groupId>
      <artifactId>spring-security-crypto</artifactId>
      <version>5.7.3</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>${slf4j.version}</version>
      <optional>true</optional>
    </dependency>
  </dependencies>
</project>"#;

        let deps = PomXmlParser.parse("pom.xml", content).unwrap();
        assert_eq!(deps.len(), 3);

        assert_eq!(deps[0].name, "org.springframework.security:spring-security-crypto");
        assert_eq!(deps[0].version, "5.7.3");
        assert_eq!(deps[0].scope, Scope::Runtime);

        assert_eq!(deps[1].scope, Scope::Test);

        // Unresolved property references stay verbatim.
        assert_eq!(deps[2].version, "${slf4j.version}");
        assert_eq!(deps[2].scope, Scope::Optional);
    }

    #[test]
    fn test_pom_exclusions_do_not_clobber_coordinates() {
        let content = br#"<?xml version="1.0"?>
<project>
  <dependencies>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>widget</artifactId>
      <version>1.0.0</version>
      <exclusions>
        <exclusion>
          <groupId>commons-logging</groupId>
          <artifactId>commons-logging</artifactId>
        </exclusion>
      </exclusions>
    </dependency>
  </dependencies>
</project>"#;

        let deps = PomXmlParser.parse("pom.xml", content).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "com.example:widget");
        assert_eq!(deps[0].version, "1.0.0");
    }

    #[test]
    fn test_pom_without_dependencies_is_empty_ok() {
        let content = br#"<?xml version="1.0"?>
<project>
  <groupId>com.example</groupId>
  <artifactId>app</artifactId>
</project>"#;
        let deps = PomXmlParser.parse("pom.xml", content).unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn test_pom_mismatched_tags_is_parse_error() {
        let err = PomXmlParser
            .parse("pom.xml", b"<project><dependencies></project>")
            .unwrap_err();
        assert!(matches!(err, Error::Parse { ref filename, .. } if filename == "pom.xml"));
    }
}
