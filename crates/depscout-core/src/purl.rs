// Canonical package identifier ("purl") construction
// Pure string-to-string derivation: this module never fails - malformed input
// degrades to a partial identifier rather than an error, because the rest of
// the dependency record is worth more than strictness in one derived field

/// Leading version-constraint operators, longest first so `==` wins over `=`
/// and `~>` wins over `~`.
const VERSION_OPERATORS: [&str; 9] = ["==", "~>", ">=", "<=", "^", "~", "=", ">", "<"];

/// Default registry hosts per ecosystem. A source URL pointing at one of
/// these (exact host or dot-boundary suffix) carries no information beyond
/// "the usual place", so no qualifier is attached for it. Ecosystems missing
/// from this table are treated as always-non-default.
fn default_registry_hosts(ecosystem: &str) -> &'static [&'static str] {
    match ecosystem {
        "npm" => &["registry.npmjs.org", "npmjs.org"],
        "cargo" => &["crates.io"],
        "pypi" => &["pypi.org", "pythonhosted.org"],
        "gem" => &["rubygems.org"],
        "maven" => &["repo.maven.apache.org", "repo1.maven.org"],
        "golang" => &["proxy.golang.org"],
        "composer" => &["packagist.org"],
        "nuget" => &["nuget.org"],
        _ => &[],
    }
}

/// Build the canonical identifier for a dependency.
///
/// `version` should be empty when the source file only states a range (the
/// registry passes the version through for lockfile-kind files only).
/// `registry_url` becomes a `repository_url` qualifier unless it points at
/// the ecosystem's default registry.
pub fn package_url(
    ecosystem: &str,
    name: &str,
    version: &str,
    registry_url: Option<&str>,
) -> String {
    // A couple of ecosystem tags map to a different canonical type token,
    // and those renames force a fixed namespace regardless of the input.
    let (purl_type, forced_namespace) = match ecosystem {
        "alpine" => ("apk", Some("alpine")),
        "debian" => ("deb", Some("debian")),
        other => (other, None),
    };

    let (namespace, bare_name) = match forced_namespace {
        Some(ns) => (ns.to_string(), name.to_string()),
        None => split_namespace(ecosystem, name),
    };

    let version = strip_version_operator(version);

    let mut purl = String::from("pkg:");
    purl.push_str(purl_type);
    purl.push('/');
    if !namespace.is_empty() {
        // Namespace may itself contain path segments (golang); encode each
        // segment but keep the separators.
        let encoded: Vec<String> = namespace.split('/').map(encode).collect();
        purl.push_str(&encoded.join("/"));
        purl.push('/');
    }
    purl.push_str(&encode(&bare_name));
    if !version.is_empty() {
        purl.push('@');
        purl.push_str(&encode(version));
    }

    if let Some(url) = registry_url {
        if !is_default_registry(ecosystem, url) {
            purl.push_str("?repository_url=");
            purl.push_str(&encode(url));
        }
    }

    purl
}

/// Split a composite package name into (namespace, name) using the
/// ecosystem's convention. Ecosystems without composite names keep the
/// whole string as the name.
fn split_namespace(ecosystem: &str, name: &str) -> (String, String) {
    match ecosystem {
        // Scoped names: "@babel/core" -> ("babel", "core")
        "npm" => match name.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
            Some((scope, bare)) => (scope.to_string(), bare.to_string()),
            None => (String::new(), name.to_string()),
        },
        // Module paths: "github.com/pkg/errors" -> ("github.com/pkg", "errors")
        "golang" => match name.rsplit_once('/') {
            Some((namespace, bare)) => (namespace.to_string(), bare.to_string()),
            None => (String::new(), name.to_string()),
        },
        // Coordinates: "org.springframework:spring-core" -> split at first colon
        "maven" | "gradle" => match name.split_once(':') {
            Some((group, artifact)) => (group.to_string(), artifact.to_string()),
            None => (String::new(), name.to_string()),
        },
        _ => (String::new(), name.to_string()),
    }
}

/// Strip at most one leading constraint operator, then trim whitespace.
///
/// Intentionally shallow: wildcards ("1.1.*") and multi-clause ranges
/// (">= 4.9 && < 4.11") pass through after the first operator is gone.
/// Downstream consumers already depend on this lenient shape, so it stays.
fn strip_version_operator(version: &str) -> &str {
    let version = version.trim();
    for op in VERSION_OPERATORS {
        if let Some(rest) = version.strip_prefix(op) {
            return rest.trim();
        }
    }
    version
}

/// Whether the URL points at the ecosystem's default registry.
fn is_default_registry(ecosystem: &str, url: &str) -> bool {
    let defaults = default_registry_hosts(ecosystem);
    if defaults.is_empty() {
        return false;
    }
    // Compare the host if one parses out, the raw string otherwise.
    let candidate = host_of(url).unwrap_or(url);
    defaults.iter().any(|d| {
        candidate == *d || candidate.ends_with(&format!(".{}", d))
    })
}

/// Extract the host from a URL-shaped string, without a URL library:
/// everything between `://` and the next `/`, minus userinfo and port.
fn host_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://")?.1;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Percent-encode one identifier component. Unreserved characters pass
/// through, everything else becomes `%XX`.
fn encode(component: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(component.len());
    for byte in component.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0f) as usize] as char);
            }
        }
    }
    out
}
