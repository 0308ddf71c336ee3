// Filename matchers - pure predicates deciding whether a registration applies
// No filesystem access, no shared state, same answer for the same input every time

use glob::Pattern;

/// A pure predicate over a filename string.
///
/// Most formats only care about the file's own name (`Cargo.lock`,
/// `*.csproj`); a few need directory context (CI workflow files). The
/// registry tries each matcher against the full input path first and then
/// against the leaf component, so simple matchers never have to strip
/// directories themselves.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Filename equals one of these literals, case-sensitive.
    Exact(Vec<String>),
    /// Filename ends with one of these literals.
    Suffix(Vec<String>),
    /// Filename begins with one of these literals.
    Prefix(Vec<String>),
    /// Filename matches a shell-style glob pattern.
    Glob(Pattern),
    /// Any sub-matcher accepts. Lets one registration combine heterogeneous
    /// conditions (exact name OR suffix pattern).
    AnyOf(Vec<Matcher>),
    /// Custom path-aware predicate. Gets the string as-is, including any
    /// directory components, and must tolerate both `/` and `\` separators.
    Path(fn(&str) -> bool),
}

impl Matcher {
    pub fn exact<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::Exact(names.into_iter().map(Into::into).collect())
    }

    pub fn suffix<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::Suffix(suffixes.into_iter().map(Into::into).collect())
    }

    pub fn prefix<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::Prefix(prefixes.into_iter().map(Into::into).collect())
    }

    /// Build a glob matcher. Patterns are compile-time literals supplied by
    /// the composition root, so an invalid one is a programming error.
    pub fn glob(pattern: &str) -> Self {
        Matcher::Glob(Pattern::new(pattern).expect("invalid glob pattern"))
    }

    pub fn any_of<I>(matchers: I) -> Self
    where
        I: IntoIterator<Item = Matcher>,
    {
        Matcher::AnyOf(matchers.into_iter().collect())
    }

    pub fn path(predicate: fn(&str) -> bool) -> Self {
        Matcher::Path(predicate)
    }

    /// Test this matcher against a filename.
    pub fn matches(&self, filename: &str) -> bool {
        match self {
            Matcher::Exact(names) => names.iter().any(|n| n == filename),
            Matcher::Suffix(suffixes) => suffixes.iter().any(|s| filename.ends_with(s.as_str())),
            Matcher::Prefix(prefixes) => prefixes.iter().any(|p| filename.starts_with(p.as_str())),
            Matcher::Glob(pattern) => pattern.matches(filename),
            Matcher::AnyOf(matchers) => matchers.iter().any(|m| m.matches(filename)),
            Matcher::Path(predicate) => predicate(filename),
        }
    }
}
