// Core classification and canonicalization logic lives here
// Format collaborators plug in through the Handler trait; see depscout-parsers

pub mod error;
pub mod matcher;
pub mod models;
pub mod purl;
pub mod registry;

pub use error::Error;
pub use matcher::Matcher;
pub use models::{Dependency, FileKind, Match, ParseResult, Scope};
pub use purl::package_url;
pub use registry::{Handler, Registry, RegistryBuilder};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
