use thiserror::Error;

/// All the ways classification and parsing can go wrong
///
/// Two kinds only, on purpose: either nobody recognized the filename, or a
/// handler that did recognize it choked on the content. A classification
/// miss from `identify` is not an error at all - it comes back as `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// No registered matcher recognized the filename. Only `parse` raises
    /// this; `identify` reports the same situation as `None`.
    #[error("don't know how to parse `{filename}`")]
    UnknownFile { filename: String },

    /// A handler recognized the file but its content did not conform to the
    /// grammar the handler expects. The underlying cause is reachable
    /// through `std::error::Error::source`.
    #[error("failed to parse `{filename}`")]
    Parse {
        filename: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Wrap a format-library error exactly once. Handlers call this; the
    /// pipeline never re-wraps what a handler produced.
    pub fn parse(filename: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Error::Parse {
            filename: filename.into(),
            source: source.into(),
        }
    }

    pub fn unknown_file(filename: impl Into<String>) -> Self {
        Error::UnknownFile {
            filename: filename.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unknown_file_carries_filename() {
        let err = Error::unknown_file("unknown.txt");
        assert_eq!(err.to_string(), "don't know how to parse `unknown.txt`");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_parse_error_exposes_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = Error::parse("package.json", cause);
        assert_eq!(err.to_string(), "failed to parse `package.json`");
        assert!(err.source().is_some());
    }
}
