use std::fmt;

use crate::duration::DurationError;
use crate::format::Format;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which side of the conversion a format name was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Target,
}

impl Role {
    /// Command line flag that selects this side.
    pub fn flag(self) -> &'static str {
        match self {
            Role::Source => "-f",
            Role::Target => "-t",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => f.write_str("source"),
            Role::Target => f.write_str("target"),
        }
    }
}

/// Every way a conversion can fail. None of these are retried.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(
        "unsupported {role} format {name:?} ({}), supported formats: {}",
        .role.flag(),
        Format::supported_names()
    )]
    UnsupportedFormat { role: Role, name: String },

    #[error("source format (-f) is required, none could be inferred from {}", describe_input(.input))]
    MissingSourceFormat { input: String },

    #[error("source and target formats are both {format}")]
    IdenticalFormats { format: Format },

    #[error("invalid timeout {value:?}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: DurationError,
    },

    #[error("failed to fetch {location}")]
    FetchFailed {
        location: String,
        #[source]
        source: BoxError,
    },

    #[error("decode input content as {format} failed")]
    DecodeFailed {
        format: Format,
        #[source]
        source: BoxError,
    },

    #[error("encoding content to {format} failed")]
    EncodeFailed {
        format: Format,
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub fn fetch_failed(location: impl fmt::Display, source: impl Into<BoxError>) -> Self {
        Error::FetchFailed {
            location: location.to_string(),
            source: source.into(),
        }
    }
}

fn describe_input(input: &str) -> String {
    if input.is_empty() {
        "standard input".to_owned()
    } else {
        format!("{input:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unsupported_format_lists_supported_names() {
        let err = Error::UnsupportedFormat {
            role: Role::Target,
            name: "xml".into(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported target format \"xml\" (-t), supported formats: json, toml, yml, msgpack"
        );
    }

    #[test]
    fn test_missing_source_format_names_stdin() {
        let err = Error::MissingSourceFormat {
            input: String::new(),
        };
        assert!(err.to_string().ends_with("from standard input"), "{err}");
    }

    #[test]
    fn test_fetch_failed_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::fetch_failed("data.json", io);
        assert_eq!(err.to_string(), "failed to fetch data.json");
        assert_eq!(err.source().unwrap().to_string(), "no such file");
    }
}
