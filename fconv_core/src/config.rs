use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::duration;
use crate::error::{Error, Role};
use crate::format::Format;

pub const DEFAULT_TIMEOUT: &str = "30s";

/// Where the input document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
    Url(String),
}

impl Source {
    /// Classifies a raw `-i` value. Empty means standard input.
    pub fn from_locator(locator: &str) -> Source {
        if locator.is_empty() {
            Source::Stdin
        } else if locator.starts_with("http://") || locator.starts_with("https://") {
            Source::Url(locator.to_owned())
        } else {
            Source::File(PathBuf::from(locator))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("standard input"),
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

/// Raw option values as they come off the command line.
#[derive(Debug, Clone)]
pub struct Options {
    pub input: String,
    /// An empty string is treated the same as `None`.
    pub from: Option<String>,
    pub to: String,
    pub timeout: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            input: String::new(),
            from: None,
            to: String::new(),
            timeout: DEFAULT_TIMEOUT.to_owned(),
        }
    }
}

/// Validated, immutable settings for a single conversion.
#[derive(Debug, Clone)]
pub struct Config {
    source: Source,
    from: Format,
    to: Format,
    timeout: String,
}

impl Config {
    /// Validates the target format, resolves the source format (explicit
    /// flag first, then the input's extension) and rejects identical pairs.
    pub fn resolve(options: Options) -> Result<Config, Error> {
        let to = Format::from_name(&options.to).ok_or_else(|| Error::UnsupportedFormat {
            role: Role::Target,
            name: options.to.clone(),
        })?;
        let from = resolve_source_format(options.from.as_deref(), &options.input)?;
        if from == to {
            return Err(Error::IdenticalFormats { format: to });
        }

        let source = Source::from_locator(&options.input);
        debug!(%source, %from, %to, "resolved conversion");
        Ok(Config {
            source,
            from,
            to,
            timeout: options.timeout,
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn from(&self) -> Format {
        self.from
    }

    pub fn to(&self) -> Format {
        self.to
    }

    /// Parses the timeout for HTTP fetches. Zero means no timeout.
    pub fn http_timeout(&self) -> Result<Option<Duration>, Error> {
        let timeout = duration::parse(&self.timeout).map_err(|source| Error::InvalidTimeout {
            value: self.timeout.clone(),
            source,
        })?;
        Ok((!timeout.is_zero()).then_some(timeout))
    }
}

fn resolve_source_format(explicit: Option<&str>, input: &str) -> Result<Format, Error> {
    if let Some(name) = explicit.filter(|name| !name.is_empty()) {
        return Format::from_name(name).ok_or_else(|| Error::UnsupportedFormat {
            role: Role::Source,
            name: name.to_owned(),
        });
    }
    match Format::from_extension(input) {
        Some(format) => {
            debug!(input, %format, "inferred source format from extension");
            Ok(format)
        }
        None => Err(Error::MissingSourceFormat {
            input: input.to_owned(),
        }),
    }
}
