//! Core types for `fconv`.
//!
//! This crate owns everything that does not touch the network or the
//! filesystem:
//!
//! - the format registry (`Format`), which decodes and encodes each
//!   supported serialization format
//! - the format-agnostic document tree (`Value`) that sits between a decoder
//!   and an encoder
//! - option resolution (`Options` → `Config`), including source format
//!   inference from the input's extension
//! - Go-style duration parsing for the HTTP timeout
//! - the `convert` step and the shared `Error` type
//!
//! Fetching input bytes lives in `fconv_fetch_http` and `fconv_fetch_local`.

pub mod config;
pub mod convert;
pub mod duration;
pub mod error;
pub mod format;
pub mod value;

pub use config::{Config, DEFAULT_TIMEOUT, Options, Source};
pub use convert::convert;
pub use duration::DurationError;
pub use error::{BoxError, Error, Role};
pub use format::Format;
pub use value::{Map, Value};
