// SPDX-License-Identifier: MPL-2.0
use crate::application::port::{DecodeError, StoreError};
use crate::application::session::SessionError;
use thiserror::Error;

/// Crate-level error.
///
/// Per-slot decode failures and per-bucket commit failures never surface
/// here; they are reported in place (a `Failed` preview slot, an entry in the
/// commit report). This type covers what stops an operation as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// The library refused access; the review cannot start.
    #[error("photo library access denied")]
    AuthorizationDenied,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
