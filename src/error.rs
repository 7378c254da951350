//! Error type shared by the codec, the group tree and the registry.
//!
//! Each layer returns errors of its own kind unchanged and only wraps foreign
//! failures (UTF-8, filesystem) with the context of the operation that hit them.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid data: {message}")]
    Decode { message: String },

    #[error("cannot encode registry: {message}")]
    Encode { message: String },

    #[error("no such {kind}: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn alias_not_found(name: &str) -> Self {
        Error::NotFound {
            kind: "alias",
            name: name.to_string(),
        }
    }

    pub fn group_not_found(name: &str) -> Self {
        Error::NotFound {
            kind: "group",
            name: name.to_string(),
        }
    }

    /// Wrap an I/O failure with a description of what was being attempted.
    pub fn io(context: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let context = context.into();
        move |source| Error::Io { context, source }
    }
}
