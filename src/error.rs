//! Crate error type.
//!
//! Errors only surface while building things: table construction over a
//! malformed layout, or loading a config file. The per-frame polling path
//! never returns errors — open failures, would-block reads and unknown
//! event codes are absorbed where they happen.

use thiserror::Error;

use crate::layout::LayoutError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid pad layout")]
    Layout(#[from] LayoutError),

    #[error("malformed config")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
