use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot prepare {path:?} - {source}")]
    Filesystem { path: PathBuf, source: io::Error },
    #[error("source file {0:?} does not exist")]
    MissingSource(PathBuf),
    #[error("bad source pattern - {0}")]
    Pattern(String),
    #[error("bad configuration - {0}")]
    Config(String),
    #[error("failed to start {program} - {source}")]
    Spawn { program: String, source: io::Error },
}

impl Error {
    /// Missing sources and blocked directories both come from the filesystem.
    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::Filesystem { .. } | Self::MissingSource(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
