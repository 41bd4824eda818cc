//! Error taxonomy shared by every pipeline stage.
//!
//! Stages never retry; the first error aborts the run and is surfaced once by
//! the caller.

use std::path::PathBuf;

/// Coarse classification of a [`CollageError`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RemoteApi,
    Archive,
    EmptyInput,
    InvalidConfig,
    Io,
    Decode,
}

#[derive(Debug, thiserror::Error)]
pub enum CollageError {
    /// Network failure, non-2xx status, or a response body without the expected fields.
    #[error("remote API: {0}")]
    RemoteApi(String),

    /// Downloaded content is not a readable zip archive, or extraction failed.
    #[error("archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("no images found")]
    EmptyInput,

    /// Bad layout parameters or missing/invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An extracted file has an image extension but cannot be decoded.
    #[error("decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl CollageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CollageError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CollageError::RemoteApi(_) => ErrorKind::RemoteApi,
            CollageError::Archive(_) => ErrorKind::Archive,
            CollageError::EmptyInput => ErrorKind::EmptyInput,
            CollageError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            // Encoding is the last step of writing the output file.
            CollageError::Io { .. } | CollageError::Encode { .. } => ErrorKind::Io,
            CollageError::Decode { .. } => ErrorKind::Decode,
        }
    }
}

pub type Result<T, E = CollageError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_covers_taxonomy() {
        assert_eq!(CollageError::EmptyInput.kind(), ErrorKind::EmptyInput);
        assert_eq!(
            CollageError::InvalidConfig("columns".into()).kind(),
            ErrorKind::InvalidConfig
        );
        assert_eq!(
            CollageError::RemoteApi("HTTP 404".into()).kind(),
            ErrorKind::RemoteApi
        );
        assert_eq!(
            CollageError::Archive(zip::result::ZipError::InvalidArchive("bad")).kind(),
            ErrorKind::Archive
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(CollageError::io("/out.jpg", io).kind(), ErrorKind::Io);
    }

    #[test]
    fn io_message_includes_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = CollageError::io("/nope/Result.jpg", io);
        let msg = err.to_string();
        assert!(msg.contains("/nope/Result.jpg"));
        assert!(msg.contains("missing"));
    }
}
