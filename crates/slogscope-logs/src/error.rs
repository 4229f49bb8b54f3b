//! Error types for slogscope-logs.
//!
//! Ingestion never fails; these cover the file-backed edges of the crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse group file: {0}")]
    GroupFileDecode(#[from] toml::de::Error),

    #[error("failed to write group file: {0}")]
    GroupFileEncode(#[from] toml::ser::Error),

    #[error("group name is empty")]
    EmptyGroupName,

    #[error(transparent)]
    InvalidColor(#[from] slogscope_types::InvalidColor),

    #[error("group '{0}' not found")]
    UnknownGroup(String),

    #[error("group '{0}' is built in and cannot be removed")]
    ProtectedGroup(String),

    #[error("group '{0}' is still used by logged entries; clear the console first")]
    GroupInUse(String),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ConsoleError::EmptyGroupName.to_string(), "group name is empty");
        assert_eq!(
            ConsoleError::UnknownGroup("Net".into()).to_string(),
            "group 'Net' not found"
        );
        assert_eq!(
            ConsoleError::ProtectedGroup("All".into()).to_string(),
            "group 'All' is built in and cannot be removed"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConsoleError>();
    }
}
