use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse preferences: {0}")]
    PrefsDecode(#[from] toml::de::Error),

    #[error("failed to write preferences: {0}")]
    PrefsEncode(#[from] toml::ser::Error),

    #[error("invalid editor command '{0}'")]
    EditorTemplate(String),

    #[error("failed to launch '{program}': {source}")]
    EditorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TuiError>;
