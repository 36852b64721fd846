use std::path::PathBuf;

/// Errors raised while generating bridge code.
///
/// Unsupported field types and struct names missing from the catalog are
/// not errors; they are dropped from the output.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The API description is not valid JSON.
    #[error("{0}")]
    Description(String),

    /// The generator configuration cannot be read, parsed or used.
    #[error("{0}")]
    Config(String),

    /// A backend failed to produce its output.
    #[error("{0}")]
    Render(String),

    /// Repeated struct name with `strict_duplicates` set.
    #[error("Duplicate callback struct '{0}' in API description")]
    DuplicateStruct(String),

    /// Reading or writing a file failed.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// File that could not be accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
