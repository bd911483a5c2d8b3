//! Error types for textvault-core

use thiserror::Error;

/// Result type alias using textvault-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for textvault
#[derive(Error, Debug)]
pub enum Error {
    /// Encoding detection produced no usable guess
    #[error("Could not detect a usable encoding for {file}")]
    Encoding { file: String },

    /// Bytes cannot be decoded under the detected encoding
    #[error("Failed to decode {file} as {encoding}")]
    Decode { file: String, encoding: String },

    /// Text contains characters the write encoding cannot represent
    #[error("Failed to encode {file} as {encoding}: text is not representable")]
    Encode { file: String, encoding: String },

    /// Manifest could not be read or written
    #[error("Manifest I/O error at {path}: {source}")]
    ManifestIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Manifest exists but is not valid JSON
    #[error("Manifest {path} is not valid JSON: {source}")]
    ManifestFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The schema document itself is invalid
    #[error("Invalid schema {name}: {message}")]
    Schema { name: String, message: String },

    /// Schema not found
    #[error("Schema not found: {name}")]
    SchemaNotFound { name: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A path does not live under the root it was resolved against
    #[error("{path} is not under {root}")]
    OutsideRoot { path: String, root: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an encoding detection error
    pub fn encoding(file: impl Into<String>) -> Self {
        Self::Encoding { file: file.into() }
    }

    /// Create a decode error
    pub fn decode(file: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self::Decode {
            file: file.into(),
            encoding: encoding.into(),
        }
    }

    /// Create an encode error
    pub fn encode(file: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self::Encode {
            file: file.into(),
            encoding: encoding.into(),
        }
    }

    /// Create a manifest I/O error
    pub fn manifest_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ManifestIo {
            path: path.into(),
            source,
        }
    }

    /// Create a manifest format error
    pub fn manifest_format(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::ManifestFormat {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid schema error
    pub fn schema(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a schema not found error
    pub fn schema_not_found(name: impl Into<String>) -> Self {
        Self::SchemaNotFound { name: name.into() }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an outside-root error
    pub fn outside_root(path: impl Into<String>, root: impl Into<String>) -> Self {
        Self::OutsideRoot {
            path: path.into(),
            root: root.into(),
        }
    }
}
