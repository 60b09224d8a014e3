use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("spec has no paths")]
    EmptyPaths,

    #[error("path {0} has no operations")]
    NoOperations(String),

    #[error("validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template error: {0}")]
    Template(String),

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An element the emitter relies on is absent from the params.
    #[error("expected value is missing: {0}")]
    MissingValue(String),

    #[error("generation failed: {0}")]
    Other(String),
}
