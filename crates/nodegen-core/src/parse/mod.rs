pub mod components;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod request_body;
pub mod security;
pub mod server;
pub mod spec;

use std::path::Path;

use serde_json::Value;

use crate::error::ParseError;
use ref_resolve::RefResolver;
use spec::OpenApiSpec;

/// Serialization format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Guess the format from a file extension; anything but `.json` is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => SpecFormat::Json,
            _ => SpecFormat::Yaml,
        }
    }
}

/// Parse an OpenAPI spec from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    from_value(dereference(load_value(input, SpecFormat::Yaml)?)?)
}

/// Parse an OpenAPI spec from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    from_value(dereference(load_value(input, SpecFormat::Json)?)?)
}

/// Read a document into an untyped tree, `$ref` nodes untouched.
pub fn load_value(input: &str, format: SpecFormat) -> Result<Value, ParseError> {
    let value = match format {
        SpecFormat::Json => serde_json::from_str(input)?,
        SpecFormat::Yaml => serde_yaml_ng::from_str(input)?,
    };
    Ok(value)
}

/// Inline every local `$ref` of the document.
pub fn dereference(document: Value) -> Result<Value, ParseError> {
    let mut resolver = RefResolver::new(&document);
    Ok(resolver.resolve(&document)?)
}

/// Deserialize an already dereferenced document.
pub fn from_value(document: Value) -> Result<OpenApiSpec, ParseError> {
    if document.get("paths").is_none() {
        return Err(ParseError::MissingField("paths".to_string()));
    }
    let spec: OpenApiSpec = serde_json::from_value(document)?;
    validate_version(&spec)?;
    Ok(spec)
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(SpecFormat::from_path(Path::new("api.json")), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path(Path::new("api.yaml")), SpecFormat::Yaml);
        assert_eq!(SpecFormat::from_path(Path::new("api")), SpecFormat::Yaml);
    }

    #[test]
    fn test_missing_paths() {
        let json = r#"{"openapi": "3.0.0", "info": {"title": "T", "version": "1"}}"#;
        let err = from_json(json).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(ref f) if f == "paths"));
    }

    #[test]
    fn test_refs_resolved_before_typing() {
        let yaml = r##"
openapi: 3.0.3
info: { title: T, version: "1" }
paths:
  /widgets:
    get:
      parameters:
        - $ref: "#/components/parameters/Limit"
components:
  parameters:
    Limit:
      name: limit
      in: query
      schema: { type: integer }
"##;
        let spec = from_yaml(yaml).unwrap();
        let get = spec.paths["/widgets"].get.as_ref().unwrap();
        assert_eq!(get.parameters[0].name, "limit");
    }
}
