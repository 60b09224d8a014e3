pub mod config;
pub mod custom;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

pub use error::GeneratorError;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from nodegen params.
pub trait CodeGenerator {
    type Config;
    fn generate(
        &self,
        params: &ir::NodegenParams,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, GeneratorError>;
}
