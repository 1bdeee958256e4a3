pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

/// A generated file with a path relative to the output root.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    /// Files marked `false` are scaffolding the user is expected to edit
    /// (implementation stubs); they are never overwritten once present.
    pub overwrite: bool,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
            overwrite: true,
        }
    }

    pub fn keep_existing(path: impl Into<String>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
            overwrite: false,
        }
    }
}

/// Trait for code generators that produce files from an IR spec.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;

    fn generate(
        &self,
        ir: &ir::IrSpec,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
