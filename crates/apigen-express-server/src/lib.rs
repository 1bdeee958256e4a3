pub mod emitters;
pub mod generator;
pub mod type_mapper;
pub mod uploads;

use thiserror::Error;

pub use generator::ExpressServerGenerator;
pub use uploads::FileUploadProperty;

/// Errors produced while emitting generated sources.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}
