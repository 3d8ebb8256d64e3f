pub mod compiler;
pub mod pdf;

pub use compiler::{compile_report, CompiledReport};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("no technical records collected yet")]
    NoData,

    #[error("report generation failed: {0}")]
    GenerationFailed(String),
}
