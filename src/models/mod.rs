pub mod enums;
pub mod message;
pub mod record;

pub use enums::{Role, Severity};
pub use message::VisibleMessage;
pub use record::TechnicalRecord;

use thiserror::Error;

/// Validation errors raised when wire values do not match the data model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid {field}: '{value}'")]
    InvalidEnum { field: String, value: String },
}
