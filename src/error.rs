//! Error types for the civ forge engine

use thiserror::Error;

/// Main error type for the civ forge engine
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Cannot pick from an empty pool: {0}")]
    EmptyPool(&'static str),

    #[error("Invalid match configuration: {0}")]
    InvalidConfig(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(usize),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot schema version: {0}")]
    UnsupportedSnapshot(u32),
}

#[cfg(feature = "python")]
impl From<ForgeError> for pyo3::PyErr {
    fn from(err: ForgeError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};

        match err {
            ForgeError::EmptyPool(pool) => {
                PyRuntimeError::new_err(format!("Cannot pick from an empty pool: {}", pool))
            }
            ForgeError::InvalidConfig(msg) => {
                PyValueError::new_err(format!("Invalid match configuration: {}", msg))
            }
            ForgeError::PlayerNotFound(index) => {
                PyKeyError::new_err(format!("Player not found: {}", index))
            }
            ForgeError::Catalog(msg) => PyValueError::new_err(format!("Invalid catalog: {}", msg)),
            ForgeError::Json(e) => PyValueError::new_err(format!("JSON error: {}", e)),
            ForgeError::UnsupportedSnapshot(version) => PyValueError::new_err(format!(
                "Unsupported snapshot schema version: {}",
                version
            )),
        }
    }
}

/// Result type alias for the civ forge engine
pub type Result<T> = std::result::Result<T, ForgeError>;
