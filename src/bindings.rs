//! Python bindings
//!
//! Configurations and snapshots cross the boundary as JSON strings, the same
//! documents [`RawConfig`] and [`MatchSnapshot`] read and write.

use crate::catalog::Catalog;
use crate::config::RawConfig;
use crate::forge::{decode_config, encode_config, CivForge, MatchSnapshot, RerollOutcome};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::prelude::*;
use std::sync::Arc;

// ============================================================================
// Cached Catalog
// ============================================================================

/// Global cached forge engine
static CACHED_FORGE: OnceCell<Arc<RwLock<CivForge>>> = OnceCell::new();

fn cached_forge() -> PyResult<Arc<RwLock<CivForge>>> {
    Ok(CACHED_FORGE
        .get()
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(
                "Catalog not initialized. Call init_catalog() first.",
            )
        })?
        .clone())
}

fn forge_json(forge: &CivForge, config_json: &str) -> PyResult<String> {
    let raw: RawConfig = serde_json::from_str(config_json).map_err(crate::ForgeError::from)?;
    let forged = forge.forge(&raw)?;
    Ok(MatchSnapshot::from(forged).to_json()?)
}

// ============================================================================
// Python Functions
// ============================================================================

/// Initialize the catalog (call once at startup)
///
/// # Arguments
/// * `catalog_json` - Optional catalog document; the embedded catalog is used when omitted
#[pyfunction]
#[pyo3(signature = (catalog_json=None))]
fn init_catalog(catalog_json: Option<&str>) -> PyResult<()> {
    let forge = match catalog_json {
        Some(json) => CivForge::new(Catalog::from_json(json)?),
        None => CivForge::builtin(),
    };

    // If already initialized, swap the engine
    if let Some(existing) = CACHED_FORGE.get() {
        *existing.write() = forge;
    } else {
        let _ = CACHED_FORGE.set(Arc::new(RwLock::new(forge)));
    }
    Ok(())
}

/// Check if the catalog is initialized
#[pyfunction]
fn is_catalog_initialized() -> bool {
    CACHED_FORGE.get().is_some()
}

/// Forge a match from a raw configuration JSON document
///
/// # Returns
/// The match snapshot as JSON
///
/// # Raises
/// RuntimeError if `init_catalog` was not called first, ValueError on a bad configuration
#[pyfunction]
fn forge_match(config_json: &str) -> PyResult<String> {
    let forge = cached_forge()?;
    let guard = forge.read();
    forge_json(&guard, config_json)
}

/// Reroll one player of a snapshot
///
/// # Returns
/// A tuple of the outcome ("rerolled", "already_used" or "locked") and the updated snapshot JSON
#[pyfunction]
fn reroll_player(snapshot_json: &str, index: usize) -> PyResult<(String, String)> {
    let forge = cached_forge()?;
    let guard = forge.read();
    let mut forged = MatchSnapshot::from_json(snapshot_json)?.into_match();
    let outcome = match guard.reroll(&mut forged, index)? {
        RerollOutcome::Rerolled => "rerolled",
        RerollOutcome::AlreadyUsed => "already_used",
        RerollOutcome::Locked => "locked",
    };
    Ok((outcome.to_string(), MatchSnapshot::from(forged).to_json()?))
}

/// Encode a raw configuration JSON document as a share token
#[pyfunction]
fn share_token(config_json: &str) -> PyResult<String> {
    let raw: RawConfig = serde_json::from_str(config_json).map_err(crate::ForgeError::from)?;
    Ok(encode_config(&raw)?)
}

/// Decode a share token back to configuration JSON, or None if malformed
#[pyfunction]
fn decode_share_token(token: &str) -> PyResult<Option<String>> {
    match decode_config(token) {
        Some(raw) => Ok(Some(
            serde_json::to_string(&raw).map_err(crate::ForgeError::from)?,
        )),
        None => Ok(None),
    }
}

/// Forge a match asynchronously
///
/// Generation runs on Tokio's blocking pool so the asyncio event loop stays
/// responsive.
///
/// # Example (Python)
/// ```python
/// snapshot = json.loads(await forge_match_async(config_json))
/// ```
#[pyfunction]
fn forge_match_async<'py>(py: Python<'py>, config_json: String) -> PyResult<Bound<'py, PyAny>> {
    let forge = cached_forge()?;

    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let snapshot = tokio::task::spawn_blocking(move || {
            let guard = forge.read();
            forge_json(&guard, &config_json)
        })
        .await
        .map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                "Forge task panicked: {}",
                e
            ))
        })??;

        Ok(snapshot)
    })
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn civ_forge(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_catalog, m)?)?;
    m.add_function(wrap_pyfunction!(is_catalog_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(forge_match, m)?)?;
    m.add_function(wrap_pyfunction!(reroll_player, m)?)?;
    m.add_function(wrap_pyfunction!(share_token, m)?)?;
    m.add_function(wrap_pyfunction!(decode_share_token, m)?)?;
    m.add_function(wrap_pyfunction!(forge_match_async, m)?)?;
    Ok(())
}
