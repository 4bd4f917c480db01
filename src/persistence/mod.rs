//! JSON persistence for track networks.
//!
//! Only track geometry is stored. Loading always ends with
//! `TrackManager::find_junctions`, so a loaded manager is ready to navigate.

mod curve_string;
mod document;

pub use curve_string::{format_curve, parse_curve};
pub use document::{TrackDocument, TrackEntry};

use crate::error::TrackError;
use crate::track::{NavParams, TrackId, TrackManager};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("malformed track document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Serialize every track to the JSON document format.
pub fn serialize(manager: &TrackManager) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(&TrackDocument::from_manager(manager))?)
}

/// Build a manager with default parameters from a JSON document.
pub fn deserialize(json: &str) -> Result<TrackManager, PersistenceError> {
    deserialize_with_params(json, NavParams::default())
}

pub fn deserialize_with_params(json: &str, params: NavParams) -> Result<TrackManager, PersistenceError> {
    let mut manager = TrackManager::with_params(params);
    load_into(&mut manager, json)?;
    Ok(manager)
}

/// Replace the manager's tracks with those in `json` and rebuild junctions.
///
/// Track handles are assigned in document order. Tracks without curves are
/// skipped with a warning. On a malformed document the manager is left
/// untouched.
pub fn load_into(manager: &mut TrackManager, json: &str) -> Result<Vec<TrackId>, PersistenceError> {
    let document: TrackDocument = serde_json::from_str(json)?;
    manager.clear();

    let mut ids = Vec::with_capacity(document.tracks.len());
    for (i, entry) in document.tracks.iter().enumerate() {
        let track = entry.to_track();
        if track.is_empty() {
            log::warn!("Skipping track {i} with no curves");
            continue;
        }
        ids.push(manager.add_track(track)?);
    }

    let refused = manager.find_junctions();
    log::debug!(
        "Loaded {} tracks, {} junctions ({refused} refused connections)",
        ids.len(),
        manager.junctions().len()
    );
    Ok(ids)
}
