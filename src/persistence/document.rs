//! Owned JSON document for a track network.

use serde::{Deserialize, Serialize};

use super::curve_string::{format_curve, parse_curve};
use crate::track::{CurveList, TrackManager};

/// Root of a saved network. Junctions are never stored; they are rebuilt
/// from track geometry after loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackDocument {
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,
}

/// One track as its ordered curve strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    #[serde(default)]
    pub curves: Vec<String>,
}

impl TrackDocument {
    /// Snapshot of every live track in storage order.
    pub fn from_manager(manager: &TrackManager) -> Self {
        Self {
            tracks: manager
                .tracks()
                .map(|(_, track)| TrackEntry::from_track(track))
                .collect(),
        }
    }
}

impl TrackEntry {
    pub fn from_track(track: &CurveList) -> Self {
        Self {
            curves: track.curves().iter().map(format_curve).collect(),
        }
    }

    pub fn to_track(&self) -> CurveList {
        CurveList::new(self.curves.iter().map(|s| parse_curve(s)).collect())
    }
}
