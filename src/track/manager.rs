use super::junction::{find_junctions, Junction, JunctionOverflow};
use super::preview::JunctionPreview;
use super::{CurveList, NavParams, TrackArena, TrackId};
use crate::error::TrackError;
use crate::geom::Float3;

/// Owns every track and the junctions derived from them.
///
/// Junctions are a cache over track geometry: any edit marks them stale and
/// navigation refuses to run until `find_junctions` rebuilds them.
#[derive(Debug, Clone, Default)]
pub struct TrackManager {
    pub(super) tracks: TrackArena,
    pub(super) junctions: Vec<Junction>,
    pub(super) overflows: Vec<JunctionOverflow>,
    pub(super) junctions_stale: bool,
    pub(super) preview: JunctionPreview,
    pub(super) params: NavParams,
}

impl TrackManager {
    pub fn new() -> Self {
        Self::with_params(NavParams::default())
    }

    pub fn with_params(params: NavParams) -> Self {
        Self {
            tracks: TrackArena::new(),
            junctions: Vec::new(),
            overflows: Vec::new(),
            junctions_stale: false,
            preview: JunctionPreview::default(),
            params,
        }
    }

    #[inline]
    pub fn params(&self) -> &NavParams {
        &self.params
    }

    /// Adds a track and returns its handle. Junctions become stale.
    pub fn add_track(&mut self, track: CurveList) -> Result<TrackId, TrackError> {
        if track.is_empty() {
            return Err(TrackError::EmptyTrack);
        }
        self.junctions_stale = true;
        Ok(self.tracks.insert(track))
    }

    /// Removes a track. Handles to other tracks stay valid; junctions become stale.
    pub fn remove_track(&mut self, id: TrackId) -> Result<CurveList, TrackError> {
        let track = self.tracks.remove(id).ok_or(TrackError::TrackNotFound(id))?;
        self.junctions_stale = true;
        Ok(track)
    }

    pub fn track(&self, id: TrackId) -> Result<&CurveList, TrackError> {
        self.tracks.get(id).ok_or(TrackError::TrackNotFound(id))
    }

    /// Live tracks in storage order.
    pub fn tracks(&self) -> impl Iterator<Item = (TrackId, &CurveList)> + '_ {
        self.tracks.iter()
    }

    #[inline]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Moves a control point of one track (see `CurveList::set_point`).
    pub fn set_track_point(
        &mut self,
        id: TrackId,
        curve_index: usize,
        point_index: usize,
        position: Float3,
        keep_handles_mirrored: bool,
    ) -> Result<(), TrackError> {
        let track = self
            .tracks
            .get_mut(id)
            .ok_or(TrackError::TrackNotFound(id))?;
        track.set_point(curve_index, point_index, position, keep_handles_mirrored)?;
        self.junctions_stale = true;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.junctions.clear();
        self.overflows.clear();
        self.junctions_stale = false;
        self.preview = JunctionPreview::default();
    }

    #[inline]
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    #[inline]
    pub fn junction(&self, index: usize) -> Option<&Junction> {
        self.junctions.get(index)
    }

    /// Connections refused by the last `find_junctions` because their
    /// junction was already full.
    #[inline]
    pub fn junction_overflows(&self) -> &[JunctionOverflow] {
        &self.overflows
    }

    #[inline]
    pub fn junctions_stale(&self) -> bool {
        self.junctions_stale
    }

    /// Rebuilds all junctions from scratch. Returns how many connections were
    /// refused for exceeding a junction's capacity.
    pub fn find_junctions(&mut self) -> usize {
        let tracks: Vec<(TrackId, &CurveList)> = self.tracks.iter().collect();
        let scan = find_junctions(&tracks, self.params.junction_threshold);

        log::debug!(
            "Found {} junctions across {} tracks",
            scan.junctions.len(),
            tracks.len()
        );

        self.junctions = scan.junctions;
        self.overflows = scan.overflows;
        self.junctions_stale = false;
        self.preview = JunctionPreview::default();
        self.overflows.len()
    }

    pub(super) fn ensure_junctions_current(&self) -> Result<(), TrackError> {
        if self.junctions_stale {
            return Err(TrackError::JunctionsOutOfDate);
        }
        Ok(())
    }
}
