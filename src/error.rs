use crate::track::TrackId;

/// Errors raised by track storage and navigation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    #[error("track {0} does not exist")]
    TrackNotFound(TrackId),
    #[error("a track needs at least one curve")]
    EmptyTrack,
    #[error("curve index {curve} out of range for a track of {count} curves")]
    CurveOutOfRange { curve: usize, count: usize },
    #[error("control point index {0} out of range (expected 0..4)")]
    PointOutOfRange(usize),
    #[error("junctions are out of date; run find_junctions after editing tracks")]
    JunctionsOutOfDate,
    #[error("rider is not attached to a track")]
    NotAttached,
}
