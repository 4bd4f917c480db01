use arrayvec::ArrayVec;
use serde::Serialize;

use super::{CurveList, TrackId};
use crate::geom::{Float3, MAX_JUNCTION_TRACKS};

/// One track's connection to a junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JunctionLink {
    pub track: TrackId,
    /// Junction boundary on that track: `i` is the start of curve `i`,
    /// `curve_count` is the end of the last curve.
    pub curve_index: usize,
}

impl JunctionLink {
    pub const fn new(track: TrackId, curve_index: usize) -> Self {
        Self { track, curve_index }
    }
}

/// A point where two or more tracks meet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Junction {
    pub pos: Float3,
    links: ArrayVec<JunctionLink, MAX_JUNCTION_TRACKS>,
}

impl Junction {
    pub fn new(pos: Float3, a: JunctionLink, b: JunctionLink) -> Self {
        let mut links = ArrayVec::new();
        links.push(a);
        links.push(b);
        Self { pos, links }
    }

    #[inline]
    pub fn links(&self) -> &[JunctionLink] {
        &self.links
    }

    #[inline]
    pub fn track_count(&self) -> usize {
        self.links.len()
    }

    /// Slot of `track` in `links()`.
    pub fn slot_of(&self, track: TrackId) -> Option<usize> {
        self.links.iter().position(|link| link.track == track)
    }

    pub fn contains_track(&self, track: TrackId) -> bool {
        self.slot_of(track).is_some()
    }

    /// Adds a connection unless the junction is full. Returns the rejected link.
    pub fn try_add(&mut self, link: JunctionLink) -> Result<(), JunctionLink> {
        self.links.try_push(link).map_err(|err| err.element())
    }
}

/// A connection refused because its junction already held the maximum tracks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JunctionOverflow {
    pub pos: Float3,
    pub link: JunctionLink,
}

/// Result of a junction scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JunctionScan {
    pub junctions: Vec<Junction>,
    pub overflows: Vec<JunctionOverflow>,
}

/// Builds junctions wherever curve endpoints of distinct tracks coincide.
///
/// Compares the `start`/`end` (never the handles) of every curve of every
/// track pair. Tracks are visited in the given order, so for a fixed order the
/// output is deterministic; the set of junctions and their members does not
/// depend on which of two tracks comes first.
pub fn find_junctions(tracks: &[(TrackId, &CurveList)], threshold: f32) -> JunctionScan {
    let mut scan = JunctionScan::default();

    for (i, &(id_a, track_a)) in tracks.iter().enumerate() {
        for &(id_b, track_b) in &tracks[i + 1..] {
            for (k, curve_a) in track_a.curves().iter().enumerate() {
                for (m, curve_b) in track_b.curves().iter().enumerate() {
                    for (point_a, end_a) in [(curve_a.start(), false), (curve_a.end(), true)] {
                        for (point_b, end_b) in [(curve_b.start(), false), (curve_b.end(), true)] {
                            if !point_a.nearly_equals(point_b, threshold) {
                                continue;
                            }

                            let link_a = JunctionLink::new(id_a, if end_a { k + 1 } else { k });
                            let link_b = JunctionLink::new(id_b, if end_b { m + 1 } else { m });
                            register(&mut scan, point_a, link_a, link_b, threshold);
                        }
                    }
                }
            }
        }
    }

    scan
}

fn register(
    scan: &mut JunctionScan,
    pos: Float3,
    link_a: JunctionLink,
    link_b: JunctionLink,
    threshold: f32,
) {
    let Some(junction) = scan
        .junctions
        .iter_mut()
        .find(|junction| junction.pos.nearly_equals(pos, threshold))
    else {
        scan.junctions.push(Junction::new(pos, link_a, link_b));
        return;
    };

    for link in [link_a, link_b] {
        if junction.contains_track(link.track) {
            continue;
        }
        if let Err(link) = junction.try_add(link) {
            if !scan.overflows.iter().any(|o| o.link == link) {
                log::warn!(
                    "Too many tracks meet at ({:.3}, {:.3}, {:.3}); ignoring track {}",
                    junction.pos.x,
                    junction.pos.y,
                    junction.pos.z,
                    link.track
                );
                scan.overflows.push(JunctionOverflow {
                    pos: junction.pos,
                    link,
                });
            }
        }
    }
}
