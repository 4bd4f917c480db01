//! Track storage, junction discovery and navigation.
//!
//! A track is a `CurveList` addressed by a stable `TrackId`. The
//! `TrackManager` owns all tracks plus the junctions derived from their
//! endpoints, and answers the per-tick questions an agent riding the network
//! asks: where am I after moving, which track do I continue on, which way
//! does the next junction lead, and which track is near me.

mod arena;
mod cart_chain;
mod curve_list;
mod debug_draw;
mod junction;
mod manager;
mod navigation;
mod params;
mod preview;
mod range;
mod rider;

#[cfg(test)]
mod test_support;

pub use arena::{TrackArena, TrackId};
pub use cart_chain::{CartChainId, CartChains, CartId};
pub use curve_list::CurveList;
pub use debug_draw::{track_colour, Colour, DebugDrawOptions, DebugDrawSink};
pub use junction::{find_junctions, Junction, JunctionLink, JunctionOverflow, JunctionScan};
pub use manager::TrackManager;
pub use navigation::{LookDirection, NavigationQuery, NavigationResult, TrackState};
pub use params::NavParams;
pub use preview::{JunctionPreview, PreviewQuery};
pub use range::{ControlPointRef, TrackProximity};
pub use rider::{RiderInput, RiderStep, TrackAttachment, TrackRider};
