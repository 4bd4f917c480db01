//! railnav - Bezier track networks with junction discovery and on-track navigation.
//!
//! # Architecture
//!
//! Layered modules with strict inward-only dependencies:
//!
//! - **geom**: Vector math and cubic Bezier curves
//! - **track**: Track storage, junctions, navigation, preview and range queries
//! - **persistence**: JSON track documents
//! - **error**: Library error types
//! - **ffi**: C FFI bindings (feature `ffi`)
//!
//! # Usage
//!
//! ```ignore
//! use railnav::{CurveList, Float3, NavigationQuery, TrackManager};
//!
//! let mut manager = TrackManager::new();
//! let a = manager.add_track(CurveList::polyline(&[Float3::ZERO, Float3::new(10.0, 0.0, 0.0)]))?;
//! manager.find_junctions();
//! let step = manager.get_point_on_track(NavigationQuery::new(a, 0.5, 0.4))?;
//! ```
//!
//! For C/C++ engines, link the cdylib and use the `rn_*` FFI functions.

pub mod error;
pub mod geom;
pub mod persistence;
pub mod track;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types at crate root
pub use error::TrackError;
pub use geom::{BezierCurve, Float3};
pub use persistence::PersistenceError;
pub use track::{
    CurveList, Junction, LookDirection, NavParams, NavigationQuery, NavigationResult, TrackId,
    TrackManager, TrackRider, TrackState,
};
