//! C ABI over `TrackManager` for engine embedding.
//!
//! Functions:
//! - `rn_manager_new` / `rn_manager_free` - own a manager behind an opaque handle
//! - `rn_load` / `rn_save` / `rn_save_size` - JSON track documents
//! - `rn_add_track` - add a track from a flat control-point array
//! - `rn_find_junctions` - rebuild junctions after edits
//! - `rn_advance_t` / `rn_get_point_on_track` - per-tick navigation
//! - `rn_track_in_range` - nearest track lookup
//!
//! # Error Codes
//! - `0`: Success
//! - `-1`: Null pointer
//! - `-2`: Track not found
//! - `-3`: Buffer overflow (resize and retry)
//! - `-5`: Invalid format
//! - `-7`: Junctions out of date (call `rn_find_junctions`)

use crate::error::TrackError;
use crate::geom::{BezierCurve, Float3};
use crate::persistence::{self, PersistenceError};
use crate::track::{CurveList, LookDirection, NavigationQuery, TrackId, TrackManager, TrackState};

pub const RN_OK: i32 = 0;
pub const RN_NULL_POINTER: i32 = -1;
pub const RN_TRACK_NOT_FOUND: i32 = -2;
pub const RN_BUFFER_TOO_SMALL: i32 = -3;
pub const RN_INVALID_FORMAT: i32 = -5;
pub const RN_JUNCTIONS_STALE: i32 = -7;

/// Opaque handle to a `TrackManager`.
pub type RnManagerHandle = *mut std::ffi::c_void;

/// Navigation step input. `desired_dir`: -1 left, 0 center, 1 right.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RnNavQuery {
    pub track: TrackId,
    pub dist_along_track: f32,
    pub prev_dist_along_track: f32,
    pub desired_dir: i32,
    pub reversing: u8,
}

/// Navigation step output. `-1` marks an absent junction index or track
/// state; otherwise `track_state` is 0 facing forward, 1 facing backward.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RnNavResult {
    pub position: Float3,
    pub track: TrackId,
    pub dist_along_track: f32,
    pub junction_index: i32,
    pub curve_index: i32,
    pub track_state: i32,
}

fn status(err: &TrackError) -> i32 {
    match err {
        TrackError::TrackNotFound(_) => RN_TRACK_NOT_FOUND,
        TrackError::JunctionsOutOfDate => RN_JUNCTIONS_STALE,
        _ => RN_INVALID_FORMAT,
    }
}

unsafe fn manager_ref<'a>(handle: RnManagerHandle) -> Option<&'a TrackManager> {
    (handle as *const TrackManager).as_ref()
}

unsafe fn manager_mut<'a>(handle: RnManagerHandle) -> Option<&'a mut TrackManager> {
    (handle as *mut TrackManager).as_mut()
}

/// Create an empty manager with default parameters.
#[no_mangle]
pub extern "C" fn rn_manager_new() -> RnManagerHandle {
    Box::into_raw(Box::new(TrackManager::new())) as RnManagerHandle
}

/// Free a manager handle.
///
/// # Safety
/// - `handle` must be a handle returned by `rn_manager_new`, or null
#[no_mangle]
pub unsafe extern "C" fn rn_manager_free(handle: RnManagerHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle as *mut TrackManager));
    }
}

/// Replace the manager's tracks with a UTF-8 JSON document and rebuild
/// junctions.
///
/// # Safety
/// - `handle` must be a valid manager handle
/// - `data` must point to at least `data_len` readable bytes
#[no_mangle]
pub unsafe extern "C" fn rn_load(handle: RnManagerHandle, data: *const u8, data_len: usize) -> i32 {
    let Some(manager) = manager_mut(handle) else {
        return RN_NULL_POINTER;
    };
    if data.is_null() {
        return RN_NULL_POINTER;
    }

    let bytes = std::slice::from_raw_parts(data, data_len);
    let Ok(json) = std::str::from_utf8(bytes) else {
        return RN_INVALID_FORMAT;
    };
    match persistence::load_into(manager, json) {
        Ok(_) => RN_OK,
        Err(PersistenceError::Track(err)) => status(&err),
        Err(PersistenceError::Json(_)) => RN_INVALID_FORMAT,
    }
}

/// Get the buffer size required by `rn_save`.
///
/// # Safety
/// - `handle` must be a valid manager handle
#[no_mangle]
pub unsafe extern "C" fn rn_save_size(handle: RnManagerHandle) -> i64 {
    let Some(manager) = manager_ref(handle) else {
        return RN_NULL_POINTER as i64;
    };
    match persistence::serialize(manager) {
        Ok(json) => json.len() as i64,
        Err(_) => RN_INVALID_FORMAT as i64,
    }
}

/// Serialize all tracks to a JSON byte buffer (not NUL-terminated).
///
/// # Returns
/// - `0` on success
/// - `-1` on null pointer
/// - `-3` if buffer too small (bytes_written contains required size)
///
/// # Safety
/// - `handle` must be a valid manager handle
/// - `buffer` must point to a valid buffer of at least `buffer_capacity` bytes
/// - `bytes_written` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn rn_save(
    handle: RnManagerHandle,
    buffer: *mut u8,
    buffer_capacity: usize,
    bytes_written: *mut usize,
) -> i32 {
    let Some(manager) = manager_ref(handle) else {
        return RN_NULL_POINTER;
    };
    if buffer.is_null() || bytes_written.is_null() {
        return RN_NULL_POINTER;
    }

    let Ok(json) = persistence::serialize(manager) else {
        return RN_INVALID_FORMAT;
    };

    *bytes_written = json.len();
    if json.len() > buffer_capacity {
        return RN_BUFFER_TOO_SMALL;
    }
    std::ptr::copy_nonoverlapping(json.as_ptr(), buffer, json.len());
    RN_OK
}

/// Add a track from `point_count` control points, four per curve.
/// Junctions become stale until `rn_find_junctions` runs.
///
/// # Safety
/// - `handle` must be a valid manager handle
/// - `points` must point to at least `point_count` `Float3` values
/// - `out_id` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn rn_add_track(
    handle: RnManagerHandle,
    points: *const Float3,
    point_count: usize,
    out_id: *mut TrackId,
) -> i32 {
    let Some(manager) = manager_mut(handle) else {
        return RN_NULL_POINTER;
    };
    if points.is_null() || out_id.is_null() {
        return RN_NULL_POINTER;
    }
    if point_count == 0 || point_count % 4 != 0 {
        return RN_INVALID_FORMAT;
    }

    let points = std::slice::from_raw_parts(points, point_count);
    let curves = points
        .chunks_exact(4)
        .map(|c| BezierCurve::new(c[0], c[1], c[2], c[3]))
        .collect();

    match manager.add_track(CurveList::new(curves)) {
        Ok(id) => {
            *out_id = id;
            RN_OK
        }
        Err(err) => status(&err),
    }
}

/// Rebuild junctions. Returns the number of connections refused for
/// exceeding junction capacity, or `-1` on null handle.
///
/// # Safety
/// - `handle` must be a valid manager handle
#[no_mangle]
pub unsafe extern "C" fn rn_find_junctions(handle: RnManagerHandle) -> i32 {
    match manager_mut(handle) {
        Some(manager) => manager.find_junctions() as i32,
        None => RN_NULL_POINTER,
    }
}

/// Advance global t by a travel amount.
///
/// # Safety
/// - `handle` must be a valid manager handle
/// - `out_t` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn rn_advance_t(
    handle: RnManagerHandle,
    track: TrackId,
    amount: f32,
    t: f32,
    out_t: *mut f32,
) -> i32 {
    let Some(manager) = manager_ref(handle) else {
        return RN_NULL_POINTER;
    };
    if out_t.is_null() {
        return RN_NULL_POINTER;
    }
    match manager.advance_t_along_track(track, amount, t) {
        Ok(new_t) => {
            *out_t = new_t;
            RN_OK
        }
        Err(err) => status(&err),
    }
}

/// Resolve one navigation step, switching tracks at junctions.
///
/// # Safety
/// - `handle` must be a valid manager handle
/// - `query` and `out` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn rn_get_point_on_track(
    handle: RnManagerHandle,
    query: *const RnNavQuery,
    out: *mut RnNavResult,
) -> i32 {
    let Some(manager) = manager_ref(handle) else {
        return RN_NULL_POINTER;
    };
    if query.is_null() || out.is_null() {
        return RN_NULL_POINTER;
    }
    let query = &*query;

    let desired_dir = match query.desired_dir {
        d if d < 0 => LookDirection::Left,
        0 => LookDirection::Center,
        _ => LookDirection::Right,
    };
    let nav = NavigationQuery::new(query.track, query.dist_along_track, query.prev_dist_along_track)
        .with_direction(desired_dir)
        .reversing(query.reversing != 0);

    match manager.get_point_on_track(nav) {
        Ok(result) => {
            *out = RnNavResult {
                position: result.position,
                track: result.track,
                dist_along_track: result.dist_along_track,
                junction_index: result.junction_index.map_or(-1, |i| i as i32),
                curve_index: result.curve_index as i32,
                track_state: match result.track_state {
                    None => -1,
                    Some(TrackState::FacingForward) => 0,
                    Some(TrackState::FacingBackward) => 1,
                },
            };
            RN_OK
        }
        Err(err) => status(&err),
    }
}

/// Find the closest track within `range` of `pos`. When none is in range,
/// `out_track` is set to an invalid id (index and generation `u32::MAX`).
///
/// # Safety
/// - `handle` must be a valid manager handle
/// - `out_track` and `out_dist_along_track` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn rn_track_in_range(
    handle: RnManagerHandle,
    pos: Float3,
    range: f32,
    out_track: *mut TrackId,
    out_dist_along_track: *mut f32,
) -> i32 {
    let Some(manager) = manager_ref(handle) else {
        return RN_NULL_POINTER;
    };
    if out_track.is_null() || out_dist_along_track.is_null() {
        return RN_NULL_POINTER;
    }

    match manager.track_in_range(pos, range) {
        Some((id, proximity)) => {
            *out_track = id;
            *out_dist_along_track = proximity.dist_along_track;
        }
        None => {
            *out_track = TrackId::INVALID;
            *out_dist_along_track = -1.0;
        }
    }
    RN_OK
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(start: Float3, end: Float3) -> [Float3; 4] {
        *BezierCurve::line(start, end).points()
    }

    unsafe fn add(handle: RnManagerHandle, points: &[Float3]) -> TrackId {
        let mut id = TrackId::INVALID;
        assert_eq!(rn_add_track(handle, points.as_ptr(), points.len(), &mut id), RN_OK);
        id
    }

    #[test]
    fn navigate_across_junction() {
        unsafe {
            let handle = rn_manager_new();
            let a = add(handle, &line(Float3::ZERO, Float3::new(10.0, 0.0, 0.0)));
            let b = add(
                handle,
                &line(Float3::new(10.0, 0.0, 0.0), Float3::new(20.0, 0.0, 0.0)),
            );

            let query = RnNavQuery {
                track: a,
                dist_along_track: 1.0,
                prev_dist_along_track: 0.9,
                desired_dir: 0,
                reversing: 0,
            };
            let mut out = std::mem::zeroed::<RnNavResult>();
            assert_eq!(rn_get_point_on_track(handle, &query, &mut out), RN_JUNCTIONS_STALE);

            assert_eq!(rn_find_junctions(handle), 0);
            assert_eq!(rn_get_point_on_track(handle, &query, &mut out), RN_OK);
            assert_eq!(out.track, b);
            assert_eq!(out.junction_index, 0);
            assert_eq!(out.track_state, 0);

            rn_manager_free(handle);
        }
    }

    #[test]
    fn save_reports_required_size() {
        unsafe {
            let handle = rn_manager_new();
            add(handle, &line(Float3::ZERO, Float3::new(3.0, 0.0, 0.0)));

            let size = rn_save_size(handle);
            assert!(size > 0);

            let mut small = [0u8; 4];
            let mut written = 0usize;
            assert_eq!(
                rn_save(handle, small.as_mut_ptr(), small.len(), &mut written),
                RN_BUFFER_TOO_SMALL
            );
            assert_eq!(written as i64, size);

            let mut buffer = vec![0u8; written];
            assert_eq!(rn_save(handle, buffer.as_mut_ptr(), buffer.len(), &mut written), RN_OK);

            let other = rn_manager_new();
            assert_eq!(rn_load(other, buffer.as_ptr(), written), RN_OK);
            let mut track = TrackId::INVALID;
            let mut dist = 0.0f32;
            assert_eq!(
                rn_track_in_range(other, Float3::ZERO, 1.0, &mut track, &mut dist),
                RN_OK
            );
            assert_eq!(track, TrackId::new(0, 0));

            rn_manager_free(other);
            rn_manager_free(handle);
        }
    }

    #[test]
    fn bad_input_is_rejected() {
        unsafe {
            let handle = rn_manager_new();
            let points = [Float3::ZERO; 3];
            let mut id = TrackId::INVALID;
            assert_eq!(rn_add_track(handle, points.as_ptr(), 3, &mut id), RN_INVALID_FORMAT);
            assert_eq!(rn_load(handle, b"nope".as_ptr(), 4), RN_INVALID_FORMAT);
            assert_eq!(rn_find_junctions(std::ptr::null_mut()), RN_NULL_POINTER);

            let mut t = 0.0f32;
            assert_eq!(
                rn_advance_t(handle, TrackId::new(5, 0), 1.0, 0.5, &mut t),
                RN_TRACK_NOT_FOUND
            );
            rn_manager_free(handle);
        }
    }
}
