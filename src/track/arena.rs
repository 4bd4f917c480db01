use serde::Serialize;
use std::fmt;

use super::CurveList;

/// Stable handle to a track.
///
/// The generation changes whenever a slot is freed, so a handle held across a
/// removal resolves to nothing instead of to whichever track reused the slot.
/// C-compatible layout for FFI.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TrackId {
    index: u32,
    generation: u32,
}

impl TrackId {
    pub const INVALID: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };

    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    track: Option<CurveList>,
}

/// Generation-checked slot storage for tracks.
#[derive(Debug, Clone, Default)]
pub struct TrackArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl TrackArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track: CurveList) -> TrackId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.track = Some(track);
            return TrackId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            track: Some(track),
        });
        TrackId::new(index, 0)
    }

    pub fn remove(&mut self, id: TrackId) -> Option<CurveList> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let track = slot.track.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(track)
    }

    pub fn get(&self, id: TrackId) -> Option<&CurveList> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.track.as_ref()
    }

    pub fn get_mut(&mut self, id: TrackId) -> Option<&mut CurveList> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.track.as_mut()
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.get(id).is_some()
    }

    /// Live tracks in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &CurveList)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.track
                .as_ref()
                .map(|track| (TrackId::new(i as u32, slot.generation), track))
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every track. Slots are kept and their generations bumped, so
    /// handles from before the clear stay dead after new inserts.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.track.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.len = 0;
    }
}
