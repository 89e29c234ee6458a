//! Display bridge.
//!
//! Renderers receive one `LemmingDraw` per live lemming through the
//! `DisplaySink` trait. `FlatBuffer` is a ready-made sink that packs the
//! draws into a contiguous `Vec<f32>` for FFI or GPU upload.
//!
//! # Buffer Layout
//!
//! ```text
//! [0]                      lemming_count (as f32)
//! for each lemming i, at offset HEADER_SIZE + i * LEMMING_STRIDE:
//!   [+0] slot        - LemmingId (u32 as f32)
//!   [+1] x           - foot x (pixels)
//!   [+2] y           - foot y (pixels)
//!   [+3] action_id   - ActionTag::index()
//!   [+4] facing      - -1.0 left, 1.0 right
//!   [+5] frame       - animation frame
//!   [+6] countdown   - digit 5..=1, 0 when no fuse
//! ```
//!
//! Lemmings are written in slot order, so the same colony always produces
//! the same buffer.

use crate::colony::Colony;
use crate::components::{ActionTag, Facing, Lemming};
use crate::world::Snapshot;

/// Number of f32 values per lemming in the flat buffer.
pub const LEMMING_STRIDE: usize = 7;

/// Number of f32 values in the buffer header. Currently just the count.
pub const HEADER_SIZE: usize = 1;

pub const FIELD_SLOT: usize = 0;
pub const FIELD_X: usize = 1;
pub const FIELD_Y: usize = 2;
pub const FIELD_ACTION: usize = 3;
pub const FIELD_FACING: usize = 4;
pub const FIELD_FRAME: usize = 5;
pub const FIELD_COUNTDOWN: usize = 6;

/// Everything a renderer needs to draw one lemming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LemmingDraw {
    pub slot: u32,
    pub x: i32,
    pub y: i32,
    pub action: ActionTag,
    pub facing: Facing,
    pub frame: i32,
    pub countdown_digit: i32,
}

impl From<&Lemming> for LemmingDraw {
    fn from(lem: &Lemming) -> Self {
        Self {
            slot: lem.id.0,
            x: lem.x,
            y: lem.y,
            action: lem.action,
            facing: lem.facing,
            frame: lem.frame,
            countdown_digit: lem.countdown_digit(),
        }
    }
}

/// Receiver of per-frame lemming draws.
pub trait DisplaySink {
    fn draw_lemming(&mut self, draw: &LemmingDraw);
}

impl<F: FnMut(&LemmingDraw)> DisplaySink for F {
    fn draw_lemming(&mut self, draw: &LemmingDraw) {
        self(draw)
    }
}

/// Send every live lemming to `sink` in slot order. Returns how many were drawn.
pub fn draw_colony(colony: &Colony, sink: &mut dyn DisplaySink) -> usize {
    let mut drawn = 0;
    for lem in colony.iter().filter(|l| l.is_live()) {
        sink.draw_lemming(&LemmingDraw::from(lem));
        drawn += 1;
    }
    drawn
}

#[inline]
pub fn facing_to_id(facing: Facing) -> f32 {
    facing.dx() as f32
}

/// `DisplaySink` that packs draws into the flat layout described above.
#[derive(Debug, Clone)]
pub struct FlatBuffer {
    data: Vec<f32>,
}

impl Default for FlatBuffer {
    fn default() -> Self {
        Self { data: vec![0.0; HEADER_SIZE] }
    }
}

impl FlatBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(lemmings: usize) -> Self {
        let mut data = Vec::with_capacity(calculate_buffer_size(lemmings));
        data.push(0.0);
        Self { data }
    }

    /// Drop all lemmings, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.truncate(HEADER_SIZE);
        self.data[0] = 0.0;
    }

    pub fn lemming_count(&self) -> usize {
        (self.data.len() - HEADER_SIZE) / LEMMING_STRIDE
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl DisplaySink for FlatBuffer {
    fn draw_lemming(&mut self, draw: &LemmingDraw) {
        self.data.extend_from_slice(&[
            draw.slot as f32,
            draw.x as f32,
            draw.y as f32,
            draw.action.index() as f32,
            facing_to_id(draw.facing),
            draw.frame as f32,
            draw.countdown_digit as f32,
        ]);
        self.data[0] = self.lemming_count() as f32;
    }
}

/// Pack a snapshot's lemmings into a flat buffer.
pub fn snapshot_to_flatbuffer(snapshot: &Snapshot) -> Vec<f32> {
    let mut buffer = FlatBuffer::with_capacity(snapshot.lemmings.len());
    for lem in &snapshot.lemmings {
        buffer.draw_lemming(&LemmingDraw {
            slot: lem.id,
            x: lem.x,
            y: lem.y,
            action: lem.action,
            facing: lem.facing,
            frame: lem.frame,
            countdown_digit: lem.countdown,
        });
    }
    debug_assert_eq!(buffer.data.len(), calculate_buffer_size(snapshot.lemmings.len()));
    buffer.into_vec()
}

/// `HEADER_SIZE + lemming_count * LEMMING_STRIDE`
#[inline]
pub fn calculate_buffer_size(lemming_count: usize) -> usize {
    HEADER_SIZE + lemming_count * LEMMING_STRIDE
}

/// Parse the lemming count from a flat buffer. `None` if the buffer is empty.
#[inline]
pub fn parse_lemming_count(buffer: &[f32]) -> Option<usize> {
    buffer.first().map(|&n| n as usize)
}

#[inline]
pub const fn lemming_offset(index: usize) -> usize {
    HEADER_SIZE + index * LEMMING_STRIDE
}
