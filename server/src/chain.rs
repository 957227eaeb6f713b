//! Follow-the-leader body chain math.

use shared::Segment;

/// Which end of the slice is treated as the head when shifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    /// The last index is the head; coordinates cascade toward index 0.
    FromTail,
    /// Index 0 is the head; coordinates cascade toward the last index.
    FromHead,
}

/// Moves a chain behind its head: the head segment takes the new (x, y) and
/// every other segment takes the coordinate its neighbor held before this
/// call. Returns the coordinate displaced off the far end, which callers use
/// as the anchor for growth segments. Count-preserving and O(n).
pub fn shift_position(
    segments: &mut [Segment],
    x: f32,
    y: f32,
    direction: ShiftDirection,
) -> Option<Segment> {
    let len = segments.len();
    if len == 0 {
        return None;
    }

    if len == 1 {
        let displaced = segments[0];
        segments[0] = Segment { x, y };
        return Some(displaced);
    }

    let head = match direction {
        ShiftDirection::FromHead => 0,
        ShiftDirection::FromTail => len - 1,
    };

    let mut carry = segments[head];
    segments[head] = Segment { x, y };

    match direction {
        ShiftDirection::FromHead => {
            for i in 1..len {
                let displaced = segments[i];
                segments[i] = carry;
                carry = displaced;
            }
        }
        ShiftDirection::FromTail => {
            for i in (0..len - 1).rev() {
                let displaced = segments[i];
                segments[i] = carry;
                carry = displaced;
            }
        }
    }

    Some(carry)
}

/// Builds a fresh chain of `count` segments starting at (x, y), advancing x
/// by `spacing` per segment. Growth uses spacing 0 so the new segments stack
/// on the anchor and spread out over subsequent shifts.
pub fn spawn_segments(x: f32, y: f32, spacing: f32, count: u32) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(count as usize);
    let mut sx = x;
    for _ in 0..count {
        segments.push(Segment { x: sx, y });
        sx += spacing;
    }
    segments
}
