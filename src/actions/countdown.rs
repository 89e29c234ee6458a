//! Bomber fuse, layered on top of whatever the lemming is doing.

use crate::components::{ActionTag, Lemming};

/// Burn one tick of the fuse. Returns `OhNo` when it runs out.
pub fn step_countdown(lem: &mut Lemming) -> Option<ActionTag> {
    if !lem.has_countdown() {
        return None;
    }
    lem.countdown -= 1;
    if lem.countdown <= 0 {
        lem.cancel_countdown();
        Some(ActionTag::OhNo)
    } else {
        None
    }
}
