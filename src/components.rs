//! Actor data for the colony.
//!
//! Lemmings live in a flat slot store (`Colony`) rather than as ECS entities:
//! a lemming's identity is its slot index, slots are never reused, and the
//! per-tick update visits them in slot order.

use serde::{Deserialize, Serialize};

// ============================================================================
// IDENTITY & ORIENTATION
// ============================================================================

/// Slot index of a lemming in the colony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LemmingId(pub u32);

impl LemmingId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Horizontal facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Unit step along x.
    #[inline]
    pub fn dx(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

// ============================================================================
// ACTIONS & SKILLS
// ============================================================================

/// The behavior program currently owning a lemming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTag {
    Walking,
    Falling,
    Jumping,
    Digging,
    Climbing,
    Hoisting,
    Building,
    Blocking,
    Bashing,
    Floating,
    Mining,
    Drowning,
    Exiting,
    Frying,
    OhNo,
    Shrug,
    Splatting,
    Exploding,
    OutOfLevel,
}

impl ActionTag {
    pub const COUNT: usize = 19;

    pub const ALL: [ActionTag; Self::COUNT] = [
        ActionTag::Walking,
        ActionTag::Falling,
        ActionTag::Jumping,
        ActionTag::Digging,
        ActionTag::Climbing,
        ActionTag::Hoisting,
        ActionTag::Building,
        ActionTag::Blocking,
        ActionTag::Bashing,
        ActionTag::Floating,
        ActionTag::Mining,
        ActionTag::Drowning,
        ActionTag::Exiting,
        ActionTag::Frying,
        ActionTag::OhNo,
        ActionTag::Shrug,
        ActionTag::Splatting,
        ActionTag::Exploding,
        ActionTag::OutOfLevel,
    ];

    /// Position in `ALL`; also the numeric id used by the flat display buffer.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionTag::Walking => "walking",
            ActionTag::Falling => "falling",
            ActionTag::Jumping => "jumping",
            ActionTag::Digging => "digging",
            ActionTag::Climbing => "climbing",
            ActionTag::Hoisting => "hoisting",
            ActionTag::Building => "building",
            ActionTag::Blocking => "blocking",
            ActionTag::Bashing => "bashing",
            ActionTag::Floating => "floating",
            ActionTag::Mining => "mining",
            ActionTag::Drowning => "drowning",
            ActionTag::Exiting => "exiting",
            ActionTag::Frying => "frying",
            ActionTag::OhNo => "ohno",
            ActionTag::Shrug => "shrug",
            ActionTag::Splatting => "splatting",
            ActionTag::Exploding => "exploding",
            ActionTag::OutOfLevel => "out_of_level",
        }
    }

    /// Actions that end in death and cancel a pending countdown on entry.
    #[inline]
    pub fn is_lethal(self) -> bool {
        matches!(self, ActionTag::Drowning | ActionTag::Splatting | ActionTag::Frying)
    }

    /// Actions whose lemming no longer reacts to triggers, skills or its fuse.
    #[inline]
    pub fn disables(self) -> bool {
        matches!(
            self,
            ActionTag::Drowning
                | ActionTag::Exiting
                | ActionTag::Frying
                | ActionTag::OhNo
                | ActionTag::Splatting
                | ActionTag::Exploding
                | ActionTag::OutOfLevel
        )
    }
}

/// A skill the player can hand to a lemming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    Climber,
    Floater,
    Bomber,
    Blocker,
    Builder,
    Basher,
    Miner,
    Digger,
}

impl SkillKind {
    pub const ALL: [SkillKind; 8] = [
        SkillKind::Climber,
        SkillKind::Floater,
        SkillKind::Bomber,
        SkillKind::Blocker,
        SkillKind::Builder,
        SkillKind::Basher,
        SkillKind::Miner,
        SkillKind::Digger,
    ];

    /// The primary action this skill switches to, if it switches one at all.
    pub fn action(self) -> Option<ActionTag> {
        match self {
            SkillKind::Climber | SkillKind::Floater | SkillKind::Bomber => None,
            SkillKind::Blocker => Some(ActionTag::Blocking),
            SkillKind::Builder => Some(ActionTag::Building),
            SkillKind::Basher => Some(ActionTag::Bashing),
            SkillKind::Miner => Some(ActionTag::Mining),
            SkillKind::Digger => Some(ActionTag::Digging),
        }
    }

    /// Skills that may be handed to a lemming in mid-air.
    pub fn allowed_while_falling(self) -> bool {
        matches!(
            self,
            SkillKind::Floater | SkillKind::Climber | SkillKind::Bomber | SkillKind::Builder
        )
    }
}

/// Program layered on top of the primary action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecondaryAction {
    /// Bomber fuse; see `Lemming::countdown`.
    Countdown,
}

// ============================================================================
// LEMMING
// ============================================================================

/// Per-lemming state.
///
/// `(x, y)` is the foot pixel: while standing, it is the topmost ground pixel
/// under the lemming. The body spans roughly ten pixels above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lemming {
    pub id: LemmingId,
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
    pub action: ActionTag,
    /// Animation frame, reset on every action change.
    pub frame: i32,
    /// Per-action counter: fall height, builder steps, blocker registration.
    pub state: i32,
    pub can_climb: bool,
    pub has_parachute: bool,
    /// Excluded from triggers, skills and the countdown.
    pub disabled: bool,
    /// Finished simulating; the slot stays.
    pub removed: bool,
    pub has_exploded: bool,
    pub countdown: i32,
    pub secondary: Option<SecondaryAction>,
}

impl Lemming {
    pub fn new(id: LemmingId, x: i32, y: i32, facing: Facing, action: ActionTag) -> Self {
        Self {
            id,
            x,
            y,
            facing,
            action,
            frame: 0,
            state: 0,
            can_climb: false,
            has_parachute: false,
            disabled: false,
            removed: false,
            has_exploded: false,
            countdown: 0,
            secondary: None,
        }
    }

    /// Switch the primary action, restarting its animation and counters.
    pub fn set_action(&mut self, action: ActionTag) {
        self.action = action;
        self.frame = 0;
        self.state = 0;
    }

    #[inline]
    pub fn turn_around(&mut self) {
        self.facing = self.facing.reversed();
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        !self.removed
    }

    /// Whether the bomber fuse is running.
    #[inline]
    pub fn has_countdown(&self) -> bool {
        self.secondary == Some(SecondaryAction::Countdown)
    }

    /// Arm the bomber fuse.
    pub fn arm_countdown(&mut self, ticks: i32) {
        self.countdown = ticks;
        self.secondary = Some(SecondaryAction::Countdown);
    }

    pub fn cancel_countdown(&mut self) {
        self.countdown = 0;
        self.secondary = None;
    }

    /// Digit shown above a counting-down lemming (5..=1), 0 when no fuse is lit.
    pub fn countdown_digit(&self) -> i32 {
        if !self.has_countdown() || self.countdown <= 0 {
            0
        } else {
            (self.countdown + 15) / 16
        }
    }
}
