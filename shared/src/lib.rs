use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MAP_WIDTH: f32 = 800.0;
pub const MAP_HEIGHT: f32 = 600.0;
pub const FIXED_TIMESTEP_MS: f64 = 1000.0 / 60.0;
pub const VELOCITY: f32 = 2.0;
pub const MAX_TAIL_SIZE: u32 = 500;
pub const INITIAL_TAIL_SIZE: u32 = 20;
pub const SEGMENT_SPACING: f32 = 2.0;
pub const SPAWN_MARGIN: f32 = 20.0;
pub const FOOD_CAPACITY: usize = 5;
pub const FOOD_SPAWN_INTERVAL_MS: f64 = 3000.0;
pub const FOOD_VALUE_MIN: u32 = 5;
pub const FOOD_VALUE_MAX: u32 = 10;
pub const REMAINS_FOOD_VALUE: u32 = 1;
pub const EAT_TOLERANCE: f32 = 40.0;
pub const HEAD_KILL_TOLERANCE: f32 = 32.0;
pub const BODY_KILL_TOLERANCE: f32 = 20.0;
pub const DEFAULT_MAX_CLIENTS: usize = 10;
pub const PROTOCOL_VERSION: u32 = 1;

pub type SessionId = u32;
pub type FoodId = u32;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    Connect {
        client_version: u32,
        name: Option<String>,
    },
    Input {
        left: bool,
        right: bool,
        up: bool,
        down: bool,
        eat_request: Option<FoodId>,
        kill_request: Option<SessionId>,
        tick: u32,
    },
    Disconnect,

    Connected {
        session_id: SessionId,
        map_width: f32,
        map_height: f32,
    },
    GameState {
        map_width: f32,
        map_height: f32,
        players: HashMap<SessionId, Player>,
        food_items: HashMap<FoodId, Food>,
    },
    Disconnected {
        reason: String,
    },
}

/// One coordinate of a body chain.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x: f32,
    pub y: f32,
}

/// Movement intent, one axis at a time. Claims arrive with all four flags;
/// the first set flag in this declaration order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
    Up,
    Down,
}

impl Heading {
    pub fn from_flags(left: bool, right: bool, up: bool, down: bool) -> Option<Self> {
        if left {
            Some(Heading::Left)
        } else if right {
            Some(Heading::Right)
        } else if up {
            Some(Heading::Up)
        } else if down {
            Some(Heading::Down)
        } else {
            None
        }
    }

    /// Per-axis offsets in {-1, 0, 1}; exactly one axis is non-zero.
    pub fn offsets(self) -> (i8, i8) {
        match self {
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    Random,
    PlayerRemains,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Food {
    pub x: f32,
    pub y: f32,
    pub value: u32,
    pub kind: FoodKind,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Player {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub x_request: i8,
    pub y_request: i8,
    pub tail_size: u32,
    pub kills: u32,
    /// Client sequence marker of the last processed input.
    pub tick: u32,
    pub alive: bool,
    /// Debug mirror of the body chain, replicated only when the room runs
    /// with debug circles enabled.
    pub circles: Vec<Segment>,
    /// Authoritative body chain. Server-only; never replicated.
    #[serde(skip)]
    pub segments: Vec<Segment>,
}

impl Player {
    pub fn new(name: String, x: f32, y: f32) -> Self {
        Self {
            name,
            x,
            y,
            x_request: -1,
            y_request: 0,
            tail_size: INITIAL_TAIL_SIZE,
            kills: 0,
            tick: 0,
            alive: true,
            circles: Vec::new(),
            segments: Vec::new(),
        }
    }

    pub fn apply_heading(&mut self, heading: Heading) {
        let (dx, dy) = heading.offsets();
        self.x_request = dx;
        self.y_request = dy;
    }

    pub fn sync_circles(&mut self) {
        self.circles.clear();
        self.circles.extend_from_slice(&self.segments);
    }
}

/// Axis-aligned box test. Deliberately not a circular distance test: both
/// distances must be strictly inside their tolerance.
pub fn overlaps(x1: f32, y1: f32, x2: f32, y2: f32, x_tolerance: f32, y_tolerance: f32) -> bool {
    let x_distance = (x2 - x1).abs();
    let y_distance = (y2 - y1).abs();
    x_distance < x_tolerance && y_distance < y_tolerance
}

/// Toroidal coordinate wrap: past the maximum snaps to 0, below 0 snaps to
/// the maximum.
pub fn wrap(value: f32, max: f32) -> f32 {
    if value > max {
        0.0
    } else if value < 0.0 {
        max
    } else {
        value
    }
}

/// Inbound intent record, one per client submission.
#[derive(Debug, Clone)]
pub struct InputData {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub eat_request: Option<FoodId>,
    pub kill_request: Option<SessionId>,
    pub tick: u32,
}

impl InputData {
    pub fn direction(left: bool, right: bool, up: bool, down: bool) -> Self {
        Self {
            left,
            right,
            up,
            down,
            eat_request: None,
            kill_request: None,
            tick: 0,
        }
    }
}
