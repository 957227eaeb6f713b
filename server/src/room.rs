//! The authoritative room simulation.
//!
//! One `Room` owns one world tree and advances it with fixed-size steps.
//! Clients only ever propose interactions (a movement intent, an eat claim,
//! a kill claim); every claim is re-derived from server-held positions
//! before any state mutation, and claims that fail validation are dropped
//! without a client-visible error.

use crate::chain::{self, ShiftDirection};
use crate::queue::{InputQueue, DEFAULT_QUEUE_CAPACITY};
use crate::spawner::{random_location, FoodSpawner};
use crate::state::WorldState;
use log::{debug, info, warn};
use shared::{
    overlaps, wrap, FoodId, Heading, InputData, Player, SessionId, BODY_KILL_TOLERANCE,
    EAT_TOLERANCE, FIXED_TIMESTEP_MS, HEAD_KILL_TOLERANCE, INITIAL_TAIL_SIZE, MAX_TAIL_SIZE,
    SEGMENT_SPACING, VELOCITY,
};
use std::collections::HashMap;

const DEFAULT_NAMES: [&str; 10] = [
    "Ronald", "Ada", "Grace", "Jess", "Niki", "Jessie", "Teddy", "Noobeo", "Elsana", "Potato",
];
const BOT_NAME: &str = "bot";

#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Mirror each player's full body chain into the replicated `circles`
    /// array for client-side debug display.
    pub debug_circles: bool,
    /// Synthesize a bot player when the room goes from empty to occupied.
    pub spawn_bot: bool,
    /// Per-player input queue bound; overflow drops the oldest intent.
    pub queue_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            debug_circles: true,
            spawn_bot: true,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

pub struct Room {
    config: RoomConfig,
    state: WorldState,
    queues: HashMap<SessionId, InputQueue>,
    spawner: FoodSpawner,
    next_session_id: SessionId,
    name_index: usize,
    accumulator_ms: f64,
}

impl Room {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            state: WorldState::new(),
            queues: HashMap::new(),
            spawner: FoodSpawner::new(),
            next_session_id: 1,
            name_index: 0,
            accumulator_ms: 0.0,
        }
    }

    /// Read access to the replicated tree, e.g. for snapshot broadcasts.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Allocates a player at a random margin-inset location with the default
    /// tail and an initial leftward heading, and gives it an input queue.
    /// Session ids are handed out monotonically, so ascending id order is
    /// join order.
    pub fn join(&mut self, name: Option<String>) -> SessionId {
        let session_id = self.allocate_session_id();
        let player = self.create_player(name);
        info!("Player {} ({}) joined", session_id, player.name);
        self.state.players.insert(session_id, player);
        self.queues
            .insert(session_id, InputQueue::new(self.config.queue_capacity));

        if self.config.spawn_bot && self.state.players.len() == 1 {
            let bot = self.create_player(Some(BOT_NAME.to_string()));
            let bot_id = self.allocate_session_id();
            info!("First occupant, adding bot player {}", bot_id);
            self.state.players.insert(bot_id, bot);
            self.queues
                .insert(bot_id, InputQueue::new(self.config.queue_capacity));
        }

        session_id
    }

    /// Removes the player entry and discards its queue. No further
    /// processing occurs for it, whatever its alive flag was.
    pub fn leave(&mut self, session_id: SessionId) {
        if self.state.players.remove(&session_id).is_some() {
            info!("Player {} left", session_id);
        }
        self.queues.remove(&session_id);
    }

    /// Buffers an intent for the next tick boundary. Never processed
    /// synchronously; intents for unknown players are dropped.
    pub fn enqueue_input(&mut self, session_id: SessionId, input: InputData) {
        match self.queues.get_mut(&session_id) {
            Some(queue) => queue.push(input),
            None => warn!("Dropping input for unknown player {}", session_id),
        }
    }

    /// Advances real elapsed time and consumes as many fixed steps as it
    /// covers, so simulation stepping is independent of the caller cadence.
    pub fn tick(&mut self, delta_ms: f64) {
        self.accumulator_ms += delta_ms;
        while self.accumulator_ms >= FIXED_TIMESTEP_MS {
            self.accumulator_ms -= FIXED_TIMESTEP_MS;
            self.fixed_tick(FIXED_TIMESTEP_MS);
        }
    }

    /// One fixed simulation step. Players are processed sequentially in join
    /// order, so a kill resolved for an earlier player is visible to every
    /// later player within the same step.
    pub fn fixed_tick(&mut self, step_ms: f64) {
        let (map_width, map_height) = (self.state.map_width, self.state.map_height);
        self.spawner
            .advance(step_ms, &mut self.state.food_items, map_width, map_height);

        let mut session_ids: Vec<SessionId> = self.state.players.keys().copied().collect();
        session_ids.sort_unstable();

        for session_id in session_ids {
            let inputs = match self.queues.get_mut(&session_id) {
                Some(queue) => queue.drain(),
                None => Vec::new(),
            };

            for input in inputs {
                // dead players drain their queue without effect
                let alive = self
                    .state
                    .players
                    .get(&session_id)
                    .map_or(false, |p| p.alive);
                if !alive {
                    continue;
                }

                if let Some(heading) =
                    Heading::from_flags(input.left, input.right, input.up, input.down)
                {
                    if let Some(player) = self.state.players.get_mut(&session_id) {
                        player.apply_heading(heading);
                    }
                }
                if let Some(food_id) = input.eat_request {
                    self.process_eat_claim(session_id, food_id);
                }
                if let Some(target_id) = input.kill_request {
                    self.process_kill_claim(session_id, target_id);
                }
                if let Some(player) = self.state.players.get_mut(&session_id) {
                    player.tick = input.tick;
                }
            }

            self.advance_player(session_id);
        }
    }

    /// Validates an eat claim against the player's pre-movement position.
    /// On success the tail grows by the food value, saturating at the tail
    /// cap, and the food entity is removed.
    fn process_eat_claim(&mut self, session_id: SessionId, food_id: FoodId) {
        let (px, py) = match self.state.players.get(&session_id) {
            Some(player) => (player.x, player.y),
            None => return,
        };
        let (fx, fy, value) = match self.state.food_items.get(&food_id) {
            Some(food) => (food.x, food.y, food.value),
            None => {
                warn!("Eat claim for unknown food {}", food_id);
                return;
            }
        };

        if !overlaps(px, py, fx, fy, EAT_TOLERANCE, EAT_TOLERANCE) {
            debug!(
                "Rejected eat claim: player {} not over food {}",
                session_id, food_id
            );
            return;
        }

        let debug_circles = self.config.debug_circles;
        if let Some(player) = self.state.players.get_mut(&session_id) {
            let grown = (player.tail_size + value).min(MAX_TAIL_SIZE);
            let grow_count = grown - player.tail_size;
            player.tail_size = grown;

            // new segments stack on the tail anchor and catch up over the
            // next shifts
            if let Some(anchor) = player.segments.last().copied() {
                player
                    .segments
                    .extend(chain::spawn_segments(anchor.x, anchor.y, 0.0, grow_count));
            }
            if debug_circles {
                player.sync_circles();
            }
        }
        self.state.food_items.remove(&food_id);
        debug!("Player {} ate food {} worth {}", session_id, food_id, value);
    }

    /// Validates a kill claim. Head-to-head overlap kills both players —
    /// the resolution is symmetric for every travel-vector combination.
    /// Otherwise the target dies only if its head overlaps a segment of the
    /// requester's body, which also credits the requester one kill.
    fn process_kill_claim(&mut self, session_id: SessionId, target_id: SessionId) {
        let (px, py) = match self.state.players.get(&session_id) {
            Some(player) => (player.x, player.y),
            None => return,
        };
        let (tx, ty) = match self.state.players.get(&target_id) {
            Some(target) => (target.x, target.y),
            None => {
                warn!("Kill claim for unknown player {}", target_id);
                return;
            }
        };

        if overlaps(px, py, tx, ty, HEAD_KILL_TOLERANCE, HEAD_KILL_TOLERANCE) {
            debug!(
                "Head-on collision between players {} and {}",
                session_id, target_id
            );
            self.kill_player(session_id);
            self.kill_player(target_id);
            return;
        }

        let body_hit = self.state.players.get(&session_id).map_or(false, |player| {
            player.segments.iter().any(|segment| {
                overlaps(
                    segment.x,
                    segment.y,
                    tx,
                    ty,
                    BODY_KILL_TOLERANCE,
                    BODY_KILL_TOLERANCE,
                )
            })
        });

        if body_hit {
            if self.kill_player(target_id) {
                if let Some(player) = self.state.players.get_mut(&session_id) {
                    player.kills += 1;
                }
            }
        } else {
            debug!(
                "Rejected kill claim: player {} does not overlap player {}'s body",
                target_id, session_id
            );
        }
    }

    /// Flags a player dead and converts its body to remains. The alive flag
    /// only ever transitions true to false, and the conversion rides that
    /// transition, so re-observing a death never emits a second batch.
    fn kill_player(&mut self, session_id: SessionId) -> bool {
        let segments = match self.state.players.get_mut(&session_id) {
            Some(player) if player.alive => {
                player.alive = false;
                player.segments.clone()
            }
            _ => return false,
        };
        info!("Player {} died", session_id);
        self.spawner
            .spawn_remains(&segments, &mut self.state.food_items);
        true
    }

    /// Moves a living player one velocity step along its heading, wraps the
    /// coordinates toroidally, and pulls the body chain behind the head.
    fn advance_player(&mut self, session_id: SessionId) {
        let (map_width, map_height) = (self.state.map_width, self.state.map_height);
        let debug_circles = self.config.debug_circles;

        if let Some(player) = self.state.players.get_mut(&session_id) {
            if !player.alive {
                return;
            }
            player.x = wrap(player.x + player.x_request as f32 * VELOCITY, map_width);
            player.y = wrap(player.y + player.y_request as f32 * VELOCITY, map_height);
            let (head_x, head_y) = (player.x, player.y);
            chain::shift_position(&mut player.segments, head_x, head_y, ShiftDirection::FromHead);
            if debug_circles {
                player.sync_circles();
            }
        }
    }

    fn create_player(&mut self, name: Option<String>) -> Player {
        let (x, y) = random_location(self.state.map_width, self.state.map_height);
        let name = name.unwrap_or_else(|| {
            let name = DEFAULT_NAMES[self.name_index].to_string();
            self.name_index = (self.name_index + 1) % DEFAULT_NAMES.len();
            name
        });

        let mut player = Player::new(name, x, y);
        player.segments = chain::spawn_segments(x, y, SEGMENT_SPACING, INITIAL_TAIL_SIZE);
        if self.config.debug_circles {
            player.sync_circles();
        }
        player
    }

    fn allocate_session_id(&mut self) -> SessionId {
        let session_id = self.next_session_id;
        self.next_session_id += 1;
        session_id
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
