//! The replicated world tree.
//!
//! Every observable mutation in a room flows through this one container so
//! that a diffing layer observing it after each tick always sees a fully
//! consistent snapshot. The owning `Room` is the sole writer; everything
//! else gets values or pure functions, never references into the tree.

use shared::{Food, FoodId, Player, SessionId, MAP_HEIGHT, MAP_WIDTH};
use std::collections::HashMap;

#[derive(Debug)]
pub struct WorldState {
    pub map_width: f32,
    pub map_height: f32,
    pub players: HashMap<SessionId, Player>,
    pub food_items: HashMap<FoodId, Food>,
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,
            players: HashMap::new(),
            food_items: HashMap::new(),
        }
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_state_defaults() {
        let state = WorldState::new();
        assert_eq!(state.map_width, MAP_WIDTH);
        assert_eq!(state.map_height, MAP_HEIGHT);
        assert!(state.players.is_empty());
        assert!(state.food_items.is_empty());
    }
}
