//! Consumable spawning: periodic random food and death remains.

use log::{debug, info};
use rand::Rng;
use shared::{
    Food, FoodId, FoodKind, Segment, FOOD_CAPACITY, FOOD_SPAWN_INTERVAL_MS, FOOD_VALUE_MAX,
    FOOD_VALUE_MIN, REMAINS_FOOD_VALUE, SPAWN_MARGIN,
};
use std::collections::HashMap;

/// Uniform map position inset from the edges by the spawn margin, snapped to
/// whole pixels.
pub fn random_location(map_width: f32, map_height: f32) -> (f32, f32) {
    let mut rng = rand::thread_rng();
    let x = rng.gen_range(SPAWN_MARGIN..map_width - SPAWN_MARGIN).floor();
    let y = rng.gen_range(SPAWN_MARGIN..map_height - SPAWN_MARGIN).floor();
    (x, y)
}

/// Creates food entities and owns the monotone food-id counter. The periodic
/// interval runs on the simulation clock: it only advances with fixed steps,
/// so a stalled driver does not burst-spawn on catch-up beyond the steps it
/// actually consumes.
#[derive(Debug)]
pub struct FoodSpawner {
    next_food_id: FoodId,
    elapsed_ms: f64,
    interval_ms: f64,
    capacity: usize,
}

impl FoodSpawner {
    pub fn new() -> Self {
        Self {
            next_food_id: 0,
            elapsed_ms: 0.0,
            interval_ms: FOOD_SPAWN_INTERVAL_MS,
            capacity: FOOD_CAPACITY,
        }
    }

    /// Advances the simulation clock and fires the periodic spawn for every
    /// full interval crossed.
    pub fn advance(
        &mut self,
        step_ms: f64,
        food_items: &mut HashMap<FoodId, Food>,
        map_width: f32,
        map_height: f32,
    ) {
        self.elapsed_ms += step_ms;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            self.spawn_random(food_items, map_width, map_height);
        }
    }

    /// One periodic spawn attempt: a `Random` food at an inset position with
    /// value drawn from the fixed range, unless the room is at capacity.
    pub fn spawn_random(
        &mut self,
        food_items: &mut HashMap<FoodId, Food>,
        map_width: f32,
        map_height: f32,
    ) -> Option<FoodId> {
        if food_items.len() >= self.capacity {
            debug!("Food at capacity ({}), skipping spawn", self.capacity);
            return None;
        }

        let (x, y) = random_location(map_width, map_height);
        let value = rand::thread_rng().gen_range(FOOD_VALUE_MIN..=FOOD_VALUE_MAX);
        let id = self.allocate_id();
        food_items.insert(
            id,
            Food {
                x,
                y,
                value,
                kind: FoodKind::Random,
            },
        );
        debug!("Spawned food {} at ({}, {}) worth {}", id, x, y, value);
        Some(id)
    }

    /// Converts a dead player's chain into `PlayerRemains` food, one unit per
    /// segment at the segment's exact last coordinates. Callers guard the
    /// alive transition so a death is converted at most once.
    pub fn spawn_remains(
        &mut self,
        segments: &[Segment],
        food_items: &mut HashMap<FoodId, Food>,
    ) -> usize {
        for segment in segments {
            let id = self.allocate_id();
            food_items.insert(
                id,
                Food {
                    x: segment.x,
                    y: segment.y,
                    value: REMAINS_FOOD_VALUE,
                    kind: FoodKind::PlayerRemains,
                },
            );
        }
        info!("Converted {} body segments to remains", segments.len());
        segments.len()
    }

    fn allocate_id(&mut self) -> FoodId {
        let id = self.next_food_id;
        self.next_food_id += 1;
        id
    }
}

impl Default for FoodSpawner {
    fn default() -> Self {
        Self::new()
    }
}
