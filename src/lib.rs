pub mod app;
pub mod components;
pub mod config;
pub mod game;
pub mod input;
pub mod rotation;
pub mod snapshot;
pub mod systems;

#[cfg(test)]
mod tests;

use bevy_ecs::prelude::Resource;
use std::time::{Duration, Instant};

#[derive(Resource, Debug, Clone)]
pub struct Time {
    delta: Duration,
    last_update: Instant,
}

impl Time {
    pub fn new() -> Self {
        Self {
            delta: Duration::default(),
            last_update: Instant::now(),
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_update);
        self.last_update = now;
    }

    /// Re-baseline the clock, discarding whatever elapsed since the last
    /// update. Called on resume so paused wall time never reaches the
    /// drop timer.
    pub fn reset(&mut self) {
        self.delta = Duration::default();
        self.last_update = Instant::now();
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn delta_millis(&self) -> f32 {
        self.delta.as_secs_f32() * 1000.0
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
