use std::f64::consts::TAU;

use crate::error::AllocationError;
use crate::world::{Circle, Ray};

/// `count` rays from the center of `source`, evenly spaced over `[0, 2pi)`.
pub fn generate(source: Circle, count: usize) -> Result<Vec<Ray>, AllocationError> {
    let mut rays = Vec::new();
    fill(&mut rays, source, count)?;
    Ok(rays)
}

fn fill(rays: &mut Vec<Ray>, source: Circle, count: usize) -> Result<(), AllocationError> {
    rays.clear();
    rays.try_reserve_exact(count).map_err(|source| AllocationError {
        what: "rays",
        requested: count,
        source,
    })?;
    rays.extend((0..count).map(|i| Ray {
        x: source.x,
        y: source.y,
        a: i as f64 / count as f64 * TAU,
    }));
    Ok(())
}

/// The session's ray fan plus the bounds its size may move within.
#[derive(Debug)]
pub struct RaySet {
    rays: Vec<Ray>,
    source: Circle,
    count: usize,
    min: usize,
    max: usize,
    step: usize,
}

impl RaySet {
    /// `count` is clamped into `[min, max]`.
    pub fn new(
        source: Circle,
        count: usize,
        min: usize,
        max: usize,
        step: usize,
    ) -> Result<Self, AllocationError> {
        let count = count.clamp(min, max.max(min));
        let mut set = Self {
            rays: Vec::new(),
            source,
            count,
            min,
            max: max.max(min),
            step,
        };
        set.regenerate()?;
        Ok(set)
    }

    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn source(&self) -> Circle {
        self.source
    }

    /// Move the fan's origin. Every ray is rebuilt.
    pub fn set_source(&mut self, source: Circle) -> Result<(), AllocationError> {
        self.source = source;
        self.regenerate()
    }

    /// Add `step` rays, stopping at the maximum. Returns whether the count changed.
    pub fn increase(&mut self) -> Result<bool, AllocationError> {
        self.resize(self.count.saturating_add(self.step).min(self.max))
    }

    /// Remove `step` rays, stopping at the minimum. Returns whether the count changed.
    pub fn decrease(&mut self) -> Result<bool, AllocationError> {
        self.resize(self.count.saturating_sub(self.step).max(self.min))
    }

    fn resize(&mut self, count: usize) -> Result<bool, AllocationError> {
        if count == self.count {
            return Ok(false);
        }
        log::debug!("ray count {} -> {}", self.count, count);
        self.count = count;
        self.regenerate()?;
        Ok(true)
    }

    fn regenerate(&mut self) -> Result<(), AllocationError> {
        // Spacing depends on the total, so nothing from the old fan is reused.
        let mut rays = Vec::new();
        fill(&mut rays, self.source, self.count)?;
        self.rays = rays;
        Ok(())
    }
}
