use crate::color::{BLACK, WHITE};
use crate::config::SimConfig;
use crate::error::AllocationError;
use crate::march::{MarchParams, Viewport, march_all};
use crate::rays::RaySet;
use crate::renderer::{Canvas, fill_circle, flush};
use crate::segment::SegmentBuffer;
use crate::world::{Circle, Obstacle};

/// Everything one session of the light demo owns between frames.
pub struct Simulation {
    params: MarchParams,
    rays: RaySet,
    obstacle: Obstacle,
    segments: SegmentBuffer,
}

impl Simulation {
    pub fn new(config: &SimConfig) -> Result<Self, AllocationError> {
        let params = MarchParams {
            viewport: Viewport {
                width: config.viewport.width as f64,
                height: config.viewport.height as f64,
            },
            thickness: config.rays.thickness,
            color: config.rays.color,
            darken_rate: config.rays.darken_rate,
        };
        let rays = RaySet::new(
            config.source.circle(),
            config.rays.count,
            config.rays.min,
            config.rays.max,
            config.rays.step,
        )?;
        let obstacle = Obstacle {
            body: config.obstacle.circle(),
            speed_y: config.obstacle.speed,
        };

        Ok(Self {
            params,
            rays,
            obstacle,
            segments: SegmentBuffer::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.params.viewport
    }

    pub fn params(&self) -> &MarchParams {
        &self.params
    }

    pub fn ray_count(&self) -> usize {
        self.rays.count()
    }

    pub fn rays(&self) -> &RaySet {
        &self.rays
    }

    pub fn source(&self) -> Circle {
        self.rays.source()
    }

    pub fn obstacle(&self) -> &Obstacle {
        &self.obstacle
    }

    pub fn segments(&self) -> &SegmentBuffer {
        &self.segments
    }

    pub fn move_source(&mut self, x: f64, y: f64) -> Result<(), AllocationError> {
        let source = Circle { x, y, ..self.rays.source() };
        self.rays.set_source(source)
    }

    pub fn increase_rays(&mut self) -> Result<bool, AllocationError> {
        self.rays.increase()
    }

    pub fn decrease_rays(&mut self) -> Result<bool, AllocationError> {
        self.rays.decrease()
    }

    pub fn advance_obstacle(&mut self) {
        self.obstacle.advance(self.params.viewport.height);
    }

    /// March every ray against the obstacle's current position.
    ///
    /// On failure the buffer is left empty rather than partially filled.
    pub fn march(&mut self) -> Result<(), AllocationError> {
        self.segments.clear();
        let result = march_all(
            self.rays.rays(),
            &self.obstacle.body,
            &self.params,
            &mut self.segments,
        );
        if result.is_err() {
            self.segments.clear();
        }
        result
    }

    /// Paint the last march, with both circles drawn over the rays.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.clear(BLACK);
        flush(canvas, &self.segments);
        fill_circle(canvas, &self.rays.source(), WHITE);
        fill_circle(canvas, &self.obstacle.body, WHITE);
    }

    /// One full frame: march, draw, then move the obstacle for the next one.
    pub fn step<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<(), AllocationError> {
        self.march()?;
        self.render(canvas);
        self.segments.clear();
        self.advance_obstacle();
        Ok(())
    }
}
