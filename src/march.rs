//! Step-wise ray marching, obstacle collision and the single reflection bounce.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::color::Attenuation;
use crate::error::AllocationError;
use crate::geometry::{direction, reflected_angle};
use crate::segment::{Segment, SegmentBuffer};
use crate::world::{Circle, CollisionPoint, Ray};

const STEP: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Inclusive on both edges. NaN positions are outside.
    #[inline]
    pub fn contains(&self, p: [f64; 2]) -> bool {
        (0.0..=self.width).contains(&p[0]) && (0.0..=self.height).contains(&p[1])
    }
}

/// Per-frame constants shared by every ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchParams {
    pub viewport: Viewport,
    pub thickness: u32,
    pub color: u32,
    pub darken_rate: u32,
}

/// How a reflected ray stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Exited,
    Decayed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reflection {
    pub angle: f64,
    pub end: Termination,
    pub steps: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Exited,
    Decayed,
    /// `reflection` is `None` when the hit landed exactly on the obstacle center.
    Reflected {
        collision: CollisionPoint,
        reflection: Option<Reflection>,
    },
}

/// Result of marching one primary ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trace {
    pub outcome: Outcome,
    pub steps: usize,
}

enum Stop {
    Exited,
    Decayed,
    Hit([f64; 2]),
}

/// Walk from `pos` along `angle` until the ray leaves the viewport, fades to
/// black or (if an obstacle is given) enters it. Every step emits a segment.
fn walk(
    mut pos: [f64; 2],
    angle: f64,
    fade: &mut Attenuation,
    obstacle: Option<&Circle>,
    params: &MarchParams,
    out: &mut SegmentBuffer,
) -> Result<(Stop, usize), AllocationError> {
    let dir = direction(angle);
    let mut steps = 0;
    loop {
        pos[0] += STEP * dir[0];
        pos[1] += STEP * dir[1];
        steps += 1;

        out.push(Segment::at(pos, params.thickness, fade.color()))?;

        if !params.viewport.contains(pos) {
            return Ok((Stop::Exited, steps));
        }

        fade.tick();
        if fade.is_dead() {
            return Ok((Stop::Decayed, steps));
        }

        if let Some(circle) = obstacle {
            if circle.contains(pos) {
                return Ok((Stop::Hit(pos), steps));
            }
        }
    }
}

/// March one primary ray, reflecting it off `obstacle` at most once.
pub fn march_ray(
    ray: &Ray,
    obstacle: &Circle,
    params: &MarchParams,
    out: &mut SegmentBuffer,
) -> Result<Trace, AllocationError> {
    let mut fade = Attenuation::new(params.color, params.darken_rate);
    let (stop, steps) = walk([ray.x, ray.y], ray.a, &mut fade, Some(obstacle), params, out)?;

    let outcome = match stop {
        Stop::Exited => Outcome::Exited,
        Stop::Decayed => Outcome::Decayed,
        Stop::Hit(p) => {
            let collision = CollisionPoint { x: p[0], y: p[1] };
            let reflection = reflect_ray(ray.a, collision, fade, obstacle, params, out)?;
            Outcome::Reflected {
                collision,
                reflection,
            }
        }
    };

    Ok(Trace { outcome, steps })
}

/// Bounce a ray that hit `obstacle` at `collision` and march the mirrored ray.
///
/// The reflected ray keeps the incoming color state and never tests the
/// obstacle again. Returns `None` if the surface normal is undefined.
pub fn reflect_ray(
    angle: f64,
    collision: CollisionPoint,
    mut fade: Attenuation,
    obstacle: &Circle,
    params: &MarchParams,
    out: &mut SegmentBuffer,
) -> Result<Option<Reflection>, AllocationError> {
    let p = [collision.x, collision.y];
    let Some(reflected) = reflected_angle(angle, p, obstacle.center()) else {
        return Ok(None);
    };

    let (stop, steps) = walk(p, reflected, &mut fade, None, params, out)?;
    let end = match stop {
        Stop::Exited => Termination::Exited,
        Stop::Decayed => Termination::Decayed,
        Stop::Hit(_) => unreachable!("reflected rays are not collision tested"),
    };

    Ok(Some(Reflection {
        angle: reflected,
        end,
        steps,
    }))
}

/// Capacity to seed each ray's buffer with: the viewport span, or how many
/// steps the color lasts before fading to black if that is shorter. Longer
/// paths (a bounce back across the screen) still grow by doubling.
fn expected_segments(params: &MarchParams) -> usize {
    let span = params.viewport.width.max(params.viewport.height) as usize;
    let lifetime = 256 * params.darken_rate.max(1) as usize;
    span.min(lifetime) + 1
}

/// March every ray in parallel and append their segments to `frame` in ray order.
///
/// Each task fills its own buffer; the collect is the join point, so `frame`
/// is only touched once all rays are done.
pub fn march_all(
    rays: &[Ray],
    obstacle: &Circle,
    params: &MarchParams,
    frame: &mut SegmentBuffer,
) -> Result<(), AllocationError> {
    if rays.is_empty() {
        return Ok(());
    }

    let per_ray = expected_segments(params);
    let locals = rays
        .par_iter()
        .map(|ray| {
            let mut local = SegmentBuffer::with_capacity(per_ray)?;
            march_ray(ray, obstacle, params, &mut local)?;
            Ok::<_, AllocationError>(local)
        })
        .collect::<Result<Vec<SegmentBuffer>, AllocationError>>()?;

    for local in &locals {
        frame.append(local)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn params(width: f64, height: f64) -> MarchParams {
        MarchParams {
            viewport: Viewport { width, height },
            thickness: 3,
            color: 0xffd43b,
            darken_rate: 2,
        }
    }

    #[test]
    fn ray_exits_right_edge() {
        let p = params(100.0, 100.0);
        let far = Circle::new(-500.0, -500.0, 1.0);
        let mut out = SegmentBuffer::new();
        let trace = march_ray(&Ray { x: 50.0, y: 50.0, a: 0.0 }, &far, &p, &mut out).unwrap();
        assert_eq!(trace.outcome, Outcome::Exited);
        // Steps to x = 51..=101; the segment at 101 is emitted before the exit test.
        assert_eq!(trace.steps, 51);
        assert_eq!(out.len(), 51);
        assert_eq!(out.as_slice()[0].x, 51);
    }

    #[test]
    fn first_segment_uses_undimmed_color() {
        let p = params(100.0, 100.0);
        let far = Circle::new(-500.0, -500.0, 1.0);
        let mut out = SegmentBuffer::new();
        march_ray(&Ray { x: 50.0, y: 50.0, a: 0.0 }, &far, &p, &mut out).unwrap();
        let colors: Vec<u32> = out.iter().map(|s| s.color).collect();
        assert_eq!(colors[0], 0xffd43b);
        assert_eq!(colors[1], 0xffd43b);
        assert_eq!(colors[2], 0xfed33a);
        assert!(out.iter().all(|s| s.thickness == 3));
    }

    #[test]
    fn dim_ray_decays_before_exit() {
        let mut p = params(1000.0, 1000.0);
        p.color = 0x000003;
        let far = Circle::new(-500.0, -500.0, 1.0);
        let mut out = SegmentBuffer::new();
        let trace = march_ray(&Ray { x: 10.0, y: 10.0, a: 0.0 }, &far, &p, &mut out).unwrap();
        assert_eq!(trace.outcome, Outcome::Decayed);
        assert_eq!(trace.steps, 6);
        assert!(out.iter().all(|s| s.color != BLACK));
    }

    #[test]
    fn head_on_hit_reflects_back() {
        let p = params(400.0, 400.0);
        let obstacle = Circle::new(300.0, 200.0, 50.0);
        let mut out = SegmentBuffer::new();
        let trace = march_ray(&Ray { x: 100.0, y: 200.0, a: 0.0 }, &obstacle, &p, &mut out).unwrap();

        let Outcome::Reflected {
            collision,
            reflection: Some(reflection),
        } = trace.outcome
        else {
            panic!("expected a reflection, got {:?}", trace.outcome);
        };
        // x = 250 is on the rim, so the first point strictly inside is 251.
        assert_relative_eq!(collision.x, 251.0);
        assert_relative_eq!(collision.y, 200.0);
        assert_eq!(trace.steps, 151);
        assert_relative_eq!(reflection.angle.abs(), PI, epsilon = 1e-12);
        assert_eq!(reflection.end, Termination::Exited);
        assert_eq!(out.len(), trace.steps + reflection.steps);
    }

    #[test]
    fn tangent_ray_does_not_collide() {
        let p = params(400.0, 400.0);
        // Ray runs along y = 150, which touches the top of the circle at (300, 150).
        let obstacle = Circle::new(300.0, 200.0, 50.0);
        let mut out = SegmentBuffer::new();
        let trace = march_ray(&Ray { x: 100.0, y: 150.0, a: 0.0 }, &obstacle, &p, &mut out).unwrap();
        assert_eq!(trace.outcome, Outcome::Exited);
    }

    #[test]
    fn hit_on_center_skips_reflection() {
        let p = params(400.0, 400.0);
        let obstacle = Circle::new(101.0, 100.0, 0.5);
        let mut out = SegmentBuffer::new();
        let trace = march_ray(&Ray { x: 100.0, y: 100.0, a: 0.0 }, &obstacle, &p, &mut out).unwrap();
        assert_eq!(
            trace.outcome,
            Outcome::Reflected {
                collision: CollisionPoint { x: 101.0, y: 100.0 },
                reflection: None,
            }
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn reflected_ray_ignores_obstacle() {
        let p = params(400.0, 400.0);
        let obstacle = Circle::new(200.0, 200.0, 50.0);
        let fade = Attenuation::new(p.color, p.darken_rate);
        let mut out = SegmentBuffer::new();
        // Start inside the disk heading outward; only the boundary can stop it.
        let r = reflect_ray(
            PI,
            CollisionPoint { x: 240.0, y: 200.0 },
            fade,
            &obstacle,
            &p,
            &mut out,
        )
        .unwrap()
        .unwrap();
        assert_relative_eq!(r.angle, 0.0, epsilon = 1e-12);
        assert_eq!(r.end, Termination::Exited);
        assert_eq!(r.steps, 161);
    }

    #[test]
    fn origin_outside_viewport_stops_immediately() {
        let p = params(100.0, 100.0);
        let far = Circle::new(-500.0, -500.0, 1.0);
        let mut out = SegmentBuffer::new();
        let trace = march_ray(&Ray { x: -20.0, y: 50.0, a: PI }, &far, &p, &mut out).unwrap();
        assert_eq!(trace.outcome, Outcome::Exited);
        assert_eq!(trace.steps, 1);
    }

    #[test]
    fn march_all_keeps_ray_order() {
        let p = params(50.0, 50.0);
        let far = Circle::new(-500.0, -500.0, 1.0);
        let rays = [
            Ray { x: 25.0, y: 25.0, a: 0.0 },
            Ray { x: 25.0, y: 25.0, a: PI },
        ];
        let mut frame = SegmentBuffer::new();
        march_all(&rays, &far, &p, &mut frame).unwrap();

        let mut expected = SegmentBuffer::new();
        for ray in &rays {
            march_ray(ray, &far, &p, &mut expected).unwrap();
        }
        assert_eq!(frame.as_slice(), expected.as_slice());
        assert_eq!(frame.as_slice()[0].x, 26);
    }

    #[test]
    fn single_ray_fits_presized_buffer() {
        let p = params(1000.0, 650.0);
        let far = Circle::new(-500.0, -500.0, 1.0);
        let mut out = SegmentBuffer::with_capacity(expected_segments(&p)).unwrap();
        let cap = out.capacity();
        // Longest path in the viewport: corner to corner, cut short by fading.
        let a = 650.0f64.atan2(1000.0);
        march_ray(&Ray { x: 0.0, y: 0.0, a }, &far, &p, &mut out).unwrap();
        assert!(out.len() <= expected_segments(&p));
        assert_eq!(out.capacity(), cap);
    }

    #[test]
    fn march_all_with_no_rays_is_empty() {
        let p = params(50.0, 50.0);
        let mut frame = SegmentBuffer::new();
        march_all(&[], &Circle::new(0.0, 0.0, 1.0), &p, &mut frame).unwrap();
        assert!(frame.is_empty());
    }
}
