#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64, // radius, never negative
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    #[inline]
    pub fn center(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Strict containment: points on the rim are outside.
    #[inline]
    pub fn contains(&self, p: [f64; 2]) -> bool {
        crate::geometry::distance_squared(p, self.center()) < self.r * self.r
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub x: f64, // origin
    pub y: f64,
    pub a: f64, // direction angle in radians
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionPoint {
    pub x: f64,
    pub y: f64,
}

/// The moving circle rays bounce off. It oscillates vertically at constant speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub body: Circle,
    pub speed_y: f64, // pixels per frame, sign is direction
}

impl Obstacle {
    /// Integrate one frame of motion inside a viewport of `height` pixels.
    ///
    /// The speed flips on the same frame the edge first leaves `[0, height]`.
    pub fn advance(&mut self, height: f64) {
        self.body.y += self.speed_y;
        if self.body.y - self.body.r < 0.0 {
            self.speed_y = self.speed_y.abs();
        }
        if self.body.y + self.body.r > height {
            self.speed_y = -self.speed_y.abs();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rim_is_not_inside() {
        let c = Circle::new(0.0, 0.0, 5.0);
        assert!(!c.contains([5.0, 0.0]));
        assert!(!c.contains([3.0, 4.0]));
        assert!(c.contains([2.9, 4.0]));
    }

    #[test]
    fn zero_radius_contains_nothing() {
        let c = Circle::new(1.0, 1.0, 0.0);
        assert!(!c.contains([1.0, 1.0]));
    }

    #[test]
    fn obstacle_bounces_off_top() {
        let mut o = Obstacle {
            body: Circle::new(100.0, 101.0, 100.0),
            speed_y: -2.0,
        };
        o.advance(600.0);
        assert_eq!(o.body.y, 99.0);
        assert_eq!(o.speed_y, 2.0);
        o.advance(600.0);
        assert_eq!(o.body.y, 101.0);
        assert_eq!(o.speed_y, 2.0);
    }

    #[test]
    fn obstacle_keeps_moving_inside_bounds() {
        let mut o = Obstacle {
            body: Circle::new(100.0, 300.0, 50.0),
            speed_y: 2.0,
        };
        for _ in 0..10 {
            o.advance(600.0);
        }
        assert_eq!(o.body.y, 320.0);
        assert_eq!(o.speed_y, 2.0);
    }
}
