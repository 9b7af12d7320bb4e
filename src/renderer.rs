use crate::segment::SegmentBuffer;
use crate::world::Circle;

/// Anything rays and circles can be drawn onto.
pub trait Canvas {
    /// Fill a `w`x`h` rectangle whose top-left corner is `(x, y)`. Parts outside
    /// the canvas are clipped.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u32);

    /// Fill the whole canvas.
    fn clear(&mut self, color: u32);

    /// Width and height in pixels.
    fn size(&self) -> (usize, usize);
}

/// CPU-side 0RGB pixel buffer the simulation renders into.
pub struct Framebuffer {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }
}

impl Canvas for Framebuffer {
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u32) {
        // Clamp in i64 so huge rects near i32::MAX can't overflow.
        let x0 = (x as i64).clamp(0, self.width as i64) as usize;
        let y0 = (y as i64).clamp(0, self.height as i64) as usize;
        let x1 = (x as i64 + w as i64).clamp(0, self.width as i64) as usize;
        let y1 = (y as i64 + h as i64).clamp(0, self.height as i64) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for row in y0..y1 {
            let start = row * self.width;
            self.pixels[start + x0..start + x1].fill(color);
        }
    }

    fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// Pixel indices `[lo, hi]` covering `[center - r, center + r]` on an axis of
/// `len` pixels, or `None` when the span misses the canvas.
fn clipped_span(center: f64, r: f64, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let lo = (center - r).floor().max(0.0);
    let hi = (center + r).ceil().min((len - 1) as f64);
    (lo <= hi).then_some((lo as usize, hi as usize))
}

/// Draw a filled disk one pixel at a time.
///
/// Only pixels inside the canvas are visited; each is filled when
/// `dx^2 + dy^2 < r^2`.
pub fn fill_circle<C: Canvas + ?Sized>(canvas: &mut C, circle: &Circle, color: u32) {
    let (width, height) = canvas.size();
    let (Some((x0, x1)), Some((y0, y1))) = (
        clipped_span(circle.x, circle.r, width),
        clipped_span(circle.y, circle.r, height),
    ) else {
        return;
    };

    let r2 = circle.r * circle.r;
    for py in y0..=y1 {
        let dy = py as f64 - circle.y;
        for px in x0..=x1 {
            let dx = px as f64 - circle.x;
            if dx * dx + dy * dy < r2 {
                canvas.fill_rect(px as i32, py as i32, 1, 1, color);
            }
        }
    }
}

/// Draw every buffered segment as a square of its thickness.
pub fn flush<C: Canvas + ?Sized>(canvas: &mut C, segments: &SegmentBuffer) {
    for s in segments {
        canvas.fill_rect(s.x, s.y, s.thickness, s.thickness, s.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_rect(-1, -1, 3, 3, 7);
        assert_eq!(fb.pixel(0, 0), Some(7));
        assert_eq!(fb.pixel(1, 1), Some(7));
        assert_eq!(fb.pixel(2, 2), Some(0));

        fb.fill_rect(3, 3, 10, 10, 9);
        assert_eq!(fb.pixel(3, 3), Some(9));
        assert_eq!(fb.pixel(4, 4), None);

        fb.fill_rect(100, 0, 3, 3, 5);
        fb.fill_rect(i32::MAX, i32::MAX, u32::MAX, u32::MAX, 5);
        assert!(fb.pixels().iter().all(|&p| p != 5));
    }

    #[test]
    fn circle_excludes_rim() {
        let mut fb = Framebuffer::new(20, 20);
        fill_circle(&mut fb, &Circle::new(10.0, 10.0, 3.0), 1);
        assert_eq!(fb.pixel(10, 10), Some(1));
        assert_eq!(fb.pixel(12, 10), Some(1));
        // Exactly r away: not drawn.
        assert_eq!(fb.pixel(13, 10), Some(0));
        assert_eq!(fb.pixel(10, 7), Some(0));
        let filled = fb.pixels().iter().filter(|&&p| p == 1).count();
        // Integer points strictly inside a radius-3 circle.
        assert_eq!(filled, 25);
    }

    #[test]
    fn circle_far_off_canvas_draws_nothing() {
        let mut fb = Framebuffer::new(8, 8);
        fill_circle(&mut fb, &Circle::new(1e17, 4.0, 100.0), 1);
        fill_circle(&mut fb, &Circle::new(-50.0, -50.0, 10.0), 1);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn huge_circle_fills_visible_part_only() {
        let mut fb = Framebuffer::new(8, 8);
        fill_circle(&mut fb, &Circle::new(4.0, 4.0, 1e9), 1);
        assert!(fb.pixels().iter().all(|&p| p == 1));
    }

    #[test]
    fn circle_clipped_at_edge() {
        let mut fb = Framebuffer::new(10, 10);
        fill_circle(&mut fb, &Circle::new(0.0, 0.0, 3.0), 1);
        // Quarter of the radius-3 disk: offsets 0..=2 on both axes.
        let filled = fb.pixels().iter().filter(|&&p| p == 1).count();
        assert_eq!(filled, 9);
        assert_eq!(fb.pixel(2, 2), Some(1));
        assert_eq!(fb.pixel(3, 0), Some(0));
    }

    #[test]
    fn flush_draws_each_segment_square() {
        let mut fb = Framebuffer::new(10, 10);
        let mut segments = SegmentBuffer::new();
        segments
            .push(Segment {
                x: 2,
                y: 3,
                thickness: 3,
                color: 0xabcdef,
            })
            .unwrap();
        flush(&mut fb, &segments);
        let lit = fb.pixels().iter().filter(|&&p| p == 0xabcdef).count();
        assert_eq!(lit, 9);
        assert_eq!(fb.pixel(4, 5), Some(0xabcdef));
        assert_eq!(fb.pixel(5, 5), Some(0));
    }
}
