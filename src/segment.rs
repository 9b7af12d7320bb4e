use crate::error::AllocationError;

const INITIAL_CAPACITY: usize = 16;

/// One step of a ray's visible path: a `thickness` square at `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub x: i32,
    pub y: i32,
    pub thickness: u32,
    pub color: u32,
}

impl Segment {
    /// Positions are truncated toward zero, matching integer pixel rects.
    #[inline]
    pub fn at(pos: [f64; 2], thickness: u32, color: u32) -> Self {
        Self {
            x: pos[0] as i32,
            y: pos[1] as i32,
            thickness,
            color,
        }
    }
}

/// Segments accumulated over one frame.
///
/// Capacity doubles on overflow and survives `clear`, so steady-state frames
/// don't reallocate.
#[derive(Debug, Default)]
pub struct SegmentBuffer {
    segments: Vec<Segment>,
}

impl SegmentBuffer {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Empty buffer with room for at least `capacity` segments.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocationError> {
        let mut buf = Self::new();
        buf.grow_for(capacity)?;
        Ok(buf)
    }

    pub fn push(&mut self, segment: Segment) -> Result<(), AllocationError> {
        self.grow_for(1)?;
        self.segments.push(segment);
        Ok(())
    }

    /// Append another buffer's segments, keeping their order.
    pub fn append(&mut self, other: &SegmentBuffer) -> Result<(), AllocationError> {
        self.grow_for(other.len())?;
        self.segments.extend_from_slice(&other.segments);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.segments.capacity()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    fn grow_for(&mut self, extra: usize) -> Result<(), AllocationError> {
        let needed = self.segments.len() + extra;
        let cap = self.segments.capacity();
        if needed <= cap {
            return Ok(());
        }
        let mut target = cap.max(INITIAL_CAPACITY);
        while target < needed {
            target *= 2;
        }
        self.segments
            .try_reserve_exact(target - self.segments.len())
            .map_err(|source| AllocationError {
                what: "segments",
                requested: target,
                source,
            })
    }
}

impl<'a> IntoIterator for &'a SegmentBuffer {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
