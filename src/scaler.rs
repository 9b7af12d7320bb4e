use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed nearest-neighbor mapping from window pixels to framebuffer pixels
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
    src_w: usize,
    src_h: usize,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
            src_w: 0,
            src_h: 0,
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_y.len())
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.src_x.len() == self.src_w && self.src_y.len() == self.src_h
    }

    /// Window pixel position (may be fractional) to framebuffer coordinates.
    pub fn to_source(&self, px: f64, py: f64) -> (f64, f64) {
        let (dw, dh) = self.dst_size();
        if dw == 0 || dh == 0 {
            return (px, py);
        }
        (
            px * self.src_w as f64 / dw as f64,
            py * self.src_h as f64 / dh as f64,
        )
    }
}

fn axis_map(dst: usize, src: usize) -> Vec<usize> {
    let s = src as f64 / dst as f64;
    (0..dst)
        .map(|d| ((d as f64 * s) as usize).min(src.saturating_sub(1)))
        .collect()
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    ScaleLut {
        src_x: axis_map(dst_w, src_w),
        src_y: axis_map(dst_h, src_h),
        src_w,
        src_h,
    }
}

/// Nearest-neighbor stretch of `src` (sized per the LUT) into `dst`.
///
/// Each destination row is filled by its own rayon task from a single source row.
pub fn blit_nearest(dst: &mut [u32], src: &[u32], lut: &ScaleLut) {
    let (dw, dh) = lut.dst_size();
    if dw == 0 || dh == 0 || lut.src_w == 0 || lut.src_h == 0 {
        return;
    }
    if lut.is_identity() {
        dst[..src.len()].copy_from_slice(src);
        return;
    }

    let sw = lut.src_w;
    dst.par_chunks_mut(dw)
        .take(dh)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let row = &src[lut.src_y[y] * sw..(lut.src_y[y] + 1) * sw];
            for (x, px) in dst_row.iter_mut().enumerate() {
                *px = row[lut.src_x[x]];
            }
        });
}
