use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Source neighbours and blend weight for one destination row or column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tap {
    lo: usize,
    hi: usize,
    w: u32, // weight of `hi`, fixed-point 8.8 in [0, 256]
}

fn build_taps(dst: usize, src: usize) -> Vec<Tap> {
    if src == 0 {
        return Vec::new();
    }
    let ratio = src as f32 / dst.max(1) as f32;
    (0..dst)
        .map(|i| {
            let f = i as f32 * ratio;
            let lo = (f.floor() as usize).min(src - 1);
            let hi = (lo + 1).min(src - 1);
            let w = ((f - lo as f32) * 256.0).round().clamp(0.0, 256.0) as u32;
            Tap { lo, hi, w }
        })
        .collect()
}

#[inline]
fn lerp_color_u32(a: u32, b: u32, w256: u32) -> u32 {
    let inv = 256 - w256;
    // R and B share one multiply (00RR00BB), G goes alone (0000GG00).
    let rb = (((a & 0x00FF00FF) * inv + (b & 0x00FF00FF) * w256) >> 8) & 0x00FF00FF;
    let g = (((a & 0x0000FF00) * inv + (b & 0x0000FF00) * w256) >> 8) & 0x0000FF00;
    rb | g
}

/// Stretches the fixed internal frame to the window with bilinear filtering.
/// Lookup tables are rebuilt only when either size changes.
#[derive(Clone, Debug, Default)]
pub struct Upscaler {
    src: (usize, usize),
    dst: (usize, usize),
    cols: Vec<Tap>,
    rows: Vec<Tap>,
}

impl Upscaler {
    pub fn new(src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Self {
        let mut scaler = Self::default();
        scaler.resize(src_w, src_h, dst_w, dst_h);
        scaler
    }

    pub fn resize(&mut self, src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) {
        if self.src == (src_w, src_h) && self.dst == (dst_w, dst_h) {
            return;
        }
        self.src = (src_w, src_h);
        self.dst = (dst_w, dst_h);
        self.cols = build_taps(dst_w, src_w);
        self.rows = build_taps(dst_h, src_h);
    }

    /// Writes the stretched `src` into `dst`, rows in parallel. Mismatched
    /// buffers are left untouched.
    pub fn blit(&self, src: &[u32], dst: &mut [u32]) {
        let (sw, sh) = self.src;
        let (dw, dh) = self.dst;
        if dw == 0 || sw == 0 || sh == 0 || src.len() < sw * sh || dst.len() < dw * dh {
            return;
        }

        dst[..dw * dh]
            .par_chunks_mut(dw)
            .enumerate()
            .for_each(|(y, dst_row)| {
                let ty = self.rows[y];
                let row0 = &src[ty.lo * sw..(ty.lo + 1) * sw];
                let row1 = &src[ty.hi * sw..(ty.hi + 1) * sw];

                for (out, tx) in dst_row.iter_mut().zip(&self.cols) {
                    let top = lerp_color_u32(row0[tx.lo], row0[tx.hi], tx.w);
                    let bot = lerp_color_u32(row1[tx.lo], row1[tx.hi], tx.w);
                    *out = lerp_color_u32(top, bot, ty.w);
                }
            });
    }
}
