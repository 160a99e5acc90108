use crate::camera::Camera;
use crate::caster::{self, Side};
use crate::depth::DepthBuffer;
use crate::entity::Entity;
use crate::sprites;
use crate::world::GridMap;

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Drawing primitives the renderer needs from a presentation surface.
/// Implementations clip anything outside their bounds.
pub trait Canvas {
    fn size(&self) -> (usize, usize);

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32);

    /// Vertical segment from `y0` to `y1`, both inclusive.
    fn vline(&mut self, x: usize, y0: usize, y1: usize, color: u32);
}

/// Fixed-size 0RGB pixel buffer, row-major.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }
}

impl Canvas for FrameBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let x1 = x.saturating_add(w).min(self.width);
        let y1 = y.saturating_add(h).min(self.height);
        if x >= x1 {
            return;
        }
        for row in y..y1 {
            let start = row * self.width;
            self.pixels[start + x..start + x1].fill(color);
        }
    }

    fn vline(&mut self, x: usize, y0: usize, y1: usize, color: u32) {
        if x >= self.width || self.height == 0 {
            return;
        }
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        let y1 = y1.min(self.height - 1);
        let mut idx = y0 * self.width + x;
        for _y in y0..=y1 {
            self.pixels[idx] = color;
            idx += self.width;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub sky: u32,
    pub floor: u32,
    pub wall_x: u32,
    pub wall_y: u32,
}

impl Palette {
    pub const CLASSIC: Palette = Palette {
        sky: pack_rgb(0x34, 0x98, 0xdb),
        floor: pack_rgb(0x7f, 0x8c, 0x8d),
        wall_x: pack_rgb(0x34, 0x49, 0x5e),
        wall_y: pack_rgb(0x2c, 0x3e, 0x50),
    };

    /// Two-tone shading keyed by the side the ray hit.
    #[inline]
    pub fn wall(&self, side: Side) -> u32 {
        match side {
            Side::X => self.wall_x,
            Side::Y => self.wall_y,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::CLASSIC
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub stripes: usize,
    pub sprite_slices: usize,
}

/// Renders one frame: background, wall stripes (filling `depth`), then
/// sprites depth-tested against those walls.
pub fn render_frame<C: Canvas>(
    canvas: &mut C,
    palette: &Palette,
    map: &GridMap,
    camera: &Camera,
    entities: &[Entity],
    depth: &mut DepthBuffer,
) -> FrameStats {
    let (width, height) = canvas.size();
    let mut stats = FrameStats::default();
    if width == 0 || height == 0 {
        depth.reset(width);
        return stats;
    }

    // Clear background
    let mid = height / 2;
    canvas.fill_rect(0, 0, width, mid, palette.sky);
    canvas.fill_rect(0, mid, width, height - mid, palette.floor);

    caster::cast_walls(map, camera, width, height, depth, |stripe| {
        canvas.vline(stripe.x, stripe.top, stripe.bottom, palette.wall(stripe.side));
        stats.stripes += 1;
    });

    stats.sprite_slices = sprites::composite(camera, entities, width, height, depth, |slice| {
        canvas.vline(slice.x, slice.top, slice.bottom, slice.color);
    });

    stats
}
