use tracing::warn;

use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::entity::Entity;

/// Screen-space footprint of a point entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteProjection {
    /// Distance along the view axis. Always positive.
    pub depth: f64,
    pub screen_x: i64,
    /// Side of the square footprint in pixels.
    pub size: i64,
    pub left: i64,  // first column, may be off-screen
    pub right: i64, // one past the last column
    pub top: usize,
    pub bottom: usize, // inclusive
}

/// A vertical slice of a sprite for one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteSlice {
    pub x: usize,
    pub top: usize,
    pub bottom: usize,
    pub color: u32,
}

/// Projects a world point through the camera. `None` when the point is
/// behind the camera (or level with it) or the camera basis is degenerate.
pub fn project(camera: &Camera, pos: [f64; 2], width: usize, height: usize) -> Option<SpriteProjection> {
    if height == 0 || width == 0 {
        return None;
    }
    let [lateral, depth] = camera.world_to_camera(pos)?;
    if !(depth > 0.0) || !lateral.is_finite() {
        return None;
    }

    let half_w = width as f64 / 2.0;
    let screen_x = (half_w * (1.0 + lateral / depth)).floor();
    let size = (height as f64 / depth).floor().abs();
    if !screen_x.is_finite() || !size.is_finite() {
        return None;
    }
    // Points almost level with the camera project to absurd extents; bound
    // them so the column arithmetic below stays in range.
    let span = 4.0 * (width + height) as f64;
    let size = size.min(span) as i64;
    let screen_x = screen_x.clamp(-span, width as f64 + span) as i64;

    let left = screen_x - size / 2;
    let right = left + size;

    let h = height as i64;
    let top = (h / 2 - size / 2).clamp(0, h - 1) as usize;
    let bottom = (h / 2 + size / 2).clamp(0, h - 1) as usize;

    Some(SpriteProjection {
        depth,
        screen_x,
        size,
        left,
        right,
        top,
        bottom,
    })
}

impl SpriteProjection {
    /// On-screen columns where the sprite is in front of the recorded wall.
    pub fn visible_columns(self, depth: &DepthBuffer) -> impl Iterator<Item = usize> + '_ {
        let sprite_depth = self.depth;
        let start = self.left.max(0);
        let end = self.right.min(depth.width() as i64);
        (start..end)
            .map(|x| x as usize)
            .filter(move |&x| depth.is_visible(x, sprite_depth))
    }
}

/// Draws one projected sprite column by column. Returns the columns drawn.
pub fn draw_sprite<F>(proj: &SpriteProjection, color: u32, depth: &DepthBuffer, draw: &mut F) -> usize
where
    F: FnMut(SpriteSlice),
{
    let mut drawn = 0;
    for x in proj.visible_columns(depth) {
        draw(SpriteSlice {
            x,
            top: proj.top,
            bottom: proj.bottom,
            color,
        });
        drawn += 1;
    }
    drawn
}

/// Composites entities over the wall pass, farthest first, so nearer
/// sprites overwrite farther ones where they overlap. Each column is also
/// depth-tested against the walls. Returns the number of slices drawn.
pub fn composite<F>(
    camera: &Camera,
    entities: &[Entity],
    width: usize,
    height: usize,
    depth: &DepthBuffer,
    mut draw: F,
) -> usize
where
    F: FnMut(SpriteSlice),
{
    let det = camera.basis_determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        warn!(det, "degenerate camera basis, skipping sprites this frame");
        return 0;
    }

    let mut order: Vec<(f64, &Entity)> = entities
        .iter()
        .filter(|e| e.is_alive())
        .filter(|e| {
            if e.has_finite_pos() {
                true
            } else {
                warn!(kind = ?e.kind(), "entity has a non-finite position, not drawn");
                false
            }
        })
        .map(|e| {
            let dx = e.pos()[0] - camera.pos[0];
            let dy = e.pos()[1] - camera.pos[1];
            (dx * dx + dy * dy, e)
        })
        .collect();
    order.sort_by(|a, b| b.0.total_cmp(&a.0)); // farthest first

    let mut drawn = 0;
    for (_, entity) in order {
        if let Some(proj) = project(camera, entity.pos(), width, height) {
            drawn += draw_sprite(&proj, entity.kind().color(), depth, &mut draw);
        }
    }
    drawn
}
