use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::world::GridMap;

/// Grid-line family the ray crossed last before the hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance projected onto the view axis, free of fisheye.
    pub perp_dist: f64,
    pub side: Side,
    /// Cell that stopped the ray. May lie outside the grid.
    pub cell: [i64; 2],
    /// DDA iterations taken.
    pub steps: usize,
}

/// One vertical wall slice for a screen column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stripe {
    pub x: usize,
    pub top: usize,
    pub bottom: usize, // inclusive
    pub side: Side,
}

/// Walks the grid from `origin` along `ray` until a wall or the grid edge.
///
/// Zero ray components get an infinite step distance, so that axis never
/// wins the comparison. Leaving the grid counts as a hit, which bounds the
/// walk to `width + height` steps.
pub fn cast_ray(map: &GridMap, origin: [f64; 2], ray: [f64; 2]) -> RayHit {
    let mut map_x = origin[0].floor() as i64;
    let mut map_y = origin[1].floor() as i64;

    let delta_x = if ray[0] == 0.0 { f64::INFINITY } else { (1.0 / ray[0]).abs() };
    let delta_y = if ray[1] == 0.0 { f64::INFINITY } else { (1.0 / ray[1]).abs() };

    let (step_x, mut side_x) = if ray[0] == 0.0 {
        (1, f64::INFINITY)
    } else if ray[0] < 0.0 {
        (-1, (origin[0] - map_x as f64) * delta_x)
    } else {
        (1, (map_x as f64 + 1.0 - origin[0]) * delta_x)
    };
    let (step_y, mut side_y) = if ray[1] == 0.0 {
        (1, f64::INFINITY)
    } else if ray[1] < 0.0 {
        (-1, (origin[1] - map_y as f64) * delta_y)
    } else {
        (1, (map_y as f64 + 1.0 - origin[1]) * delta_y)
    };

    let mut steps = 0;
    let side = loop {
        let side = if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            Side::X
        } else {
            side_y += delta_y;
            map_y += step_y;
            Side::Y
        };
        steps += 1;

        // Out-of-bounds reads as wall, so this also stops at the grid edge.
        if map.is_wall(map_x, map_y) {
            break side;
        }
    };

    let perp_dist = match side {
        Side::X => (map_x as f64 - origin[0] + (1 - step_x) as f64 / 2.0) / ray[0],
        Side::Y => (map_y as f64 - origin[1] + (1 - step_y) as f64 / 2.0) / ray[1],
    };

    RayHit {
        perp_dist,
        side,
        cell: [map_x, map_y],
        steps,
    }
}

#[inline]
pub fn cast_column(map: &GridMap, camera: &Camera, column: usize, width: usize) -> RayHit {
    cast_ray(map, camera.pos, camera.ray_dir(column, width))
}

/// Projected wall height in pixels for a distance. Degenerate distances
/// fill the whole column.
#[inline]
pub fn line_height(perp_dist: f64, height: usize) -> i64 {
    if !(perp_dist > 0.0) {
        return height as i64;
    }
    (height as f64 / perp_dist).floor() as i64
}

/// Vertical extent `[top, bottom]` of a slice centred on the screen's middle
/// row, clamped to the viewport.
pub fn stripe_extent(perp_dist: f64, height: usize) -> (usize, usize) {
    let h = height as i64;
    let line = line_height(perp_dist, height);
    let top = (h / 2 - line / 2).clamp(0, h - 1);
    let bottom = (h / 2 + line / 2).clamp(0, h - 1);
    (top as usize, bottom as usize)
}

/// Casts every column, recording depths and handing each stripe to `draw`.
pub fn cast_walls<F>(
    map: &GridMap,
    camera: &Camera,
    width: usize,
    height: usize,
    depth: &mut DepthBuffer,
    mut draw: F,
) where
    F: FnMut(Stripe),
{
    depth.reset(width);
    if height == 0 {
        return;
    }

    for x in 0..width {
        let hit = cast_column(map, camera, x, width);
        depth.set(x, hit.perp_dist);

        let (top, bottom) = stripe_extent(hit.perp_dist, height);
        draw(Stripe {
            x,
            top,
            bottom,
            side: hit.side,
        });
    }
}
