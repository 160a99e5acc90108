/// First-person camera on the grid.
///
/// `dir` and `plane` always rotate together so the field of view fixed at
/// construction survives any number of turns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: [f64; 2],   // (x, y) continuous map coordinates
    pub dir: [f64; 2],   // view direction, nominally unit length
    pub plane: [f64; 2], // camera plane, |plane| = tan(fov / 2)
}

impl Camera {
    /// Builds a camera looking along `facing` (radians, counter-clockwise from
    /// +X) with a horizontal field of view of `fov` radians.
    pub fn new(pos: [f64; 2], facing: f64, fov: f64) -> Self {
        let dir = [facing.cos(), facing.sin()];
        let half = (0.5 * fov).tan();
        // Plane is the direction turned -90 degrees: the right edge of the screen.
        let plane = [dir[1] * half, -dir[0] * half];
        Self { pos, dir, plane }
    }

    /// Horizontal field of view in radians, derived from the basis.
    pub fn fov(&self) -> f64 {
        let dir_len = self.dir[0].hypot(self.dir[1]);
        let plane_len = self.plane[0].hypot(self.plane[1]);
        2.0 * (plane_len / dir_len).atan()
    }

    /// Rotates direction and plane by `theta` radians. Positive turns toward the
    /// left edge of the screen.
    pub fn rotate(&mut self, theta: f64) {
        if theta == 0.0 {
            return;
        }
        let (s, c) = theta.sin_cos();
        let [dx, dy] = self.dir;
        let [px, py] = self.plane;
        self.dir = [dx * c - dy * s, dx * s + dy * c];
        self.plane = [px * c - py * s, px * s + py * c];
    }

    /// Determinant of the `[plane, dir]` basis. Zero means the camera is
    /// degenerate and nothing can be projected through it.
    #[inline]
    pub fn basis_determinant(&self) -> f64 {
        self.plane[0] * self.dir[1] - self.dir[0] * self.plane[1]
    }

    /// World-relative point to camera space, returned as `(lateral, depth)`.
    /// `None` when the basis is degenerate.
    #[inline]
    pub fn world_to_camera(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        let det = self.basis_determinant();
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        let sx = p[0] - self.pos[0];
        let sy = p[1] - self.pos[1];
        let lateral = inv_det * (self.dir[1] * sx - self.dir[0] * sy);
        let depth = inv_det * (-self.plane[1] * sx + self.plane[0] * sy);
        Some([lateral, depth])
    }

    /// Ray direction for a screen column.
    #[inline]
    pub fn ray_dir(&self, column: usize, screen_width: usize) -> [f64; 2] {
        let camera_x = 2.0 * column as f64 / screen_width as f64 - 1.0;
        [
            self.dir[0] + self.plane[0] * camera_x,
            self.dir[1] + self.plane[1] * camera_x,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn classic_basis_from_fov() {
        let fov = 2.0 * 0.66f64.atan();
        let cam = Camera::new([8.0, 8.0], PI, fov);
        assert!((cam.dir[0] + 1.0).abs() < 1e-12);
        assert!(cam.dir[1].abs() < 1e-12);
        assert!(cam.plane[0].abs() < 1e-12);
        assert!((cam.plane[1] - 0.66).abs() < 1e-12);
        assert!((cam.fov() - fov).abs() < 1e-12);
    }

    #[test]
    fn point_ahead_projects_to_center() {
        let cam = Camera::new([2.0, 2.0], 0.0, PI / 2.0);
        let [lateral, depth] = cam.world_to_camera([5.0, 2.0]).unwrap();
        assert!(lateral.abs() < 1e-12);
        assert!((depth - 3.0).abs() < 1e-12);
    }

    #[test]
    fn right_column_ray_matches_plane_side() {
        let cam = Camera::new([2.0, 2.0], 0.0, PI / 2.0);
        let right = cam.ray_dir(100, 100);
        let point = [cam.pos[0] + right[0], cam.pos[1] + right[1]];
        let [lateral, depth] = cam.world_to_camera(point).unwrap();
        assert!((lateral / depth - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_basis_is_rejected() {
        let mut cam = Camera::new([1.0, 1.0], 0.0, 1.0);
        cam.plane = cam.dir;
        assert!(cam.world_to_camera([3.0, 1.0]).is_none());
    }
}
