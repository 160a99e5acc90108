/// Per-column perpendicular wall distance for one frame.
///
/// Filled by the wall pass, read by the sprite pass, then overwritten by the
/// next frame. The allocation is reused as long as the viewport width holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthBuffer {
    columns: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(width: usize) -> Self {
        Self {
            columns: vec![f64::INFINITY; width],
        }
    }

    /// Starts a frame: every column is "no wall".
    pub fn reset(&mut self, width: usize) {
        self.columns.clear();
        self.columns.resize(width, f64::INFINITY);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn set(&mut self, column: usize, dist: f64) {
        if let Some(slot) = self.columns.get_mut(column) {
            *slot = dist;
        }
    }

    /// Wall distance at `column`; off-screen columns read as distance 0 so
    /// nothing passes the depth test there.
    #[inline]
    pub fn get(&self, column: usize) -> f64 {
        self.columns.get(column).copied().unwrap_or(0.0)
    }

    /// True when something at `depth` is in front of the wall at `column`.
    #[inline]
    pub fn is_visible(&self, column: usize, depth: f64) -> bool {
        depth < self.get(column)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.columns
    }

    /// Fills every column with one distance. Handy for synthetic scenes.
    pub fn fill(&mut self, dist: f64) {
        self.columns.fill(dist);
    }
}
