/// Nearest wall distance per screen column.
pub struct DepthBuffer(Vec<f32>);

impl DepthBuffer {
    pub fn new(width: usize, far: f32) -> Self {
        Self(vec![far; width])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn resize(&mut self, width: usize, far: f32) {
        self.0.resize(width, far);
    }

    /// Resets every column to `far`; the length never changes.
    pub fn reset(&mut self, far: f32) {
        self.0.fill(far);
    }

    #[inline]
    pub fn set(&mut self, col: usize, depth: f32) {
        if let Some(d) = self.0.get_mut(col) {
            *d = depth;
        }
    }

    #[inline]
    pub fn get(&self, col: usize) -> f32 {
        self.0.get(col).copied().unwrap_or(0.0)
    }

    /// True when something at `depth` in column `col` sits behind the wall.
    /// Columns outside the buffer count as occluded.
    #[inline]
    pub fn occludes(&self, col: usize, depth: f32) -> bool {
        depth >= self.get(col)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occlusion_is_strict_for_nearer_objects() {
        let mut db = DepthBuffer::new(4, 20.0);
        db.set(1, 3.0);
        assert!(db.occludes(1, 3.0));
        assert!(db.occludes(1, 5.0));
        assert!(!db.occludes(1, 2.9));
        assert!(db.occludes(9, 0.1));
        db.reset(20.0);
        assert_eq!(db.len(), 4);
        assert_eq!(db.get(1), 20.0);
    }
}
