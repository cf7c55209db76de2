//! CPU-side terrain geometry.
//!
//! The grid is a subdivided plane in its local XY plane; the local Z component is
//! the height that the animator rewrites every tick. X and Y never change after
//! construction.

/// Live vertex grid plus its wireframe topology.
///
/// Contract:
/// - `positions[i]` is `[x, y, height]` in plane-local space.
/// - `line_indices` is a line list over `positions` covering every triangle edge once.
/// - `dirty` is set whenever heights change and cleared by whoever uploads the buffer.
#[derive(Debug, Clone)]
pub struct VertexGrid {
    positions: Vec<[f32; 3]>,
    line_indices: Vec<u32>,
    segments: (u32, u32),
    dirty: bool,
}

impl VertexGrid {
    /// Subdivided plane centered at the origin.
    ///
    /// Rows run from `+height/2` down to `-height/2`, columns from `-width/2` to
    /// `+width/2`, so vertex `(ix, iy)` lives at index `iy * (segments_x + 1) + ix`.
    pub fn plane(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let cols = segments_x + 1;
        let rows = segments_y + 1;
        let seg_w = width / segments_x as f32;
        let seg_h = height / segments_y as f32;

        let mut positions = Vec::with_capacity(cols as usize * rows as usize);
        for iy in 0..rows {
            let y = iy as f32 * seg_h - half_h;
            for ix in 0..cols {
                let x = ix as f32 * seg_w - half_w;
                positions.push([x, -y, 0.0]);
            }
        }

        let (sx, sy) = (segments_x as usize, segments_y as usize);
        let mut line_indices = Vec::with_capacity(2 * (3 * sx * sy + sx + sy));
        for iy in 0..segments_y {
            for ix in 0..segments_x {
                // a--d
                // | /|
                // b--c
                let a = ix + cols * iy;
                let b = ix + cols * (iy + 1);
                let c = (ix + 1) + cols * (iy + 1);
                let d = (ix + 1) + cols * iy;

                line_indices.extend_from_slice(&[a, d, a, b, b, d]);
                if ix + 1 == segments_x {
                    line_indices.extend_from_slice(&[d, c]);
                }
                if iy + 1 == segments_y {
                    line_indices.extend_from_slice(&[b, c]);
                }
            }
        }

        Self {
            positions,
            line_indices,
            segments: (segments_x, segments_y),
            dirty: true,
        }
    }

    /// Free-form grid without topology. Handy for feeding the animator hand-picked points.
    pub fn from_positions(positions: Vec<[f32; 3]>) -> Self {
        Self {
            positions,
            line_indices: Vec::new(),
            segments: (0, 0),
            dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn segments(&self) -> (u32, u32) {
        self.segments
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn line_indices(&self) -> &[u32] {
        &self.line_indices
    }

    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.positions.iter().map(|p| p[2])
    }

    /// Overwrite every height from `f(index)`, then mark the buffer dirty.
    pub fn write_heights(&mut self, mut f: impl FnMut(usize) -> f32) {
        for (i, p) in self.positions.iter_mut().enumerate() {
            p[2] = f(i);
        }
        self.dirty = true;
    }

    /// Returns whether the buffer was dirty and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// Immutable snapshot of the grid's undisplaced positions.
///
/// There is deliberately no mutable accessor: every tick reads from here, never
/// from the previous frame's heights.
#[derive(Debug, Clone, PartialEq)]
pub struct BasePositions {
    positions: Box<[[f32; 3]]>,
}

impl BasePositions {
    pub fn capture(grid: &VertexGrid) -> Self {
        Self {
            positions: grid.positions().into(),
        }
    }

    pub fn as_slice(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Axis-aligned (min, max) over all snapshot positions, or `None` for an empty grid.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
            for k in 0..3 {
                lo[k] = lo[k].min(p[k]);
                hi[k] = hi[k].max(p[k]);
            }
            (lo, hi)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn plane_60x60_has_3721_vertices() {
        let grid = VertexGrid::plane(100.0, 100.0, 60, 60);
        assert_eq!(grid.len(), 3721);
        assert_eq!(grid.segments(), (60, 60));
    }

    #[test]
    fn plane_vertices_start_top_left_and_end_bottom_right() {
        let grid = VertexGrid::plane(100.0, 100.0, 60, 60);
        assert_eq!(grid.positions()[0], [-50.0, 50.0, 0.0]);
        let last = grid.positions()[grid.len() - 1];
        assert!((last[0] - 50.0).abs() < 1e-4);
        assert!((last[1] + 50.0).abs() < 1e-4);
        assert_eq!(last[2], 0.0);
    }

    #[test]
    fn plane_row_major_indexing() {
        let grid = VertexGrid::plane(4.0, 2.0, 4, 2);
        // (ix=3, iy=1) -> index 1 * 5 + 3
        let p = grid.positions()[8];
        assert_eq!(p, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn wireframe_covers_each_edge_once() {
        let (sx, sy) = (5u32, 3u32);
        let grid = VertexGrid::plane(10.0, 6.0, sx, sy);
        let lines = grid.line_indices();
        assert_eq!(lines.len() % 2, 0);

        let edges: Vec<(u32, u32)> = lines
            .chunks_exact(2)
            .map(|e| (e[0].min(e[1]), e[0].max(e[1])))
            .collect();
        let unique: HashSet<_> = edges.iter().copied().collect();

        assert_eq!(edges.len(), unique.len());
        assert_eq!(edges.len() as u32, 3 * sx * sy + sx + sy);
        assert!(lines.iter().all(|&i| (i as usize) < grid.len()));
    }

    #[test]
    fn single_cell_edges_match_triangle_split() {
        let grid = VertexGrid::plane(1.0, 1.0, 1, 1);
        let edges: HashSet<(u32, u32)> = grid
            .line_indices()
            .chunks_exact(2)
            .map(|e| (e[0].min(e[1]), e[0].max(e[1])))
            .collect();
        // a=0, d=1, b=2, c=3; diagonal is b-d.
        let expected: HashSet<(u32, u32)> =
            [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)].into_iter().collect();
        assert_eq!(edges, expected);
    }

    #[test]
    fn write_heights_marks_dirty_and_take_clears() {
        let mut grid = VertexGrid::from_positions(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert!(grid.take_dirty());
        assert!(!grid.take_dirty());

        grid.write_heights(|i| i as f32 * 2.0);
        assert_eq!(grid.heights().collect::<Vec<_>>(), vec![0.0, 2.0]);
        assert!(grid.take_dirty());
        assert!(!grid.take_dirty());
    }

    #[test]
    fn snapshot_is_independent_of_later_writes() {
        let mut grid = VertexGrid::plane(2.0, 2.0, 2, 2);
        let base = BasePositions::capture(&grid);
        grid.write_heights(|_| 7.0);

        assert_eq!(base.as_slice().len(), grid.len());
        assert!(base.as_slice().iter().all(|p| p[2] == 0.0));
    }

    #[test]
    fn bounds_of_plane() {
        let grid = VertexGrid::plane(100.0, 40.0, 10, 4);
        let (lo, hi) = BasePositions::capture(&grid).bounds().unwrap();
        assert_eq!(lo, [-50.0, -20.0, 0.0]);
        assert_eq!(hi, [50.0, 20.0, 0.0]);
        assert!(BasePositions::capture(&VertexGrid::from_positions(vec![])).bounds().is_none());
    }
}
