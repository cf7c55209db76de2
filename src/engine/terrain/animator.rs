use std::f64::consts::TAU;

use crate::engine::terrain::{AnimationClock, BasePositions, VertexGrid};

/// Constants of the rolling-hills wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Spatial frequency applied to base x/y.
    pub frequency: f64,
    pub amplitude: f64,
    /// Clock increment per tick.
    pub time_step: f64,
    /// Rotation about the terrain's vertical axis per tick (radians).
    pub spin_step: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            frequency: 0.2,
            amplitude: 1.5,
            time_step: 0.005,
            spin_step: 0.0005,
        }
    }
}

/// `(sin(f*x + t) + cos(f*y + t)) * a`
#[inline]
pub fn wave_height(params: &WaveParams, x: f64, y: f64, t: f64) -> f64 {
    ((params.frequency * x + t).sin() + (params.frequency * y + t).cos()) * params.amplitude
}

/// Owns the terrain grid and recomputes its heights every tick.
///
/// Contract:
/// - Base positions are captured once in `initialize` and never touched again.
/// - Heights are a pure function of (base x, base y, clock time); the previous
///   frame's heights are never read.
/// - Every tick marks the grid dirty so the host re-uploads it.
#[derive(Debug, Clone)]
pub struct TerrainAnimator {
    grid: VertexGrid,
    base: BasePositions,
    clock: AnimationClock,
    params: WaveParams,
}

impl TerrainAnimator {
    pub fn initialize(grid: VertexGrid, params: WaveParams) -> Self {
        let base = BasePositions::capture(&grid);
        log::debug!(
            "[TerrainAnimator] captured {} base positions (step={}, spin={})",
            base.as_slice().len(),
            params.time_step,
            params.spin_step
        );
        Self {
            grid,
            base,
            clock: AnimationClock::new(params.time_step),
            params,
        }
    }

    /// Advance one frame.
    ///
    /// `_dt_sec` is the host's frame delta. The animation is frame-locked: each
    /// call moves the clock by exactly one `time_step` regardless of it.
    pub fn tick(&mut self, _dt_sec: f32) {
        self.clock.advance();
        self.recompute();
    }

    /// Rewrite all heights for the current clock time without advancing it.
    pub fn recompute(&mut self) {
        let t = self.clock.time();
        let params = self.params;
        let base = &self.base;
        self.grid.write_heights(|i| {
            // Grid and snapshot have the same length by construction.
            let [x, y, _] = base.as_slice()[i];
            wave_height(&params, x as f64, y as f64, t) as f32
        });
    }

    pub fn grid(&self) -> &VertexGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut VertexGrid {
        &mut self.grid
    }

    pub fn base_positions(&self) -> &BasePositions {
        &self.base
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    /// Accumulated spin about the vertical axis, wrapped into `[0, 2π)`.
    pub fn spin(&self) -> f64 {
        (self.clock.ticks() as f64 * self.params.spin_step).rem_euclid(TAU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn three_point_animator() -> TerrainAnimator {
        let grid = VertexGrid::from_positions(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        TerrainAnimator::initialize(grid, WaveParams::default())
    }

    #[test]
    fn three_points_at_time_zero() {
        let mut anim = three_point_animator();
        anim.recompute();

        let h: Vec<f32> = anim.grid().heights().collect();
        assert!((h[0] - 1.5).abs() < EPS, "{h:?}");
        assert!((h[1] - 1.798).abs() < EPS, "{h:?}");
        assert!((h[2] - 1.470).abs() < EPS, "{h:?}");
    }

    #[test]
    fn initialize_leaves_heights_flat_until_first_update() {
        let anim = TerrainAnimator::initialize(VertexGrid::plane(10.0, 10.0, 4, 4), WaveParams::default());
        assert!(anim.grid().heights().all(|h| h == 0.0));
        assert_eq!(anim.time(), 0.0);
    }

    #[test]
    fn tick_advances_clock_and_applies_formula() {
        let mut anim = three_point_animator();
        anim.tick(1.0 / 60.0);

        let t = 0.005f64;
        // vertex 1 sits at (1, 0)
        let expected = 1.5 * ((0.2 + t).sin() + t.cos());
        let h1 = anim.grid().heights().nth(1).unwrap();
        assert_eq!(anim.time(), t);
        assert!((h1 as f64 - expected).abs() < 1e-5, "h1={h1} expected={expected}");
    }

    #[test]
    fn tick_ignores_frame_delta() {
        let mut fast = three_point_animator();
        let mut slow = three_point_animator();
        fast.tick(0.001);
        slow.tick(0.5);
        assert_eq!(fast.time(), slow.time());
        assert_eq!(
            fast.grid().heights().collect::<Vec<_>>(),
            slow.grid().heights().collect::<Vec<_>>()
        );
    }

    #[test]
    fn tick_marks_grid_dirty() {
        let mut anim = three_point_animator();
        anim.grid_mut().take_dirty();
        anim.tick(0.0);
        assert!(anim.grid_mut().take_dirty());
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut anim = TerrainAnimator::initialize(VertexGrid::plane(100.0, 100.0, 60, 60), WaveParams::default());
        for _ in 0..10 {
            anim.tick(0.016);
        }
        let first: Vec<f32> = anim.grid().heights().collect();
        anim.recompute();
        anim.recompute();
        let second: Vec<f32> = anim.grid().heights().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn heights_do_not_accumulate() {
        // Ticking to K then recomputing equals a fresh animator ticked to K.
        let mut a = TerrainAnimator::initialize(VertexGrid::plane(20.0, 20.0, 8, 8), WaveParams::default());
        let mut b = a.clone();
        for _ in 0..50 {
            a.tick(0.0);
        }
        // Corrupt b's live heights; the next tick must not care.
        b.grid_mut().write_heights(|_| 1234.0);
        for _ in 0..50 {
            b.tick(0.0);
        }
        assert_eq!(
            a.grid().heights().collect::<Vec<_>>(),
            b.grid().heights().collect::<Vec<_>>()
        );
    }

    #[test]
    fn spin_wraps_at_two_pi() {
        let params = WaveParams {
            spin_step: 1.0,
            ..WaveParams::default()
        };
        let mut anim = TerrainAnimator::initialize(VertexGrid::from_positions(vec![]), params);
        for _ in 0..7 {
            anim.tick(0.0);
        }
        assert!((anim.spin() - (7.0 - TAU)).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn wave_height_matches_closed_form(x in -50.0f64..50.0, y in -50.0f64..50.0, t in 0.0f64..1000.0) {
            let p = WaveParams::default();
            let h = wave_height(&p, x, y, t);
            let expected = 1.5 * ((0.2 * x + t).sin() + (0.2 * y + t).cos());
            prop_assert!((h - expected).abs() < 1e-12);
            prop_assert_eq!(h, wave_height(&p, x, y, t));
            prop_assert!(h.abs() <= 3.0 + 1e-12);
        }

        #[test]
        fn base_positions_survive_any_number_of_ticks(k in 0usize..200) {
            let mut anim = TerrainAnimator::initialize(VertexGrid::plane(100.0, 100.0, 6, 6), WaveParams::default());
            let before = anim.base_positions().clone();
            for _ in 0..k {
                anim.tick(0.016);
            }
            prop_assert_eq!(&before, anim.base_positions());
            // x/y of the live grid follow the snapshot too.
            for (live, base) in anim.grid().positions().iter().zip(before.as_slice()) {
                prop_assert_eq!(live[0], base[0]);
                prop_assert_eq!(live[1], base[1]);
            }
        }

        #[test]
        fn spin_is_k_times_step_mod_tau(k in 0u64..50_000) {
            let mut anim = TerrainAnimator::initialize(VertexGrid::from_positions(vec![[3.0, 4.0, 0.0]]), WaveParams::default());
            for _ in 0..k {
                anim.tick(0.0);
            }
            let expected = (k as f64 * 0.0005).rem_euclid(TAU);
            prop_assert!((anim.spin() - expected).abs() < 1e-12);
        }
    }
}
