//! Rolling-terrain core: the vertex grid, its base-position snapshot, the
//! animation clock and the per-tick height update.

pub mod animator;
pub mod clock;
pub mod grid;

pub use animator::{TerrainAnimator, WaveParams};
pub use clock::AnimationClock;
pub use grid::{BasePositions, VertexGrid};
