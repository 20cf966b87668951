//! The `SpatialEnvironment` trait — the floor as seen by the simulator.

use ped_core::{AgentState, CellId, Vec2};

use crate::{BarrierProximity, Contact, Region};

/// Queryable floor geometry.
///
/// The integrator, the visual trigger detector and the event-capture driver
/// consume a floor exclusively through this trait.  Implementations are
/// queried synchronously from the single simulation thread.
pub trait SpatialEnvironment {
    /// The grid cell containing `location`, or `None` off the grid.
    ///
    /// Returns cells that are outside the walkable field too; use
    /// [`field_cells`](Self::field_cells) to know which cells count.
    fn cell_at(&self, location: Vec2) -> Option<CellId>;

    /// All walkable cells.  Drivers pre-seed per-cell maps from this list.
    fn field_cells(&self) -> Vec<CellId>;

    /// Distance and outward normal of the barrier nearest to `location`.
    ///
    /// `None` means the floor has no barrier geometry at all.
    fn nearest_barrier(&self, location: Vec2) -> Option<BarrierProximity>;

    /// The first instant along the straight move `old → new` at which the
    /// agent centre comes within `half_body_size` of a barrier.
    ///
    /// `tolerance` absorbs rounding at the ends of the move.
    fn segment_collision(
        &self,
        old:            &AgentState,
        new:            &AgentState,
        half_body_size: f64,
        tolerance:      f64,
    ) -> Option<Contact>;

    /// `true` when some cell of `region` lies inside the agent's field of
    /// view: within the cone of `cosine_half_angle` around its facing
    /// direction and not hidden behind a barrier.
    fn field_of_view(&self, state: &AgentState, cosine_half_angle: f64, region: &Region) -> bool;

    /// `true` when some cell of `region` is visible from `location` in any
    /// direction.
    ///
    /// Default: never visible.
    fn visible_from(&self, _location: Vec2, _region: &Region) -> bool {
        false
    }

    /// Value of the named scalar data field at `cell`.
    ///
    /// Default: no data fields.
    fn field_value(&self, _field: &str, _cell: CellId) -> Option<f64> {
        None
    }
}
