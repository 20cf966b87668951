//! The synthetic office floor and its activities.
//!
//! ```text
//!  y=10 ┌──────┬─────────────────────────────────────┐
//!       │cabin.│          meeting        kitchen    │
//!       │      │                                     │
//!       │ desk_b                                     │
//!       │                                       door │
//!       │                                            │
//!       │ desk_a                    │                │
//!       │              printer      │                │
//!  y=0  └───────────────────────────┴────────────────┘
//!      x=0                         x=11             x=16
//! ```

use std::sync::Arc;

use anyhow::Result;

use ped_core::{Pose, Vec2};
use ped_scenario::{Activity, EngagementBounds, ScenarioBuilder};
use ped_spatial::{GridFloor, GridFloorBuilder, RadialField, SpatialEnvironment};

pub const WIDTH:     f64 = 16.0;
pub const HEIGHT:    f64 = 10.0;
pub const CELL_SIZE: f64 = 0.5;

/// Radius of every activity's origin region.
const ORIGIN_RADIUS: f64 = 0.5;

pub const KITCHEN: Vec2 = Vec2 { x: 13.5, y: 8.0 };
pub const DOOR:    Vec2 = Vec2 { x: 15.0, y: 5.0 };

/// Walls, the cabinet in the top-left corner, and a `noise` data field that
/// falls off linearly with distance from the kitchen.
pub fn build_floor() -> Result<GridFloor> {
    let mut b = GridFloorBuilder::new(WIDTH, HEIGHT, CELL_SIZE);
    b.add_wall(Vec2::new(11.0, 0.0), Vec2::new(11.0, 3.0));
    b.add_obstacle(Vec2::new(0.0, 9.0), Vec2::new(2.0, 10.0));
    let mut floor = b.build()?;

    for cell in floor.field_cells() {
        let db = 60.0 - 3.0 * floor.cell_center(cell).distance(KITCHEN);
        floor.set_field_value("noise", cell, db.max(30.0))?;
    }
    Ok(floor)
}

fn activity(name: &str, at: Vec2, facing: Vec2, min_secs: f64, max_secs: f64) -> Result<Activity> {
    Ok(Activity::new(
        name,
        Pose::new(at, facing),
        EngagementBounds::new(min_secs, max_secs)?,
        Arc::new(RadialField::new(at, ORIGIN_RADIUS)),
    ))
}

/// Two desks as main stations plus the shared facilities.
pub fn register_activities(b: &mut ScenarioBuilder) -> Result<()> {
    b.add_main_station(activity("desk_a", Vec2::new(3.0, 3.0), Vec2::new(0.0, 1.0), 60.0, 300.0)?)?;
    b.add_main_station(activity("desk_b", Vec2::new(3.0, 7.0), Vec2::new(0.0, -1.0), 60.0, 300.0)?)?;
    b.add_activity(activity("printer", Vec2::new(8.0, 1.5), Vec2::new(0.0, -1.0), 20.0, 90.0)?)?;
    b.add_activity(activity("kitchen", KITCHEN, Vec2::new(0.0, 1.0), 60.0, 240.0)?)?;
    b.add_activity(activity("meeting", Vec2::new(8.0, 8.5), Vec2::new(0.0, 1.0), 300.0, 900.0)?)?;
    b.add_activity(activity("door", DOOR, Vec2::new(1.0, 0.0), 15.0, 60.0)?)?;
    Ok(())
}
