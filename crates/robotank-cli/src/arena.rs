//! The sample arena: hunters against roaming and static targets.

use planar::Point;
use robotank_core::{Scene, SceneError, TankSpec};

use crate::hunter::Hunter;

const HUNTERS: usize = 5;
const ROAMERS: usize = 7;
const ARMED_ROAMERS: usize = 3;

/// Spawns the sample line-up into `scene`. Returns the number of tanks added.
pub fn populate(scene: &mut Scene) -> Result<usize, SceneError> {
    for _ in 0..HUNTERS {
        scene.spawn_tank(TankSpec::default(), Hunter::new())?;
    }
    for _ in 0..ROAMERS {
        scene.spawn_target(TankSpec::default(), false)?;
    }
    for _ in 0..ARMED_ROAMERS {
        scene.spawn_target(TankSpec::default(), true)?;
    }
    scene.spawn_static_target(TankSpec::default().at(Point::new(20.0, 20.0)).facing(90.0), false)?;
    scene.spawn_static_target(TankSpec::default().at(Point::new(620.0, 460.0)).facing(-90.0), true)?;

    Ok(HUNTERS + ROAMERS + ARMED_ROAMERS + 2)
}
