//! Route planner for the grid world

use smartcab_core::{Direction, Location, Pose, RoutePlanner};

/// Waypoint toward `destination`, or `None` once there
///
/// East/west distance is closed first, then north/south. Facing away from
/// the target reads as a right turn, which becomes a long U-turn over
/// subsequent waypoints.
pub fn plan_waypoint(pose: Pose, destination: Location) -> Option<Direction> {
    let dx = destination.x - pose.location.x;
    let dy = destination.y - pose.location.y;
    let (hx, hy) = pose.heading.delta();

    if dx == 0 && dy == 0 {
        None
    } else if dx != 0 {
        Some(if dx * hx > 0 {
            Direction::Forward
        } else if dx * hx < 0 || dx * hy <= 0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if dy * hy > 0 {
            Direction::Forward
        } else if dy * hy < 0 || dy * hx > 0 {
            Direction::Right
        } else {
            Direction::Left
        })
    }
}

/// Planner bound to one destination at a time
#[derive(Debug, Clone, Default)]
pub struct GridPlanner {
    destination: Option<Location>,
}

impl GridPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<Location> {
        self.destination
    }
}

impl RoutePlanner for GridPlanner {
    fn route_to(&mut self, destination: Location) {
        self.destination = Some(destination);
    }

    /// At the destination (or with none set) the planner reports `Forward`
    /// so the waypoint always stays inside the encoded state space.
    fn next_waypoint(&self, pose: Pose) -> Direction {
        self.destination
            .and_then(|destination| plan_waypoint(pose, destination))
            .unwrap_or(Direction::Forward)
    }
}
