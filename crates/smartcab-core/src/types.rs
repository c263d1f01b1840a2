//! Common types used throughout Smartcab

use serde::{Deserialize, Serialize};

/// Reward value returned by the environment
pub type Reward = f64;

/// Suggested direction from the route planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Left,
    Right,
}

impl Direction {
    /// All waypoint directions in index order
    pub const ALL: [Direction; 3] = [Direction::Forward, Direction::Left, Direction::Right];

    pub fn index(self) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Left => 1,
            Direction::Right => 2,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Traffic light color as seen by the sensing vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Light {
    Red,
    Green,
}

impl Light {
    pub const ALL: [Light; 2] = [Light::Red, Light::Green];

    pub fn index(self) -> usize {
        match self {
            Light::Red => 0,
            Light::Green => 1,
        }
    }
}

impl std::fmt::Display for Light {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Light::Red => write!(f, "red"),
            Light::Green => write!(f, "green"),
        }
    }
}

/// Driving action, also used to report what other vehicles intend to do
///
/// The order of [`Action::ALL`] is the order of every action-value vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    None,
    Forward,
    Left,
    Right,
}

impl Action {
    /// All actions in index order
    pub const ALL: [Action; 4] = [Action::None, Action::Forward, Action::Left, Action::Right];

    /// Number of discrete actions
    pub const COUNT: usize = 4;

    /// Convert action to its position in an action-value vector
    pub fn index(self) -> usize {
        match self {
            Action::None => 0,
            Action::Forward => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Create action from index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Action::Forward,
            Direction::Left => Action::Left,
            Direction::Right => Action::Right,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::None => write!(f, "none"),
            Action::Forward => write!(f, "forward"),
            Action::Left => write!(f, "left"),
            Action::Right => write!(f, "right"),
        }
    }
}

/// Raw sensory input at the current intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Percept {
    pub light: Light,
    pub oncoming: Action,
    pub left: Action,
    pub right: Action,
}

impl Percept {
    /// Percept with no other traffic at the intersection
    pub fn clear(light: Light) -> Self {
        Self {
            light,
            oncoming: Action::None,
            left: Action::None,
            right: Action::None,
        }
    }

    /// Whether the traffic rules allow `action` at this intersection
    pub fn permits(&self, action: Action) -> bool {
        let green = self.light == Light::Green;
        match action {
            Action::None => true,
            Action::Forward => green,
            // Left yields to oncoming traffic unless it is also turning left
            Action::Left => green && matches!(self.oncoming, Action::None | Action::Left),
            // Right on red is allowed unless traffic from the left goes straight
            Action::Right => green || self.left != Action::Forward,
        }
    }
}

/// Compass heading on the grid; y grows southwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    North,
    South,
    East,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::South, Heading::East, Heading::West];

    /// Unit step `(dx, dy)` taken when driving forward
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::South => (0, 1),
            Heading::East => (1, 0),
            Heading::West => (-1, 0),
        }
    }

    pub fn turn_left(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    pub fn turn_right(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    pub fn opposite(self) -> Self {
        self.turn_left().turn_left()
    }

    /// True for north/south headings
    pub fn is_vertical(self) -> bool {
        matches!(self, Heading::North | Heading::South)
    }
}

/// Intersection coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, ignoring wrap-around
    pub fn distance(self, other: Location) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position and heading of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub location: Location,
    pub heading: Heading,
}

impl Pose {
    pub fn new(location: Location, heading: Heading) -> Self {
        Self { location, heading }
    }
}
