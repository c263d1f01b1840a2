//! Grid world with signalled intersections and dummy traffic

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use smartcab_core::{
    Action, Direction, Environment, Heading, Light, Location, Percept, Pose, Result, Reward,
    SmartcabError, TrialOutcome,
};

use crate::planner::plan_waypoint;

const LIGHT_PERIODS: [u64; 3] = [3, 4, 5];
const DEADLINE_PER_BLOCK: i32 = 5;
const MIN_TRIP_DISTANCE: i32 = 4;
const DESTINATION_BONUS: Reward = 10.0;
const MAX_INTERSECTIONS: i32 = 10_000;
const MAX_DUMMY_AGENTS: usize = 1_000;

/// World layout and trial rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Intersections along x
    pub width: i32,
    /// Intersections along y
    pub height: i32,
    /// Number of background vehicles
    pub dummy_agents: usize,
    /// End the trial as a failure once the deadline runs out
    pub enforce_deadline: bool,
    /// Deadline value at which the trial is aborted regardless
    pub hard_time_limit: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 6,
            dummy_agents: 3,
            enforce_deadline: true,
            hard_time_limit: -100,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width < 2 || self.height < 2 {
            return Err(SmartcabError::Config(format!(
                "grid must be at least 2x2, got {}x{}",
                self.width, self.height
            )));
        }
        match self.width.checked_mul(self.height) {
            Some(cells) if cells <= MAX_INTERSECTIONS => {}
            _ => {
                return Err(SmartcabError::Config(format!(
                    "grid may have at most {MAX_INTERSECTIONS} intersections, got {}x{}",
                    self.width, self.height
                )))
            }
        }
        if self.dummy_agents > MAX_DUMMY_AGENTS {
            return Err(SmartcabError::Config(format!(
                "at most {MAX_DUMMY_AGENTS} dummy agents are supported, got {}",
                self.dummy_agents
            )));
        }
        if self.hard_time_limit > 0 {
            return Err(SmartcabError::Config(format!(
                "hard_time_limit must not be positive, got {}",
                self.hard_time_limit
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct TrafficLight {
    /// North/south traffic has green
    vertical_green: bool,
    period: u64,
    last_switch: u64,
}

impl TrafficLight {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            vertical_green: rng.gen(),
            period: LIGHT_PERIODS[rng.gen_range(0..LIGHT_PERIODS.len())],
            last_switch: 0,
        }
    }

    fn update(&mut self, t: u64) {
        if t - self.last_switch >= self.period {
            self.vertical_green = !self.vertical_green;
            self.last_switch = t;
        }
    }

    fn color_for(&self, heading: Heading) -> Light {
        if self.vertical_green == heading.is_vertical() {
            Light::Green
        } else {
            Light::Red
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Vehicle {
    pose: Pose,
    intent: Action,
}

/// Reference [`Environment`] implementation
#[derive(Debug, Clone)]
pub struct GridWorld {
    config: WorldConfig,
    rng: StdRng,
    lights: Vec<TrafficLight>,
    dummies: Vec<Vehicle>,
    primary: Pose,
    destination: Location,
    deadline: i32,
    t: u64,
    outcome: Option<TrialOutcome>,
}

impl GridWorld {
    /// Build a world whose randomness is fully determined by `seed`
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        // Bounded by validate()
        let cells = (config.width * config.height) as usize;
        let lights = (0..cells).map(|_| TrafficLight::random(&mut rng)).collect();
        let origin = Pose::new(Location::new(1, 1), Heading::East);

        let mut world = Self {
            config,
            rng,
            lights,
            dummies: Vec::new(),
            primary: origin,
            destination: origin.location,
            deadline: 0,
            t: 0,
            outcome: None,
        };
        let dummies = (0..world.config.dummy_agents)
            .map(|_| world.random_vehicle())
            .collect();
        world.dummies = dummies;
        Ok(world)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn destination(&self) -> Location {
        self.destination
    }

    /// Ticks since the current trial started
    pub fn time(&self) -> u64 {
        self.t
    }

    fn random_location(&mut self) -> Location {
        Location::new(
            self.rng.gen_range(1..=self.config.width),
            self.rng.gen_range(1..=self.config.height),
        )
    }

    fn random_heading(&mut self) -> Heading {
        Heading::ALL[self.rng.gen_range(0..Heading::ALL.len())]
    }

    fn random_intent(&mut self) -> Action {
        Action::from(Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())])
    }

    fn random_vehicle(&mut self) -> Vehicle {
        let location = self.random_location();
        let heading = self.random_heading();
        Vehicle {
            pose: Pose::new(location, heading),
            intent: self.random_intent(),
        }
    }

    fn light_at(&self, location: Location) -> &TrafficLight {
        let index = (location.y - 1) * self.config.width + (location.x - 1);
        &self.lights[index as usize]
    }

    /// What the primary agent intends to do, as seen by others
    fn primary_intent(&self) -> Action {
        plan_waypoint(self.primary, self.destination).map_or(Action::None, Action::from)
    }

    /// Percept for a vehicle at `pose`; `skip` is the dummy doing the sensing
    fn sense_from(&self, pose: Pose, skip: Option<usize>) -> Percept {
        let mut percept = Percept::clear(self.light_at(pose.location).color_for(pose.heading));

        let primary = (skip.is_some()).then_some(Vehicle {
            pose: self.primary,
            intent: self.primary_intent(),
        });
        let others = self
            .dummies
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, v)| *v)
            .chain(primary);

        for other in others {
            if other.pose.location != pose.location || other.pose.heading == pose.heading {
                continue;
            }
            if other.pose.heading == pose.heading.opposite() {
                if percept.oncoming != Action::Left {
                    percept.oncoming = other.intent;
                }
            } else if other.pose.heading == pose.heading.turn_left() {
                // Heading to our left means it comes from our right
                if !matches!(percept.right, Action::Forward | Action::Left) {
                    percept.right = other.intent;
                }
            } else if percept.left != Action::Forward {
                percept.left = other.intent;
            }
        }
        percept
    }

    /// Pose after taking `action`, wrapping around the grid edges
    fn advance(&self, pose: Pose, action: Action) -> Pose {
        let heading = match action {
            Action::None => return pose,
            Action::Forward => pose.heading,
            Action::Left => pose.heading.turn_left(),
            Action::Right => pose.heading.turn_right(),
        };
        let (dx, dy) = heading.delta();
        let x = (pose.location.x + dx - 1).rem_euclid(self.config.width) + 1;
        let y = (pose.location.y + dy - 1).rem_euclid(self.config.height) + 1;
        Pose::new(Location::new(x, y), heading)
    }
}

impl Environment for GridWorld {
    fn reset(&mut self) -> Location {
        self.t = 0;
        self.outcome = None;

        for i in 0..self.lights.len() {
            self.lights[i] = TrafficLight::random(&mut self.rng);
        }
        for i in 0..self.dummies.len() {
            self.dummies[i] = self.random_vehicle();
        }

        let min_distance = MIN_TRIP_DISTANCE.min(self.config.width + self.config.height - 2);
        let (start, destination) = loop {
            let start = self.random_location();
            let destination = self.random_location();
            if start.distance(destination) >= min_distance {
                break (start, destination);
            }
        };

        let heading = self.random_heading();
        self.primary = Pose::new(start, heading);
        self.destination = destination;
        self.deadline = start.distance(destination) * DEADLINE_PER_BLOCK;

        debug!(
            %start,
            %destination,
            deadline = self.deadline,
            "Environment.reset(): trial set up"
        );
        destination
    }

    fn step(&mut self) {
        self.t += 1;
        let t = self.t;
        for light in &mut self.lights {
            light.update(t);
        }

        for i in 0..self.dummies.len() {
            let vehicle = self.dummies[i];
            let percept = self.sense_from(vehicle.pose, Some(i));
            if percept.permits(vehicle.intent) {
                let pose = self.advance(vehicle.pose, vehicle.intent);
                let intent = self.random_intent();
                self.dummies[i] = Vehicle { pose, intent };
            }
        }
    }

    fn sense(&self) -> Percept {
        self.sense_from(self.primary, None)
    }

    fn deadline(&self) -> i32 {
        self.deadline
    }

    fn act(&mut self, action: Action) -> Reward {
        if self.outcome.is_some() {
            return 0.0;
        }

        let percept = self.sense();
        let waypoint = self.primary_intent();

        let mut reward = match action {
            Action::None => 0.0,
            action if percept.permits(action) => {
                self.primary = self.advance(self.primary, action);
                if action == waypoint {
                    2.0
                } else {
                    -0.5
                }
            }
            _ => -1.0,
        };

        if self.primary.location == self.destination {
            if self.deadline >= 0 {
                reward += DESTINATION_BONUS;
            }
            self.outcome = Some(TrialOutcome::Success);
            debug!(deadline = self.deadline, "Environment.act(): primary agent has reached destination");
            return reward;
        }

        if self.deadline <= self.config.hard_time_limit {
            self.outcome = Some(TrialOutcome::Abort);
            debug!(
                limit = self.config.hard_time_limit,
                "Environment.act(): primary agent hit hard time limit, trial aborted"
            );
        } else if self.config.enforce_deadline && self.deadline <= 0 {
            self.outcome = Some(TrialOutcome::Fail);
            debug!("Environment.act(): primary agent ran out of time");
        }
        self.deadline -= 1;

        reward
    }

    fn pose(&self) -> Pose {
        self.primary
    }

    fn outcome(&self) -> Option<TrialOutcome> {
        self.outcome
    }
}
