use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

pub const DEFAULT_ELEVATORS: usize = 4;
pub const DEFAULT_MIN_FLOOR: i32 = 1;
pub const DEFAULT_MAX_FLOOR: i32 = 10;
pub const DEFAULT_LOOP_INTERVAL_MS: u64 = 4_000;
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 5_000;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    /// Fleet size. Zero means "not configured" and resolves to the default.
    #[serde(default)]
    pub elevators_quantity: usize,
    #[serde(default = "default_min_floor")]
    pub min_floor: i32,
    #[serde(default = "default_max_floor")]
    pub max_floor: i32,
    #[serde(default = "default_loop_interval")]
    pub loop_interval_milliseconds: u64,
    #[serde(default)]
    pub random_request_service: RandomRequestConfig,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RandomRequestConfig {
    #[serde(default = "default_request_interval")]
    pub interval_milliseconds: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            elevators_quantity: DEFAULT_ELEVATORS,
            min_floor: DEFAULT_MIN_FLOOR,
            max_floor: DEFAULT_MAX_FLOOR,
            loop_interval_milliseconds: DEFAULT_LOOP_INTERVAL_MS,
            random_request_service: RandomRequestConfig::default(),
            seed: None,
        }
    }
}

impl Default for RandomRequestConfig {
    fn default() -> Self {
        Self {
            interval_milliseconds: DEFAULT_REQUEST_INTERVAL_MS,
            enabled: true,
        }
    }
}

impl SimConfig {
    pub fn floor_range(&self) -> Result<FloorRange> {
        FloorRange::new(self.min_floor, self.max_floor)
    }
}

fn default_min_floor() -> i32 {
    DEFAULT_MIN_FLOOR
}

fn default_max_floor() -> i32 {
    DEFAULT_MAX_FLOOR
}

fn default_loop_interval() -> u64 {
    DEFAULT_LOOP_INTERVAL_MS
}

fn default_request_interval() -> u64 {
    DEFAULT_REQUEST_INTERVAL_MS
}

fn default_enabled() -> bool {
    true
}

/// Inclusive range of floors served by the building.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct FloorRange {
    pub min: i32,
    pub max: i32,
}

impl FloorRange {
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if min >= max {
            return Err(Error::InvalidFloorRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, floor: i32) -> bool {
        floor >= self.min && floor <= self.max
    }

    pub fn check(&self, floor: i32) -> Result<i32> {
        if self.contains(floor) {
            Ok(floor)
        } else {
            Err(Error::FloorOutOfRange {
                floor,
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for FloorRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_FLOOR,
            max: DEFAULT_MAX_FLOOR,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    None,
}

impl Direction {
    pub fn between(from: i32, to: i32) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::None,
        }
    }

    pub fn step(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::None => 0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::None => "NONE",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElevatorStatus {
    Idle,
    Moving,
    Stopped,
}

impl fmt::Display for ElevatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ElevatorStatus::Idle => "IDLE",
            ElevatorStatus::Moving => "MOVING",
            ElevatorStatus::Stopped => "STOPPED",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Assigned,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Assigned => "ASSIGNED",
        };
        write!(f, "{}", label)
    }
}
