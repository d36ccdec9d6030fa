//! Per-elevator motion state machine.
//!
//! Each elevator keeps two stop queues: floors to visit on the way up
//! (scanned ascending) and floors to visit on the way down (scanned
//! descending). A sweep in one direction is finished before the elevator
//! turns around.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::models::{Direction, ElevatorStatus, FloorRange};

/// Ticks an elevator stays busy after moving one floor or stopping.
pub const COOLDOWN_TICKS: u32 = 1;

#[derive(Clone, Debug)]
pub struct Elevator {
    id: usize,
    current_floor: i32,
    direction: Direction,
    status: ElevatorStatus,
    stops_up: BTreeSet<i32>,
    stops_down: BTreeSet<i32>,
    cooldown_ticks: u32,
    range: FloorRange,
}

impl Elevator {
    /// Creates an idle elevator parked on the lowest floor.
    pub fn new(id: usize, range: FloorRange) -> Self {
        Self::at_floor(id, range.min, range)
    }

    pub fn at_floor(id: usize, floor: i32, range: FloorRange) -> Self {
        Self {
            id,
            current_floor: floor.clamp(range.min, range.max),
            direction: Direction::None,
            status: ElevatorStatus::Idle,
            stops_up: BTreeSet::new(),
            stops_down: BTreeSet::new(),
            cooldown_ticks: 0,
            range,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn current_floor(&self) -> i32 {
        self.current_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn status(&self) -> ElevatorStatus {
        self.status
    }

    pub fn cooldown_ticks(&self) -> u32 {
        self.cooldown_ticks
    }

    pub fn is_idle(&self) -> bool {
        self.status == ElevatorStatus::Idle
    }

    pub fn stops_up(&self) -> impl Iterator<Item = i32> + '_ {
        self.stops_up.iter().copied()
    }

    pub fn stops_down(&self) -> impl Iterator<Item = i32> + '_ {
        self.stops_down.iter().rev().copied()
    }

    pub fn has_stops(&self) -> bool {
        !self.stops_up.is_empty() || !self.stops_down.is_empty()
    }

    pub fn distance_to(&self, floor: i32) -> u32 {
        self.current_floor.abs_diff(floor)
    }

    /// Queues `floor`. An explicit direction picks the queue; `None` picks it
    /// from the floor's position relative to the car. Waking an idle car
    /// points it at the new floor.
    pub fn add_stop(&mut self, floor: i32, direction: Direction) {
        if floor == self.current_floor {
            return;
        }

        let goes_up = match direction {
            Direction::Up => true,
            Direction::Down => false,
            Direction::None => floor > self.current_floor,
        };
        if goes_up {
            self.stops_up.insert(floor);
        } else {
            self.stops_down.insert(floor);
        }

        if self.direction == Direction::None {
            self.direction = if floor > self.current_floor {
                Direction::Up
            } else {
                Direction::Down
            };
        }
    }

    pub fn tick(&mut self) {
        if self.cooldown_ticks > 0 {
            self.cooldown_ticks -= 1;
            return;
        }

        if self.direction == Direction::None {
            self.status = ElevatorStatus::Idle;
            return;
        }

        // The shaft-end checks in update_direction keep a moving car in range.
        debug_assert!(self.range.contains(self.current_floor + self.direction.step()));

        self.status = ElevatorStatus::Moving;
        self.current_floor += self.direction.step();
        self.cooldown_ticks = COOLDOWN_TICKS;

        let arrived = match self.direction {
            Direction::Up => self.stops_up.remove(&self.current_floor),
            Direction::Down => self.stops_down.remove(&self.current_floor),
            Direction::None => false,
        };
        if arrived {
            self.status = ElevatorStatus::Stopped;
            self.cooldown_ticks = COOLDOWN_TICKS;
        }

        self.update_direction();
    }

    fn update_direction(&mut self) {
        if !self.has_stops() {
            self.direction = Direction::None;
            self.status = ElevatorStatus::Idle;
            return;
        }

        match self.direction {
            Direction::Up
                if self.stops_up.is_empty() || self.current_floor == self.range.max =>
            {
                self.direction = Direction::Down;
            }
            Direction::Down
                if self.stops_down.is_empty() || self.current_floor == self.range.min =>
            {
                self.direction = Direction::Up;
            }
            _ => {}
        }
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            id: self.id,
            floor: self.current_floor,
            direction: self.direction,
            stops_up: self.stops_up().collect(),
            stops_down: self.stops_down().collect(),
            status: self.status,
        }
    }

    pub fn status_line(&self) -> String {
        self.snapshot().to_string()
    }
}

/// Read-only view of an elevator at the end of a tick.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ElevatorSnapshot {
    pub id: usize,
    pub floor: i32,
    pub direction: Direction,
    pub stops_up: Vec<i32>,
    pub stops_down: Vec<i32>,
    pub status: ElevatorStatus,
}

impl fmt::Display for ElevatorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "E{}: Floor {} {} | Up:[{}] Down:[{}] Status:{}",
            self.id,
            self.floor,
            self.direction,
            join_floors(&self.stops_up),
            join_floors(&self.stops_down),
            self.status
        )
    }
}

fn join_floors(floors: &[i32]) -> String {
    floors
        .iter()
        .map(|floor| floor.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
