//! The control loop: the single owner and writer of fleet and request state.

use serde::Serialize;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::dispatch::{Dispatcher, Tier};
use crate::elevator::ElevatorSnapshot;
use crate::error::{Error, Result};
use crate::fleet::Fleet;
use crate::models::Direction;
use crate::request::Request;
use crate::source::RandomRequestGenerator;

#[derive(Clone, Debug, Serialize)]
pub struct AssignmentOutcome {
    pub request_id: String,
    pub source_floor: i32,
    pub destination_floor: i32,
    pub elevator_id: usize,
    pub tier: Tier,
    /// Source equals destination; no stop was queued.
    pub already_at_destination: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub assignments: Vec<AssignmentOutcome>,
    pub elevators: Vec<ElevatorSnapshot>,
    pub pending: usize,
}

pub struct Simulation {
    fleet: Fleet,
    dispatcher: Dispatcher,
    incoming: mpsc::UnboundedReceiver<Request>,
    loop_interval: Duration,
    tick: u64,
}

impl Simulation {
    pub fn new(
        fleet: Fleet,
        dispatcher: Dispatcher,
        incoming: mpsc::UnboundedReceiver<Request>,
        loop_interval: Duration,
    ) -> Result<Self> {
        if loop_interval.is_zero() {
            return Err(Error::InvalidInterval("loop interval"));
        }
        Ok(Self {
            fleet,
            dispatcher,
            incoming,
            loop_interval,
            tick: 0,
        })
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.tick
    }

    /// Runs one iteration: intake, assignment, then a tick of every elevator.
    /// A request that cannot be taken in or assigned is logged and skipped;
    /// the fleet ticks regardless.
    pub fn step(&mut self) -> TickReport {
        self.drain_incoming();
        let assignments = self.assign_pending();
        self.fleet.tick_all();
        self.tick += 1;

        let report = TickReport {
            tick: self.tick,
            assignments,
            elevators: self.fleet.snapshots(),
            pending: self.dispatcher.pending_count(),
        };
        for elevator in &report.elevators {
            debug!("{}", elevator);
        }
        report
    }

    /// Runs `ticks` iterations back to back on a simulated clock. When a
    /// generator is supplied it is polled with `tick * loop_interval` before
    /// each step, after anything already queued on the channel.
    pub fn run_ticks(
        &mut self,
        ticks: u64,
        mut generator: Option<&mut RandomRequestGenerator>,
        mut on_report: impl FnMut(&TickReport),
    ) {
        let interval_ms = self.loop_interval.as_millis() as u64;
        for _ in 0..ticks {
            if let Some(generator) = generator.as_deref_mut() {
                let elapsed_ms = (self.tick + 1) * interval_ms;
                match generator.due(elapsed_ms) {
                    Ok(requests) => {
                        self.drain_incoming();
                        for request in requests {
                            self.admit(request);
                        }
                    }
                    Err(err) => error!("request generation failed: {}", err),
                }
            }
            on_report(&self.step());
        }
    }

    /// Paces `step` on the loop interval until `shutdown` flips to true.
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
        mut on_report: impl FnMut(&TickReport),
    ) {
        info!(
            "simulation loop started: {} elevators, tick every {}ms",
            self.fleet.len(),
            self.loop_interval.as_millis()
        );
        if self.fleet.is_empty() {
            warn!("no elevators in the fleet, requests will stay pending");
        }

        loop {
            if *shutdown.borrow() {
                break;
            }

            on_report(&self.step());

            tokio::select! {
                _ = tokio::time::sleep(self.loop_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(
            "simulation loop stopped after {} ticks ({} requests pending)",
            self.tick,
            self.dispatcher.pending_count()
        );
    }

    fn drain_incoming(&mut self) {
        while let Ok(request) = self.incoming.try_recv() {
            self.admit(request);
        }
    }

    fn admit(&mut self, request: Request) {
        debug!(
            "received request {} ({} -> {})",
            request.id(),
            request.source_floor(),
            request.destination_floor()
        );
        if let Err(err) = self.dispatcher.add_request(request) {
            error!(tick = self.tick + 1, "dropping request: {}", err);
        }
    }

    fn assign_pending(&mut self) -> Vec<AssignmentOutcome> {
        let mut outcomes = Vec::new();
        for idx in self.dispatcher.pending_indices() {
            match self.assign(idx) {
                Ok(Some(outcome)) => outcomes.push(outcome),
                Ok(None) => {}
                Err(err) => error!(tick = self.tick + 1, "assignment failed: {}", err),
            }
        }
        outcomes
    }

    /// Assigns the pending request at ledger index `idx`. Nothing is changed
    /// unless both the request and the chosen elevator can be updated.
    fn assign(&mut self, idx: usize) -> Result<Option<AssignmentOutcome>> {
        let request = self.dispatcher.request(idx)?;
        let Some(selection) = self
            .dispatcher
            .assign_elevator(self.fleet.as_slice(), request)
        else {
            debug!("no elevator available for request {}", request.id());
            return Ok(None);
        };
        let id = request.id().to_string();
        let source = request.source_floor();
        let destination = request.destination_floor();

        let elevator = self.fleet.get_mut(selection.index)?;
        self.dispatcher.request_mut(idx)?.mark_assigned()?;

        let already_at_destination = source == destination;
        if already_at_destination {
            info!(
                "request {} assigned to E{}: already at destination floor {}",
                id, selection.elevator_id, source
            );
        } else {
            elevator.add_stop(source, Direction::None);
            elevator.add_stop(destination, Direction::between(source, destination));
            info!(
                "request {} ({} -> {}) assigned to E{} [{}]",
                id, source, destination, selection.elevator_id, selection.tier
            );
        }

        Ok(Some(AssignmentOutcome {
            request_id: id,
            source_floor: source,
            destination_floor: destination,
            elevator_id: selection.elevator_id,
            tier: selection.tier,
            already_at_destination,
        }))
    }
}
