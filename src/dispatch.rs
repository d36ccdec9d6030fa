//! Request ledger and elevator selection.
//!
//! Selection is a three-tier greedy pick, first match wins:
//!
//! - **Idle**: the first idle elevator in fleet order.
//! - **SameDirection**: the closest elevator already travelling the way the
//!   request wants to go.
//! - **Nearest**: the closest elevator regardless of direction.
//!
//! Distance ties always go to the elevator that comes first in the fleet.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::elevator::Elevator;
use crate::error::{Error, Result};
use crate::request::Request;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Idle,
    SameDirection,
    Nearest,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Idle => "idle",
            Tier::SameDirection => "same-direction",
            Tier::Nearest => "nearest",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Selection {
    /// Position in the fleet slice handed to the dispatcher.
    pub index: usize,
    pub elevator_id: usize,
    pub tier: Tier,
    pub distance: u32,
}

/// Arrival-ordered request ledger. Requests are addressed by their position
/// in the ledger; ids are unique and only used for lookup at the edges.
#[derive(Debug, Default)]
pub struct Dispatcher {
    requests: Vec<Request>,
    by_id: HashMap<String, usize>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a request and returns its ledger index. Floors were already
    /// checked when the request was built; a reused id is rejected.
    pub fn add_request(&mut self, request: Request) -> Result<usize> {
        if self.by_id.contains_key(request.id()) {
            return Err(Error::DuplicateRequest(request.id().to_string()));
        }
        let idx = self.requests.len();
        self.by_id.insert(request.id().to_string(), idx);
        self.requests.push(request);
        Ok(idx)
    }

    pub fn has_pending_requests(&self) -> bool {
        self.requests.iter().any(Request::is_pending)
    }

    pub fn pending_count(&self) -> usize {
        self.requests.iter().filter(|r| r.is_pending()).count()
    }

    /// Ledger indices of pending requests in arrival order.
    pub fn pending_indices(&self) -> Vec<usize> {
        self.requests
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_pending())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.pending_indices()
            .into_iter()
            .map(|idx| self.requests[idx].id().to_string())
            .collect()
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn request(&self, idx: usize) -> Result<&Request> {
        self.requests
            .get(idx)
            .ok_or_else(|| Error::UnknownRequest(format!("#{}", idx)))
    }

    pub fn request_mut(&mut self, idx: usize) -> Result<&mut Request> {
        self.requests
            .get_mut(idx)
            .ok_or_else(|| Error::UnknownRequest(format!("#{}", idx)))
    }

    pub fn get(&self, id: &str) -> Result<&Request> {
        let idx = self.index_of(id)?;
        self.request(idx)
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Request> {
        let idx = self.index_of(id)?;
        self.request_mut(idx)
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownRequest(id.to_string()))
    }

    /// Picks the elevator that should serve `request`. Pure: neither the
    /// fleet nor the request is touched.
    pub fn assign_elevator(&self, fleet: &[Elevator], request: &Request) -> Option<Selection> {
        let source = request.source_floor();

        if let Some((index, elevator)) = fleet.iter().enumerate().find(|(_, e)| e.is_idle()) {
            return Some(Selection {
                index,
                elevator_id: elevator.id(),
                tier: Tier::Idle,
                distance: elevator.distance_to(source),
            });
        }

        let wanted = request.requested_direction();
        let same_direction = pick_nearest(
            fleet
                .iter()
                .enumerate()
                .filter(|(_, e)| e.direction() == wanted),
            source,
        );
        if let Some((index, distance)) = same_direction {
            return Some(Selection {
                index,
                elevator_id: fleet[index].id(),
                tier: Tier::SameDirection,
                distance,
            });
        }

        pick_nearest(fleet.iter().enumerate(), source).map(|(index, distance)| Selection {
            index,
            elevator_id: fleet[index].id(),
            tier: Tier::Nearest,
            distance,
        })
    }
}

fn pick_nearest<'a>(
    candidates: impl Iterator<Item = (usize, &'a Elevator)>,
    floor: i32,
) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for (idx, elevator) in candidates {
        let distance = elevator.distance_to(floor);
        match best {
            Some((_, min)) if distance >= min => {}
            _ => best = Some((idx, distance)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, FloorRange, RequestStatus};

    fn range() -> FloorRange {
        FloorRange::new(1, 10).unwrap()
    }

    fn request(id: &str, source: i32, destination: i32) -> Request {
        Request::new(id, source, destination, range()).unwrap()
    }

    /// An elevator that has left `from` heading to `to` and is no longer idle.
    fn moving(id: usize, from: i32, to: i32) -> Elevator {
        let mut elevator = Elevator::at_floor(id, from, range());
        elevator.add_stop(to, Direction::None);
        elevator.tick();
        elevator
    }

    #[test]
    fn idle_elevator_wins_first() {
        let fleet = vec![moving(1, 4, 8), Elevator::at_floor(2, 9, range())];
        let selection = Dispatcher::new()
            .assign_elevator(&fleet, &request("R1", 5, 7))
            .unwrap();
        assert_eq!(selection.elevator_id, 2);
        assert_eq!(selection.tier, Tier::Idle);
        assert_eq!(selection.distance, 4);
    }

    #[test]
    fn lower_id_wins_between_idle_elevators() {
        let fleet = vec![
            Elevator::at_floor(1, 10, range()),
            Elevator::at_floor(2, 3, range()),
        ];
        let dispatcher = Dispatcher::new();
        let selection = dispatcher
            .assign_elevator(&fleet, &request("R1", 3, 1))
            .unwrap();
        assert_eq!(selection.elevator_id, 1);
        assert_eq!(selection.index, 0);
    }

    #[test]
    fn same_direction_prefers_closest() {
        // Elevators end up on floors 2, 5 and 3 heading up, up and down.
        let fleet = vec![moving(1, 1, 9), moving(2, 4, 9), moving(3, 4, 1)];
        let selection = Dispatcher::new()
            .assign_elevator(&fleet, &request("R1", 6, 8))
            .unwrap();
        assert_eq!(selection.elevator_id, 2);
        assert_eq!(selection.tier, Tier::SameDirection);
        assert_eq!(selection.distance, 1);
    }

    #[test]
    fn same_direction_ties_go_to_fleet_order() {
        let fleet = vec![moving(1, 2, 9), moving(2, 6, 9)];
        // Both elevators are two floors from floor 5.
        let selection = Dispatcher::new()
            .assign_elevator(&fleet, &request("R1", 5, 9))
            .unwrap();
        assert_eq!(selection.elevator_id, 1);
    }

    #[test]
    fn falls_back_to_nearest_when_no_direction_matches() {
        // Moving up from floor 2 with a stop at 5; a downward request at 3.
        let fleet = vec![moving(1, 1, 5), moving(2, 8, 10)];
        assert_eq!(fleet[0].current_floor(), 2);
        assert_eq!(fleet[0].direction(), Direction::Up);

        let selection = Dispatcher::new()
            .assign_elevator(&fleet, &request("R1", 3, 1))
            .unwrap();
        assert_eq!(selection.elevator_id, 1);
        assert_eq!(selection.tier, Tier::Nearest);
        assert_eq!(selection.distance, 1);
    }

    #[test]
    fn empty_fleet_yields_none() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher
            .assign_elevator(&[], &request("R1", 3, 7))
            .is_none());
    }

    #[test]
    fn assignment_is_repeatable_and_side_effect_free() {
        let fleet = vec![moving(1, 1, 9), moving(2, 8, 2), moving(3, 5, 8)];
        let mut dispatcher = Dispatcher::new();
        dispatcher.add_request(request("R1", 4, 2)).unwrap();
        let before = fleet.iter().map(Elevator::snapshot).collect::<Vec<_>>();

        let first = dispatcher.assign_elevator(&fleet, dispatcher.get("R1").unwrap());
        for _ in 0..5 {
            let again = dispatcher.assign_elevator(&fleet, dispatcher.get("R1").unwrap());
            assert_eq!(again, first);
        }

        let after = fleet.iter().map(Elevator::snapshot).collect::<Vec<_>>();
        assert_eq!(before, after);
        assert_eq!(dispatcher.get("R1").unwrap().status(), RequestStatus::Pending);
    }

    #[test]
    fn ledger_tracks_pending_requests() {
        let mut dispatcher = Dispatcher::new();
        assert!(!dispatcher.has_pending_requests());

        assert_eq!(dispatcher.add_request(request("R1", 1, 4)).unwrap(), 0);
        assert_eq!(dispatcher.add_request(request("R2", 6, 2)).unwrap(), 1);
        assert!(dispatcher.has_pending_requests());
        assert_eq!(dispatcher.pending_ids(), vec!["R1", "R2"]);

        dispatcher.get_mut("R1").unwrap().mark_assigned().unwrap();
        assert_eq!(dispatcher.pending_ids(), vec!["R2"]);
        assert_eq!(dispatcher.pending_indices(), vec![1]);
        assert_eq!(dispatcher.pending_count(), 1);

        dispatcher.get_mut("R2").unwrap().mark_assigned().unwrap();
        assert!(!dispatcher.has_pending_requests());
        assert_eq!(dispatcher.requests().len(), 2);
    }

    #[test]
    fn unknown_request_lookup_fails() {
        let mut dispatcher = Dispatcher::new();
        let err = dispatcher.get_mut("R42").unwrap_err();
        assert_eq!(err.to_string(), "unknown request 'R42'");
    }

    #[test]
    fn reused_id_is_rejected_at_intake() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.add_request(request("X", 1, 4)).unwrap();
        let err = dispatcher.add_request(request("X", 6, 2)).unwrap_err();
        assert_eq!(err.to_string(), "request 'X' is already tracked");

        assert_eq!(dispatcher.requests().len(), 1);
        assert_eq!(dispatcher.get("X").unwrap().source_floor(), 1);
    }

    #[test]
    fn ledger_is_addressed_by_index() {
        let mut dispatcher = Dispatcher::new();
        let idx = dispatcher.add_request(request("R7", 2, 5)).unwrap();
        dispatcher.request_mut(idx).unwrap().mark_assigned().unwrap();
        assert_eq!(dispatcher.request(idx).unwrap().id(), "R7");
        assert!(dispatcher.request(idx + 1).is_err());
        assert!(dispatcher.pending_indices().is_empty());
    }
}
