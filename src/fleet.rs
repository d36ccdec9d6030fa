use crate::elevator::{Elevator, ElevatorSnapshot};
use crate::error::{Error, Result};
use crate::models::FloorRange;

/// Ordered, fixed-size set of elevators. Ids run from 1 in fleet order.
#[derive(Clone, Debug)]
pub struct Fleet {
    elevators: Vec<Elevator>,
}

impl Fleet {
    pub fn new(quantity: usize, range: FloorRange) -> Self {
        let elevators = (1..=quantity).map(|id| Elevator::new(id, range)).collect();
        Self { elevators }
    }

    pub fn len(&self) -> usize {
        self.elevators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevators.is_empty()
    }

    pub fn as_slice(&self) -> &[Elevator] {
        &self.elevators
    }

    pub fn get_mut(&mut self, idx: usize) -> Result<&mut Elevator> {
        self.elevators
            .get_mut(idx)
            .ok_or(Error::UnknownElevator(idx))
    }

    pub fn tick_all(&mut self) {
        for elevator in &mut self.elevators {
            elevator.tick();
        }
    }

    pub fn snapshots(&self) -> Vec<ElevatorSnapshot> {
        self.elevators.iter().map(Elevator::snapshot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_from_one() {
        let fleet = Fleet::new(3, FloorRange::default());
        let ids = fleet.as_slice().iter().map(Elevator::id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(fleet.as_slice().iter().all(|e| e.current_floor() == 1));
    }

    #[test]
    fn unknown_index_is_an_error() {
        let mut fleet = Fleet::new(1, FloorRange::default());
        let err = fleet.get_mut(4).unwrap_err();
        assert_eq!(err.to_string(), "unknown elevator index 4");
    }

    #[test]
    fn tick_all_advances_every_elevator() {
        let mut fleet = Fleet::new(2, FloorRange::default());
        fleet.get_mut(0).unwrap().add_stop(4, crate::models::Direction::None);
        fleet.get_mut(1).unwrap().add_stop(6, crate::models::Direction::None);
        fleet.tick_all();
        let floors = fleet
            .snapshots()
            .iter()
            .map(|snapshot| snapshot.floor)
            .collect::<Vec<_>>();
        assert_eq!(floors, vec![2, 2]);
    }
}
