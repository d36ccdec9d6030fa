use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Direction, FloorRange, RequestStatus};

/// A pick-up at `source_floor` bound for `destination_floor`.
///
/// Floors are checked against the building's range when the request is
/// built and cannot change afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct Request {
    id: String,
    source_floor: i32,
    destination_floor: i32,
    created_at: DateTime<Utc>,
    status: RequestStatus,
}

impl Request {
    pub fn new(
        id: impl Into<String>,
        source_floor: i32,
        destination_floor: i32,
        range: FloorRange,
    ) -> Result<Self> {
        range.check(source_floor)?;
        range.check(destination_floor)?;
        Ok(Self {
            id: id.into(),
            source_floor,
            destination_floor,
            created_at: Utc::now(),
            status: RequestStatus::Pending,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_floor(&self) -> i32 {
        self.source_floor
    }

    pub fn destination_floor(&self) -> i32 {
        self.destination_floor
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    pub fn requested_direction(&self) -> Direction {
        Direction::between(self.source_floor, self.destination_floor)
    }

    pub fn mark_assigned(&mut self) -> Result<()> {
        if self.status == RequestStatus::Assigned {
            return Err(Error::AlreadyAssigned(self.id.clone()));
        }
        self.status = RequestStatus::Assigned;
        Ok(())
    }
}
