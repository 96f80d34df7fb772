use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{FeedScopedId, Route};

/// travel direction along a route, from GTFS `direction_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outbound,
    Inbound,
    #[default]
    Unknown,
}

impl Direction {
    pub fn from_gtfs_direction_id(direction_id: Option<u8>) -> Direction {
        match direction_id {
            Some(0) => Direction::Outbound,
            Some(1) => Direction::Inbound,
            _ => Direction::Unknown,
        }
    }
}

/// one scheduled run of one vehicle. the trip is the identity that stop-time
/// vectors, real-time updates and rider-facing names all hang off; its stop
/// sequence lives in the owning pattern, its times in [`crate::timetable::TripTimes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: FeedScopedId,
    pub route: Arc<Route>,
    pub service_id: FeedScopedId,
    pub direction: Direction,
    pub headsign: Option<String>,
    pub short_name: Option<String>,
}

impl Trip {
    pub fn new(id: FeedScopedId, route: Arc<Route>, service_id: FeedScopedId) -> Trip {
        Trip {
            id,
            route,
            service_id,
            direction: Direction::Unknown,
            headsign: None,
            short_name: None,
        }
    }

    pub fn with_headsign(mut self, headsign: &str) -> Trip {
        self.headsign = Some(headsign.to_owned());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Trip {
        self.direction = direction;
        self
    }
}
