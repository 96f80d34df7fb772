use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use headway_core::model::{Direction, FeedScopedId, Route, StopTime};

/// how every real-time record addresses its target: trip id within a feed,
/// on a service date. stops are addressed separately, by the stop sequence
/// numbers the feed declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TripRef {
    pub feed_id: String,
    pub trip_id: String,
    pub service_date: NaiveDate,
}

impl TripRef {
    pub fn new(feed_id: &str, trip_id: &str, service_date: NaiveDate) -> TripRef {
        TripRef {
            feed_id: feed_id.to_owned(),
            trip_id: trip_id.to_owned(),
            service_date,
        }
    }

    pub fn scoped_trip_id(&self) -> FeedScopedId {
        FeedScopedId::new(&self.feed_id, &self.trip_id)
    }
}

impl fmt::Display for TripRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} on {}", self.feed_id, self.trip_id, self.service_date)
    }
}

/// a new time for one side of one stop call, either relative to schedule or
/// absolute seconds past midnight on the service day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUpdate {
    Delay(i32),
    Absolute(i32),
}

/// per-stop content of a delay record. a missing side inherits the delay
/// propagated from earlier stops.
#[derive(Debug, Clone)]
pub struct StopTimeUpdate {
    pub stop_sequence: u32,
    pub arrival: Option<TimeUpdate>,
    pub departure: Option<TimeUpdate>,
}

impl StopTimeUpdate {
    pub fn delay(stop_sequence: u32, seconds: i32) -> StopTimeUpdate {
        StopTimeUpdate {
            stop_sequence,
            arrival: Some(TimeUpdate::Delay(seconds)),
            departure: Some(TimeUpdate::Delay(seconds)),
        }
    }
}

/// a run announced by the feed with no scheduled counterpart.
#[derive(Debug, Clone)]
pub struct AddedTrip {
    pub trip: TripRef,
    /// the route the run belongs to, resolved by the feed handler.
    pub route: Arc<Route>,
    pub direction: Direction,
    pub headsign: Option<String>,
    pub stop_times: Vec<StopTime>,
}

/// one typed real-time record.
#[derive(Debug, Clone)]
pub enum UpdateMessage {
    /// per-stop delay or absolute-time predictions.
    Delay {
        trip: TripRef,
        stop_updates: Vec<StopTimeUpdate>,
    },
    /// the whole run is cancelled.
    Cancel { trip: TripRef },
    /// the vehicle will not call at one stop.
    SkipStop { trip: TripRef, stop_sequence: u32 },
    /// a run with no scheduled counterpart.
    Added(AddedTrip),
    /// the run follows a different stop list than scheduled.
    Modified {
        trip: TripRef,
        stop_times: Vec<StopTime>,
    },
    /// the prediction for one stop exists but should not be trusted.
    PredictionInaccurate { trip: TripRef, stop_sequence: u32 },
    /// the vehicle was observed at a stop; pins the stop to what happened.
    Observation {
        trip: TripRef,
        stop_sequence: u32,
        arrival_time: Option<i32>,
        departure_time: Option<i32>,
    },
}

impl UpdateMessage {
    pub fn trip_ref(&self) -> &TripRef {
        match self {
            UpdateMessage::Delay { trip, .. } => trip,
            UpdateMessage::Cancel { trip } => trip,
            UpdateMessage::SkipStop { trip, .. } => trip,
            UpdateMessage::Added(added) => &added.trip,
            UpdateMessage::Modified { trip, .. } => trip,
            UpdateMessage::PredictionInaccurate { trip, .. } => trip,
            UpdateMessage::Observation { trip, .. } => trip,
        }
    }
}

/// the unit of application and of atomic visibility: every record in a batch
/// is committed in one snapshot swap.
#[derive(Debug, Clone, Default)]
pub struct UpdateBatch {
    pub feed_id: String,
    pub messages: Vec<UpdateMessage>,
}

impl UpdateBatch {
    pub fn new(feed_id: &str) -> UpdateBatch {
        UpdateBatch {
            feed_id: feed_id.to_owned(),
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, message: UpdateMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
