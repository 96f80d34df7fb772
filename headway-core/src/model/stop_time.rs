use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{BookingInfo, PickDrop, Stop};

/// one pre-validated call of one trip at one stop, the construction input for
/// [`crate::timetable::TripTimes`].
///
/// times are seconds past midnight on the service day and may exceed 86 400
/// for runs crossing midnight. at least one of arrival and departure must be
/// present; a missing one is taken from the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTime {
    pub stop: Arc<Stop>,
    pub arrival_time: Option<i32>,
    pub departure_time: Option<i32>,
    /// sequence number as declared by the feed. non-contiguous values are
    /// common and real-time messages address stops by this number.
    pub stop_sequence: u32,
    /// true when the timetable is authoritative here rather than interpolated.
    pub timepoint: bool,
    pub pickup: PickDrop,
    pub drop_off: PickDrop,
    pub stop_headsign: Option<String>,
    pub pickup_booking_info: Option<Arc<BookingInfo>>,
    pub drop_off_booking_info: Option<Arc<BookingInfo>>,
}

impl StopTime {
    pub fn new(stop: Arc<Stop>, arrival_time: i32, departure_time: i32) -> StopTime {
        StopTime {
            stop,
            arrival_time: Some(arrival_time),
            departure_time: Some(departure_time),
            stop_sequence: 0,
            timepoint: false,
            pickup: PickDrop::Regular,
            drop_off: PickDrop::Regular,
            stop_headsign: None,
            pickup_booking_info: None,
            drop_off_booking_info: None,
        }
    }

    pub fn with_sequence(mut self, stop_sequence: u32) -> StopTime {
        self.stop_sequence = stop_sequence;
        self
    }

    pub fn with_headsign(mut self, headsign: &str) -> StopTime {
        self.stop_headsign = Some(headsign.to_owned());
        self
    }

    pub fn with_timepoint(mut self) -> StopTime {
        self.timepoint = true;
        self
    }
}
