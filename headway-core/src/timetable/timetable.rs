use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{FeedScopedId, RealTimeState};
use crate::timetable::TripTimes;

/// the trip-times vectors of one pattern, ordered by first arrival.
///
/// the order is the earliest-departure search order the router walks; it is
/// safe to take the first qualifying trip at any stop because feeds in which
/// one trip overtakes another on the same pattern are rejected upstream.
/// the scheduled timetable of a pattern holds trips of every service day and
/// is filtered by service code at query time; a real-time overlay timetable
/// is a clone of it scoped to a single day.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    trip_times: Vec<Arc<TripTimes>>,
}

impl Timetable {
    pub fn new() -> Timetable {
        Timetable::default()
    }

    pub fn len(&self) -> usize {
        self.trip_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trip_times.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<TripTimes>> {
        self.trip_times.get(index)
    }

    /// ascending by [`TripTimes::sort_index`].
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TripTimes>> {
        self.trip_times.iter()
    }

    pub fn trip_times_for_trip(&self, trip_id: &FeedScopedId) -> Option<&Arc<TripTimes>> {
        self.trip_times.iter().find(|tt| &tt.trip().id == trip_id)
    }

    /// inserts keeping the sort order; equal keys append after their peers.
    pub fn add_trip_times(&mut self, trip_times: Arc<TripTimes>) {
        let key = trip_times.sort_index();
        let position = self
            .trip_times
            .partition_point(|existing| existing.sort_index() <= key);
        self.trip_times.insert(position, trip_times);
    }

    /// replaces the entry at `index`, returning the displaced one. the
    /// vector is only re-sorted when the replacement moved its sort key.
    pub fn set_trip_times(&mut self, index: usize, trip_times: Arc<TripTimes>) -> Arc<TripTimes> {
        let replaced = std::mem::replace(&mut self.trip_times[index], trip_times);
        if self.trip_times[index].sort_index() != replaced.sort_index() {
            let reinserted = self.trip_times.remove(index);
            self.add_trip_times(reinserted);
        }
        replaced
    }

    /// replaces the entry for the same trip, or inserts when absent.
    pub fn replace_trip_times(&mut self, trip_times: Arc<TripTimes>) -> Option<Arc<TripTimes>> {
        let trip_id = &trip_times.trip().id;
        match self.trip_times.iter().position(|tt| &tt.trip().id == trip_id) {
            None => {
                self.add_trip_times(trip_times);
                None
            }
            Some(index) => Some(self.set_trip_times(index, trip_times)),
        }
    }

    /// the first trip a rider can board at `stop` departing at or after
    /// `time`, honoring cancellations, boarding rules and the service-day
    /// filter. runs synthesized by real-time messages carry no scheduled
    /// service code; their presence in a dated overlay is their calendar.
    pub fn next_departure(
        &self,
        stop: usize,
        time: i32,
        service_codes: &HashSet<usize>,
    ) -> Option<&Arc<TripTimes>> {
        self.trip_times.iter().find(|tt| {
            let runs = match tt.real_time_state() {
                RealTimeState::Added | RealTimeState::Modified => true,
                _ => service_codes.contains(&tt.service_code()),
            };
            runs && !tt.is_canceled()
                && tt.pickup(stop).is_routable()
                && tt.departure_time(stop) >= time
        })
    }
}
