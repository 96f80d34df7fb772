use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{FeedScopedId, ServiceCalendar, Trip};
use crate::timetable::{StopPattern, TripPattern};

/// the built transit model: every pattern with its scheduled timetable, the
/// indexes that locate them, and the service calendar.
///
/// populated on the single build thread, then shared read-only behind an
/// `Arc` with every router thread and with the update pipeline. real-time
/// data never mutates this; it overlays it through snapshots.
#[derive(Debug, Default)]
pub struct TimetableRepository {
    patterns: HashMap<FeedScopedId, Arc<TripPattern>>,
    patterns_by_trip: HashMap<FeedScopedId, Arc<TripPattern>>,
    patterns_by_shape: HashMap<StopPattern, Arc<TripPattern>>,
    trips: HashMap<FeedScopedId, Arc<Trip>>,
    calendar: ServiceCalendar,
}

impl TimetableRepository {
    pub fn new() -> TimetableRepository {
        TimetableRepository::default()
    }

    /// registers a fully built pattern and indexes every trip in its
    /// scheduled timetable. the first pattern registered for a shape becomes
    /// the one added trips are matched against.
    pub fn add_pattern(&mut self, pattern: TripPattern) -> Arc<TripPattern> {
        let pattern = Arc::new(pattern);
        self.patterns
            .insert(pattern.id().clone(), pattern.clone());
        self.patterns_by_shape
            .entry(pattern.stop_pattern().clone())
            .or_insert_with(|| pattern.clone());
        for trip_times in pattern.scheduled_timetable().iter() {
            let trip = trip_times.trip().clone();
            self.patterns_by_trip
                .insert(trip.id.clone(), pattern.clone());
            self.trips.insert(trip.id.clone(), trip);
        }
        pattern
    }

    pub fn pattern(&self, pattern_id: &FeedScopedId) -> Option<&Arc<TripPattern>> {
        self.patterns.get(pattern_id)
    }

    pub fn pattern_for_trip(&self, trip_id: &FeedScopedId) -> Option<&Arc<TripPattern>> {
        self.patterns_by_trip.get(trip_id)
    }

    /// an existing pattern whose stops and boarding rules equal `shape`.
    pub fn pattern_matching_shape(&self, shape: &StopPattern) -> Option<&Arc<TripPattern>> {
        self.patterns_by_shape.get(shape)
    }

    pub fn trip(&self, trip_id: &FeedScopedId) -> Option<&Arc<Trip>> {
        self.trips.get(trip_id)
    }

    pub fn calendar(&self) -> &ServiceCalendar {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut ServiceCalendar {
        &mut self.calendar
    }

    pub fn num_patterns(&self) -> usize {
        self.patterns.len()
    }

    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    /// build report, logged once after graph build.
    pub fn log_summary(&self) {
        log::info!(
            "timetable repository: {} patterns, {} trips, {} services",
            self.num_patterns(),
            self.num_trips(),
            self.calendar.num_services(),
        );
    }
}
