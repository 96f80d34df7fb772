use std::sync::Arc;

use crate::model::{FeedScopedId, Route};
use crate::timetable::{StopPattern, Timetable, TimetableError, TripTimes};

/// the static shape shared by every trip calling the same stops in the same
/// order on one route. owns the scheduled [`Timetable`]; real-time overlays
/// for individual service days live in the snapshot, keyed by this pattern.
#[derive(Debug, Clone)]
pub struct TripPattern {
    id: FeedScopedId,
    route: Arc<Route>,
    stop_pattern: StopPattern,
    scheduled_timetable: Timetable,
    /// true for patterns synthesized at runtime for added or re-routed trips.
    created_by_realtime: bool,
}

impl TripPattern {
    pub fn new(id: FeedScopedId, route: Arc<Route>, stop_pattern: StopPattern) -> TripPattern {
        TripPattern {
            id,
            route,
            stop_pattern,
            scheduled_timetable: Timetable::new(),
            created_by_realtime: false,
        }
    }

    /// a pattern created on the fly by the update pipeline. it owns an empty
    /// scheduled timetable; its trips exist only in snapshot overlays.
    pub fn new_realtime(
        id: FeedScopedId,
        route: Arc<Route>,
        stop_pattern: StopPattern,
    ) -> TripPattern {
        TripPattern {
            created_by_realtime: true,
            ..TripPattern::new(id, route, stop_pattern)
        }
    }

    pub fn id(&self) -> &FeedScopedId {
        &self.id
    }

    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    pub fn stop_pattern(&self) -> &StopPattern {
        &self.stop_pattern
    }

    pub fn num_stops(&self) -> usize {
        self.stop_pattern.num_stops()
    }

    pub fn scheduled_timetable(&self) -> &Timetable {
        &self.scheduled_timetable
    }

    pub fn created_by_realtime(&self) -> bool {
        self.created_by_realtime
    }

    /// adds a scheduled run. the vector must call exactly the stops of this
    /// pattern; structural mismatches are construction bugs caught here.
    pub fn add_trip_times(&mut self, trip_times: Arc<TripTimes>) -> Result<(), TimetableError> {
        if trip_times.num_stops() != self.num_stops() {
            return Err(TimetableError::StopCountMismatch {
                trip: trip_times.trip().id.clone(),
                trip_stops: trip_times.num_stops(),
                pattern: self.id.clone(),
                pattern_stops: self.num_stops(),
            });
        }
        self.scheduled_timetable.add_trip_times(trip_times);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dedup::Deduplicator;
    use crate::model::{Stop, StopTime, TransitMode, Trip};

    fn pattern_and_times() -> (TripPattern, Arc<TripTimes>) {
        let mut deduplicator = Deduplicator::new();
        let route = Arc::new(Route::new(
            FeedScopedId::new("t", "r"),
            "R",
            TransitMode::Bus,
        ));
        let stop_times: Vec<StopTime> = ["a", "b"]
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let stop = Arc::new(Stop::new(FeedScopedId::new("t", id), id));
                StopTime::new(stop, index as i32 * 60, index as i32 * 60)
            })
            .collect();
        let pattern = TripPattern::new(
            FeedScopedId::new("t", "p1"),
            route.clone(),
            StopPattern::from_stop_times(&stop_times, &mut deduplicator),
        );
        let trip = Arc::new(Trip::new(
            FeedScopedId::new("t", "trip"),
            route,
            FeedScopedId::new("t", "svc"),
        ));
        let times = Arc::new(
            TripTimes::new(trip, 0, &stop_times, &mut deduplicator).expect("valid stop times"),
        );
        (pattern, times)
    }

    #[test]
    fn test_add_trip_times() {
        let (mut pattern, times) = pattern_and_times();
        pattern.add_trip_times(times).expect("matching stop count");
        assert_eq!(pattern.scheduled_timetable().len(), 1);
    }

    #[test]
    fn test_stop_count_mismatch_rejected() {
        let (mut pattern, _) = pattern_and_times();
        let mut deduplicator = Deduplicator::new();
        let route = pattern.route().clone();
        let trip = Arc::new(Trip::new(
            FeedScopedId::new("t", "odd"),
            route,
            FeedScopedId::new("t", "svc"),
        ));
        let single = vec![StopTime::new(
            Arc::new(Stop::new(FeedScopedId::new("t", "x"), "x")),
            0,
            0,
        )];
        let times = Arc::new(
            TripTimes::new(trip, 0, &single, &mut deduplicator).expect("valid stop times"),
        );
        assert!(matches!(
            pattern.add_trip_times(times),
            Err(TimetableError::StopCountMismatch { .. })
        ));
    }
}
