use std::sync::Arc;

use headway_core::dedup::Deduplicator;
use headway_core::model::{FeedScopedId, Route, StopTime, Trip, SERVICE_CODE_REALTIME};
use headway_core::timetable::{StopPattern, TimetableRepository, TripPattern, TripTimes};

use crate::snapshot::{SnapshotBuilder, SnapshotPublisher};
use crate::updater::{
    AddedTrip, PatternSynthesisPolicy, RejectedUpdate, StopTimeUpdate, TimeUpdate, TripRef,
    UpdateBatch, UpdateError, UpdateMessage, UpdateResult,
};

/// turns real-time message batches into published timetable snapshots.
///
/// each record locates its target trip-times vector through the staged
/// snapshot, clones it, mutates the clone, validates, and stages the result
/// at pattern-day granularity. the batch commits once at the end: readers
/// see all of it or none of it. record-level failures are collected in the
/// [`UpdateResult`] and never stop the rest of the batch.
pub struct UpdateApplier {
    repository: Arc<TimetableRepository>,
    publisher: Arc<SnapshotPublisher>,
    pattern_policy: PatternSynthesisPolicy,
}

impl UpdateApplier {
    pub fn new(repository: Arc<TimetableRepository>, publisher: Arc<SnapshotPublisher>) -> Self {
        UpdateApplier {
            repository,
            publisher,
            pattern_policy: PatternSynthesisPolicy::default(),
        }
    }

    pub fn with_pattern_policy(mut self, pattern_policy: PatternSynthesisPolicy) -> Self {
        self.pattern_policy = pattern_policy;
        self
    }

    /// applies a batch and, when at least one record took effect, publishes
    /// the resulting snapshot.
    pub fn apply(&self, batch: &UpdateBatch) -> UpdateResult {
        let mut builder = self.publisher.begin();
        let mut result = UpdateResult::default();
        for (index, message) in batch.messages.iter().enumerate() {
            match self.apply_message(&mut builder, message) {
                Ok(()) => result.applied += 1,
                Err(error) => {
                    let trip = message.trip_ref().clone();
                    log::warn!(
                        "feed {}: rejected update for trip {trip}: {error}",
                        batch.feed_id
                    );
                    result.rejected.push(RejectedUpdate { index, trip, error });
                }
            }
        }
        if result.applied > 0 {
            builder.commit();
        }
        log::debug!("feed {}: {}", batch.feed_id, result.summary());
        result
    }

    fn apply_message(
        &self,
        builder: &mut SnapshotBuilder<'_>,
        message: &UpdateMessage,
    ) -> Result<(), UpdateError> {
        match message {
            UpdateMessage::Delay { trip, stop_updates } => {
                self.mutate(builder, trip, |times, trip_id| {
                    apply_stop_updates(times, trip_id, stop_updates)
                })
            }
            UpdateMessage::Cancel { trip } => self.mutate(builder, trip, |times, _| {
                times.cancel();
                Ok(())
            }),
            UpdateMessage::SkipStop {
                trip,
                stop_sequence,
            } => self.mutate(builder, trip, |times, trip_id| {
                let stop = stop_index(times, trip_id, *stop_sequence)?;
                times.cancel_stop(stop);
                Ok(())
            }),
            UpdateMessage::Added(added) => self.apply_added(builder, added),
            UpdateMessage::Modified { trip, stop_times } => {
                self.apply_modified(builder, trip, stop_times)
            }
            UpdateMessage::PredictionInaccurate {
                trip,
                stop_sequence,
            } => self.mutate(builder, trip, |times, trip_id| {
                let stop = stop_index(times, trip_id, *stop_sequence)?;
                times.set_prediction_inaccurate(stop, true);
                Ok(())
            }),
            UpdateMessage::Observation {
                trip,
                stop_sequence,
                arrival_time,
                departure_time,
            } => self.mutate(builder, trip, |times, trip_id| {
                let stop = stop_index(times, trip_id, *stop_sequence)?;
                if let Some(arrival) = arrival_time {
                    times.update_arrival_time(stop, *arrival);
                }
                if let Some(departure) = departure_time {
                    times.update_departure_time(stop, *departure);
                }
                times.set_recorded(stop, true);
                Ok(())
            }),
        }
    }

    /// clone-mutate-validate-stage for records targeting an existing run.
    /// when validation fails the clone is dropped and nothing was staged, so
    /// the previous state of the trip stays in force.
    fn mutate(
        &self,
        builder: &mut SnapshotBuilder<'_>,
        trip: &TripRef,
        mutation: impl FnOnce(&mut TripTimes, &FeedScopedId) -> Result<(), UpdateError>,
    ) -> Result<(), UpdateError> {
        let trip_id = trip.scoped_trip_id();
        let (pattern, mut times) = self.locate(builder, trip, &trip_id)?;
        mutation(&mut times, &trip_id)?;
        if !times.times_increasing() {
            return Err(UpdateError::InconsistentUpdate(trip_id));
        }
        builder.update(&pattern, trip.service_date, Arc::new(times))?;
        Ok(())
    }

    /// finds the pattern and an owned copy of the current trip-times vector,
    /// preferring the staged overlay so records in one batch compose.
    fn locate(
        &self,
        builder: &SnapshotBuilder<'_>,
        trip: &TripRef,
        trip_id: &FeedScopedId,
    ) -> Result<(Arc<TripPattern>, TripTimes), UpdateError> {
        let pattern = self
            .repository
            .pattern_for_trip(trip_id)
            .cloned()
            .or_else(|| {
                builder
                    .snapshot()
                    .added_pattern(trip_id, trip.service_date)
                    .cloned()
            })
            .ok_or_else(|| UpdateError::UnknownTrip(trip_id.clone(), trip.service_date))?;
        let times = builder
            .snapshot()
            .resolve(&pattern, trip.service_date)
            .trip_times_for_trip(trip_id)
            .map(|times| TripTimes::clone(times))
            .ok_or_else(|| UpdateError::UnknownTrip(trip_id.clone(), trip.service_date))?;
        Ok((pattern, times))
    }

    fn apply_added(
        &self,
        builder: &mut SnapshotBuilder<'_>,
        added: &AddedTrip,
    ) -> Result<(), UpdateError> {
        let trip_id = added.trip.scoped_trip_id();
        let mut deduplicator = Deduplicator::new();
        let shape = StopPattern::from_stop_times(&added.stop_times, &mut deduplicator);
        let pattern = self.pattern_for_shape(builder, &added.trip, &trip_id, shape, &added.route)?;

        let mut trip = Trip::new(
            trip_id,
            added.route.clone(),
            FeedScopedId::new(&added.trip.feed_id, "realtime-added"),
        );
        trip.direction = added.direction;
        trip.headsign = added.headsign.clone();

        let mut times = TripTimes::new(
            Arc::new(trip),
            SERVICE_CODE_REALTIME,
            &added.stop_times,
            &mut deduplicator,
        )?;
        times.mark_added();
        builder.update(&pattern, added.trip.service_date, Arc::new(times))?;
        Ok(())
    }

    fn apply_modified(
        &self,
        builder: &mut SnapshotBuilder<'_>,
        trip_ref: &TripRef,
        stop_times: &[StopTime],
    ) -> Result<(), UpdateError> {
        let trip_id = trip_ref.scoped_trip_id();
        let (original_pattern, original_times) = self.locate(builder, trip_ref, &trip_id)?;
        let trip = original_times.trip().clone();

        let mut deduplicator = Deduplicator::new();
        let shape = StopPattern::from_stop_times(stop_times, &mut deduplicator);
        let target_pattern = if *original_pattern.stop_pattern() == shape {
            original_pattern.clone()
        } else {
            self.pattern_for_shape(builder, trip_ref, &trip_id, shape, &trip.route)?
        };

        let mut times = TripTimes::new(
            trip.clone(),
            SERVICE_CODE_REALTIME,
            stop_times,
            &mut deduplicator,
        )?;
        times.mark_modified();

        if !Arc::ptr_eq(&target_pattern, &original_pattern) {
            // the run left its scheduled pattern; hide it there
            let mut displaced = original_times;
            displaced.cancel();
            builder.update(&original_pattern, trip_ref.service_date, Arc::new(displaced))?;
        }
        builder.update(&target_pattern, trip_ref.service_date, Arc::new(times))?;
        Ok(())
    }

    /// an existing pattern with this exact shape, the one already synthesized
    /// for this trip today, or a fresh realtime pattern when policy allows.
    fn pattern_for_shape(
        &self,
        builder: &SnapshotBuilder<'_>,
        trip: &TripRef,
        trip_id: &FeedScopedId,
        shape: StopPattern,
        route: &Arc<Route>,
    ) -> Result<Arc<TripPattern>, UpdateError> {
        if let Some(existing) = self.repository.pattern_matching_shape(&shape) {
            return Ok(existing.clone());
        }
        if let Some(previous) = builder.snapshot().added_pattern(trip_id, trip.service_date) {
            if *previous.stop_pattern() == shape {
                return Ok(previous.clone());
            }
        }
        match self.pattern_policy {
            PatternSynthesisPolicy::Reject => {
                Err(UpdateError::PatternStructureRequired(trip_id.clone()))
            }
            PatternSynthesisPolicy::Synthesize => {
                let pattern_id = FeedScopedId::new(
                    &trip.feed_id,
                    &format!("{}-{}-realtime", trip.trip_id, trip.service_date),
                );
                Ok(Arc::new(TripPattern::new_realtime(
                    pattern_id,
                    route.clone(),
                    shape,
                )))
            }
        }
    }
}

/// resolves each update to a stop index, then walks the stops in order
/// applying the most recent delay to every following stop until the next
/// update supersedes it, separately for arrivals and departures. stops ahead
/// of the first updated one keep their scheduled times.
fn apply_stop_updates(
    times: &mut TripTimes,
    trip_id: &FeedScopedId,
    stop_updates: &[StopTimeUpdate],
) -> Result<(), UpdateError> {
    let mut resolved = Vec::with_capacity(stop_updates.len());
    for update in stop_updates {
        let stop = stop_index(times, trip_id, update.stop_sequence)?;
        resolved.push((stop, update));
    }
    resolved.sort_by_key(|(stop, _)| *stop);

    let mut next = resolved.iter().peekable();
    let mut arrival_delay: Option<i32> = None;
    let mut departure_delay: Option<i32> = None;
    for stop in 0..times.num_stops() {
        while let Some((update_stop, update)) = next.peek() {
            if *update_stop != stop {
                break;
            }
            if let Some(arrival) = update.arrival {
                arrival_delay = Some(match arrival {
                    TimeUpdate::Delay(delay) => delay,
                    TimeUpdate::Absolute(time) => time - times.scheduled_arrival_time(stop),
                });
            }
            if let Some(departure) = update.departure {
                departure_delay = Some(match departure {
                    TimeUpdate::Delay(delay) => delay,
                    TimeUpdate::Absolute(time) => time - times.scheduled_departure_time(stop),
                });
            }
            next.next();
        }
        if let Some(delay) = arrival_delay {
            times.update_arrival_delay(stop, delay);
        }
        if let Some(delay) = departure_delay {
            times.update_departure_delay(stop, delay);
        }
    }
    Ok(())
}

fn stop_index(
    times: &TripTimes,
    trip_id: &FeedScopedId,
    stop_sequence: u32,
) -> Result<usize, UpdateError> {
    times
        .stop_index_of_gtfs_sequence(stop_sequence)
        .ok_or_else(|| UpdateError::UnknownStopSequence(trip_id.clone(), stop_sequence))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use headway_core::model::{Direction, RealTimeState, Stop, TransitMode};
    use headway_core::timetable::TimetableRepository;

    const FEED: &str = "hw";

    fn service_date() -> NaiveDate {
        NaiveDate::parse_from_str("2026-03-02", "%Y-%m-%d").expect("valid test date")
    }

    fn stop(id: &str) -> Arc<Stop> {
        Arc::new(Stop::new(FeedScopedId::new(FEED, id), id))
    }

    fn stop_times(specs: &[(&str, i32, i32, u32)]) -> Vec<StopTime> {
        specs
            .iter()
            .map(|(id, arrival, departure, sequence)| {
                StopTime::new(stop(id), *arrival, *departure).with_sequence(*sequence)
            })
            .collect()
    }

    /// one pattern over stops a-b-c with a single weekday trip departing 06:00.
    fn fixture() -> (Arc<TimetableRepository>, Arc<SnapshotPublisher>, Arc<Route>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut repository = TimetableRepository::new();
        let mut deduplicator = Deduplicator::new();
        let route = Arc::new(Route::new(
            FeedScopedId::new(FEED, "r1"),
            "R1",
            TransitMode::Bus,
        ));

        let service_id = FeedScopedId::new(FEED, "weekday");
        let code = repository.calendar_mut().service_code(&service_id);
        repository.calendar_mut().add_service_date(code, service_date());

        let times = stop_times(&[
            ("a", 21600, 21600, 10),
            ("b", 21900, 21960, 20),
            ("c", 22500, 22500, 30),
        ]);
        let mut pattern = TripPattern::new(
            FeedScopedId::new(FEED, "p1"),
            route.clone(),
            StopPattern::from_stop_times(&times, &mut deduplicator),
        );
        let trip = Arc::new(
            Trip::new(FeedScopedId::new(FEED, "trip-1"), route.clone(), service_id)
                .with_headsign("Hauptbahnhof"),
        );
        let trip_times = Arc::new(
            TripTimes::new(trip, code, &times, &mut deduplicator).expect("valid stop times"),
        );
        pattern
            .add_trip_times(trip_times)
            .expect("matching stop count");
        repository.add_pattern(pattern);

        (
            Arc::new(repository),
            Arc::new(SnapshotPublisher::new()),
            route,
        )
    }

    fn applier(
        repository: &Arc<TimetableRepository>,
        publisher: &Arc<SnapshotPublisher>,
    ) -> UpdateApplier {
        UpdateApplier::new(repository.clone(), publisher.clone())
    }

    fn current_times(
        repository: &Arc<TimetableRepository>,
        publisher: &Arc<SnapshotPublisher>,
        trip: &str,
    ) -> TripTimes {
        let trip_id = FeedScopedId::new(FEED, trip);
        let pattern = repository
            .pattern_for_trip(&trip_id)
            .expect("trip in repository")
            .clone();
        let snapshot = publisher.current();
        let times = snapshot
            .resolve(&pattern, service_date())
            .trip_times_for_trip(&trip_id)
            .expect("trip in timetable");
        TripTimes::clone(times)
    }

    fn batch(message: UpdateMessage) -> UpdateBatch {
        let mut batch = UpdateBatch::new(FEED);
        batch.push(message);
        batch
    }

    fn trip_ref(trip: &str) -> TripRef {
        TripRef::new(FEED, trip, service_date())
    }

    #[test]
    fn test_delay_applies_and_propagates_forward() {
        let (repository, publisher, _) = fixture();
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::Delay {
            trip: trip_ref("trip-1"),
            stop_updates: vec![StopTimeUpdate::delay(20, 120)],
        }));
        assert!(result.is_fully_applied());
        assert_eq!(result.applied, 1);

        let times = current_times(&repository, &publisher, "trip-1");
        assert_eq!(times.real_time_state(), RealTimeState::Updated);
        // the stop before the update keeps its schedule
        assert_eq!(times.arrival_delay(0), 0);
        assert_eq!(times.arrival_delay(1), 120);
        assert_eq!(times.departure_delay(1), 120);
        // the delay carries forward to the end of the run
        assert_eq!(times.arrival_delay(2), 120);
    }

    #[test]
    fn test_delay_superseded_by_later_stop_update() {
        let (repository, publisher, _) = fixture();
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::Delay {
            trip: trip_ref("trip-1"),
            stop_updates: vec![
                StopTimeUpdate::delay(20, 120),
                StopTimeUpdate {
                    stop_sequence: 30,
                    arrival: Some(TimeUpdate::Absolute(22530)),
                    departure: Some(TimeUpdate::Delay(30)),
                },
            ],
        }));
        assert!(result.is_fully_applied());

        let times = current_times(&repository, &publisher, "trip-1");
        assert_eq!(times.arrival_delay(1), 120);
        // the absolute prediction at c replaces the propagated 120
        assert_eq!(times.arrival_time(2), 22530);
        assert_eq!(times.departure_delay(2), 30);
    }

    #[test]
    fn test_inconsistent_delay_rejected_and_rolled_back() {
        let (repository, publisher, _) = fixture();
        // pull the departure at b before its arrival
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::Delay {
            trip: trip_ref("trip-1"),
            stop_updates: vec![StopTimeUpdate {
                stop_sequence: 20,
                arrival: None,
                departure: Some(TimeUpdate::Absolute(21840)),
            }],
        }));
        assert_eq!(result.applied, 0);
        assert!(matches!(
            result.rejected[0].error,
            UpdateError::InconsistentUpdate(_)
        ));

        // nothing was staged: the published snapshot has no overlay
        assert_eq!(publisher.current().num_overlays(), 0);
        let times = current_times(&repository, &publisher, "trip-1");
        assert!(times.is_scheduled());
        assert_eq!(times.departure_time(1), 21960);
    }

    #[test]
    fn test_unknown_trip_rejected_without_poisoning_batch() {
        let (repository, publisher, _) = fixture();
        let mut updates = UpdateBatch::new(FEED);
        updates.push(UpdateMessage::Cancel {
            trip: trip_ref("ghost"),
        });
        updates.push(UpdateMessage::Delay {
            trip: trip_ref("trip-1"),
            stop_updates: vec![StopTimeUpdate::delay(20, 60)],
        });
        let result = applier(&repository, &publisher).apply(&updates);

        assert_eq!(result.applied, 1);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].index, 0);
        assert!(matches!(
            result.rejected[0].error,
            UpdateError::UnknownTrip(_, _)
        ));
        // the valid record still committed
        let times = current_times(&repository, &publisher, "trip-1");
        assert_eq!(times.arrival_delay(1), 60);
    }

    #[test]
    fn test_unknown_stop_sequence_rejected() {
        let (repository, publisher, _) = fixture();
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::SkipStop {
            trip: trip_ref("trip-1"),
            stop_sequence: 99,
        }));
        assert!(matches!(
            result.rejected[0].error,
            UpdateError::UnknownStopSequence(_, 99)
        ));
    }

    #[test]
    fn test_cancellation() {
        let (repository, publisher, _) = fixture();
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::Cancel {
            trip: trip_ref("trip-1"),
        }));
        assert!(result.is_fully_applied());

        let times = current_times(&repository, &publisher, "trip-1");
        assert!(times.is_canceled());
        // cancelling does not alter any time
        assert_eq!(times.arrival_time(0), 21600);
        assert_eq!(times.departure_time(1), 21960);
    }

    #[test]
    fn test_skipped_stop() {
        let (repository, publisher, _) = fixture();
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::SkipStop {
            trip: trip_ref("trip-1"),
            stop_sequence: 20,
        }));
        assert!(result.is_fully_applied());

        let times = current_times(&repository, &publisher, "trip-1");
        assert!(times.is_stop_cancelled(1));
        assert!(!times.is_stop_cancelled(0));
        assert_eq!(times.arrival_time(1), 21900);
    }

    #[test]
    fn test_prediction_inaccurate_flag() {
        let (repository, publisher, _) = fixture();
        let result = applier(&repository, &publisher).apply(&batch(
            UpdateMessage::PredictionInaccurate {
                trip: trip_ref("trip-1"),
                stop_sequence: 30,
            },
        ));
        assert!(result.is_fully_applied());

        let times = current_times(&repository, &publisher, "trip-1");
        assert!(times.is_prediction_inaccurate(2));
        // observational only: times are untouched
        assert_eq!(times.arrival_time(2), 22500);
    }

    #[test]
    fn test_observation_pins_times_and_records_stop() {
        let (repository, publisher, _) = fixture();
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::Observation {
            trip: trip_ref("trip-1"),
            stop_sequence: 20,
            arrival_time: Some(21930),
            departure_time: Some(21990),
        }));
        assert!(result.is_fully_applied());

        let times = current_times(&repository, &publisher, "trip-1");
        assert!(times.is_recorded(1));
        assert_eq!(times.arrival_time(1), 21930);
        assert_eq!(times.departure_time(1), 21990);
    }

    #[test]
    fn test_added_trip_on_matching_pattern() {
        let (repository, publisher, route) = fixture();
        // same stops and rules as the scheduled pattern
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::Added(
            AddedTrip {
                trip: trip_ref("extra-1"),
                route: route.clone(),
                direction: Direction::Outbound,
                headsign: Some("Messe".to_owned()),
                stop_times: stop_times(&[
                    ("a", 36000, 36000, 1),
                    ("b", 36300, 36300, 2),
                    ("c", 36900, 36900, 3),
                ]),
            },
        )));
        assert!(result.is_fully_applied(), "{}", result.summary());

        // the run landed in the scheduled pattern's overlay
        let pattern = repository
            .pattern_for_trip(&FeedScopedId::new(FEED, "trip-1"))
            .expect("pattern present")
            .clone();
        let snapshot = publisher.current();
        let timetable = snapshot.resolve(&pattern, service_date());
        let added = timetable
            .trip_times_for_trip(&FeedScopedId::new(FEED, "extra-1"))
            .expect("added trip present");
        assert_eq!(added.real_time_state(), RealTimeState::Added);
        assert_eq!(added.headsign(0), Some("Messe"));
        assert_eq!(added.arrival_time(1), 36300);
    }

    #[test]
    fn test_added_trip_synthesizes_pattern() {
        let (repository, publisher, route) = fixture();
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::Added(
            AddedTrip {
                trip: trip_ref("extra-2"),
                route,
                direction: Direction::Unknown,
                headsign: None,
                stop_times: stop_times(&[("a", 36000, 36000, 1), ("x", 36600, 36600, 2)]),
            },
        )));
        assert!(result.is_fully_applied(), "{}", result.summary());

        let snapshot = publisher.current();
        let trip_id = FeedScopedId::new(FEED, "extra-2");
        let pattern = snapshot
            .added_pattern(&trip_id, service_date())
            .expect("pattern synthesized")
            .clone();
        assert!(pattern.created_by_realtime());
        let times = snapshot
            .resolve(&pattern, service_date())
            .trip_times_for_trip(&trip_id)
            .expect("added trip present");
        assert_eq!(times.real_time_state(), RealTimeState::Added);
        assert_eq!(times.departure_time(1), 36600);
    }

    #[test]
    fn test_added_trip_rejected_when_synthesis_disabled() {
        let (repository, publisher, route) = fixture();
        let applier = UpdateApplier::new(repository, publisher)
            .with_pattern_policy(PatternSynthesisPolicy::Reject);
        let result = applier.apply(&batch(UpdateMessage::Added(AddedTrip {
            trip: trip_ref("extra-3"),
            route,
            direction: Direction::Unknown,
            headsign: None,
            stop_times: stop_times(&[("a", 36000, 36000, 1), ("y", 36600, 36600, 2)]),
        })));
        assert_eq!(result.applied, 0);
        assert!(matches!(
            result.rejected[0].error,
            UpdateError::PatternStructureRequired(_)
        ));
    }

    #[test]
    fn test_modified_trip_moves_pattern_and_hides_original() {
        let (repository, publisher, _) = fixture();
        // trip-1 diverts: skips b, calls at d instead
        let result = applier(&repository, &publisher).apply(&batch(UpdateMessage::Modified {
            trip: trip_ref("trip-1"),
            stop_times: stop_times(&[
                ("a", 21600, 21600, 10),
                ("d", 22200, 22200, 25),
                ("c", 22800, 22800, 30),
            ]),
        }));
        assert!(result.is_fully_applied(), "{}", result.summary());

        let snapshot = publisher.current();
        let trip_id = FeedScopedId::new(FEED, "trip-1");

        // the diverted run lives on a synthesized pattern
        let diverted_pattern = snapshot
            .added_pattern(&trip_id, service_date())
            .expect("pattern synthesized")
            .clone();
        let diverted = snapshot
            .resolve(&diverted_pattern, service_date())
            .trip_times_for_trip(&trip_id)
            .expect("diverted trip present");
        assert_eq!(diverted.real_time_state(), RealTimeState::Modified);
        assert_eq!(diverted.arrival_time(2), 22800);

        // the scheduled pattern hides the run for that day
        let original_pattern = repository
            .pattern_for_trip(&trip_id)
            .expect("pattern present")
            .clone();
        let displaced = snapshot
            .resolve(&original_pattern, service_date())
            .trip_times_for_trip(&trip_id)
            .expect("original entry present");
        assert!(displaced.is_canceled());
    }

    #[test]
    fn test_reader_isolation_across_batches() {
        let (repository, publisher, _) = fixture();
        let reader_view = publisher.current();

        applier(&repository, &publisher).apply(&batch(UpdateMessage::Delay {
            trip: trip_ref("trip-1"),
            stop_updates: vec![StopTimeUpdate::delay(20, 600)],
        }));

        // the reader's snapshot predates the commit and still has no overlay
        assert_eq!(reader_view.num_overlays(), 0);
        assert_eq!(publisher.current().num_overlays(), 1);
    }
}
