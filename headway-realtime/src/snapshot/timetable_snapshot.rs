use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use indexmap::IndexMap;

use headway_core::model::FeedScopedId;
use headway_core::timetable::{Timetable, TimetableRepository, TripPattern, TripTimes};

use crate::snapshot::SnapshotError;

/// a layered view of the transit schedule at one point in commit time.
///
/// only pattern-days touched by real-time data carry an overlay timetable;
/// everything else resolves to the scheduled timetable of the pattern, so the
/// cost of a snapshot is proportional to update churn, not feed size. while
/// `dirty`, exactly one updater mutates it through the builder; `commit`
/// freezes it, after which it is shared immutably with every reader that
/// picks it up.
#[derive(Debug, Clone, Default)]
pub struct TimetableSnapshot {
    realtime_timetables: IndexMap<(FeedScopedId, NaiveDate), Arc<Timetable>>,
    /// patterns synthesized for added or re-routed trips, by trip id and day.
    last_added_trip_patterns: HashMap<(FeedScopedId, NaiveDate), Arc<TripPattern>>,
    dirty: bool,
}

impl TimetableSnapshot {
    /// an empty, frozen snapshot: the state before any update arrives.
    pub fn new() -> TimetableSnapshot {
        TimetableSnapshot::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// number of pattern-day overlays this snapshot carries.
    pub fn num_overlays(&self) -> usize {
        self.realtime_timetables.len()
    }

    /// the effective timetable for a pattern on a service date: the overlay
    /// when real-time data touched that pattern-day, else the schedule.
    pub fn resolve<'a>(&'a self, pattern: &'a TripPattern, date: NaiveDate) -> &'a Timetable {
        match self
            .realtime_timetables
            .get(&(pattern.id().clone(), date))
        {
            Some(timetable) => timetable,
            None => pattern.scheduled_timetable(),
        }
    }

    pub fn has_overlay(&self, pattern_id: &FeedScopedId, date: NaiveDate) -> bool {
        self.realtime_timetables
            .contains_key(&(pattern_id.clone(), date))
    }

    /// locates the effective trip-times vector of one trip on one date,
    /// whether the trip is scheduled or was added by a real-time message.
    pub fn trip_times_for(
        &self,
        repository: &TimetableRepository,
        trip_id: &FeedScopedId,
        date: NaiveDate,
    ) -> Option<Arc<TripTimes>> {
        let pattern = repository
            .pattern_for_trip(trip_id)
            .or_else(|| self.added_pattern(trip_id, date))?;
        self.resolve(pattern, date)
            .trip_times_for_trip(trip_id)
            .cloned()
    }

    /// the pattern synthesized for a real-time-added trip, when one exists.
    pub fn added_pattern(
        &self,
        trip_id: &FeedScopedId,
        date: NaiveDate,
    ) -> Option<&Arc<TripPattern>> {
        self.last_added_trip_patterns.get(&(trip_id.clone(), date))
    }

    /// stages a replacement trip-times vector for one pattern-day.
    ///
    /// copy-on-write at timetable granularity: the first write to a
    /// pattern-day clones its timetable (scheduled or previous overlay);
    /// later writes in the same batch mutate that clone in place through
    /// another cheap clone of `Arc` handles.
    pub fn update(
        &mut self,
        pattern: &Arc<TripPattern>,
        date: NaiveDate,
        trip_times: Arc<TripTimes>,
    ) -> Result<(), SnapshotError> {
        if !self.dirty {
            return Err(SnapshotError::Frozen);
        }
        let key = (pattern.id().clone(), date);
        let mut timetable = match self.realtime_timetables.get(&key) {
            Some(existing) => Timetable::clone(existing),
            None => pattern.scheduled_timetable().clone(),
        };
        if pattern.created_by_realtime() {
            self.last_added_trip_patterns
                .insert((trip_times.trip().id.clone(), date), pattern.clone());
        }
        timetable.replace_trip_times(trip_times);
        self.realtime_timetables.insert(key, Arc::new(timetable));
        Ok(())
    }

    /// a mutable shallow copy: untouched pattern-days keep sharing their
    /// timetables with the published snapshot.
    pub(crate) fn thaw(&self) -> TimetableSnapshot {
        let mut copy = self.clone();
        copy.dirty = true;
        copy
    }

    pub(crate) fn freeze(&mut self) {
        self.dirty = false;
    }
}
