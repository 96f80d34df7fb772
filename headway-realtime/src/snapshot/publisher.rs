use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::NaiveDate;

use headway_core::timetable::{TripPattern, TripTimes};

use crate::snapshot::{SnapshotError, TimetableSnapshot};

/// owns the published [`TimetableSnapshot`] and the commit protocol.
///
/// readers take the current snapshot with one short read-locked pointer
/// clone and then work lock-free against it for as long as they like; a
/// superseded snapshot lives until its last reader drops it. writers are
/// serialized by the builder mutex and never block readers: the only write
/// under the pointer lock is the swap itself.
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    current: RwLock<Arc<TimetableSnapshot>>,
    writer: Mutex<()>,
}

impl SnapshotPublisher {
    pub fn new() -> SnapshotPublisher {
        SnapshotPublisher::default()
    }

    /// the currently published snapshot. non-blocking in practice: the read
    /// lock is only contended for the duration of a pointer swap.
    pub fn current(&self) -> Arc<TimetableSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// acquires the single-writer builder, seeded with a shallow copy of the
    /// published snapshot. holding the builder blocks other writers only.
    pub fn begin(&self) -> SnapshotBuilder<'_> {
        let writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.current().thaw();
        SnapshotBuilder {
            publisher: self,
            snapshot,
            _writer: writer,
        }
    }
}

/// a dirty snapshot under construction by the single updater holding it.
/// dropping the builder without committing discards every staged change and
/// leaves the previous snapshot published.
pub struct SnapshotBuilder<'a> {
    publisher: &'a SnapshotPublisher,
    snapshot: TimetableSnapshot,
    _writer: MutexGuard<'a, ()>,
}

impl SnapshotBuilder<'_> {
    /// the staged state, including changes from earlier in this batch.
    pub fn snapshot(&self) -> &TimetableSnapshot {
        &self.snapshot
    }

    /// stages a replacement trip-times vector for one pattern-day.
    pub fn update(
        &mut self,
        pattern: &Arc<TripPattern>,
        date: NaiveDate,
        trip_times: Arc<TripTimes>,
    ) -> Result<(), SnapshotError> {
        self.snapshot.update(pattern, date, trip_times)
    }

    /// freezes the staged snapshot and atomically publishes it. every change
    /// in the batch becomes visible together; readers holding the previous
    /// snapshot are unaffected.
    pub fn commit(self) -> Arc<TimetableSnapshot> {
        let SnapshotBuilder {
            publisher,
            mut snapshot,
            _writer,
        } = self;
        snapshot.freeze();
        log::info!(
            "publishing timetable snapshot with {} pattern-day overlays",
            snapshot.num_overlays()
        );
        let frozen = Arc::new(snapshot);
        *publisher
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = frozen.clone();
        frozen
    }
}
