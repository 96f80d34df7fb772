mod publisher;
mod snapshot_error;
mod timetable_snapshot;

pub use publisher::{SnapshotBuilder, SnapshotPublisher};
pub use snapshot_error::SnapshotError;
pub use timetable_snapshot::TimetableSnapshot;
