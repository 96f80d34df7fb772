#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    /// a mutation reached a snapshot after it was committed. snapshots freeze
    /// at commit; this is a bug in the calling updater, not in the feed.
    #[error("attempt to modify a committed timetable snapshot")]
    Frozen,
}
