use serde::{Deserialize, Serialize};

/// the relationship between a trip-times vector and the printed schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealTimeState {
    /// times come straight from the static feed.
    #[default]
    Scheduled,
    /// a real-time overlay replaces the scheduled times.
    Updated,
    /// the whole run is cancelled; times are kept for display.
    Canceled,
    /// the run was created by a real-time message and has no scheduled counterpart.
    Added,
    /// the run was re-routed or re-timed by a real-time message.
    Modified,
}

impl RealTimeState {
    /// true for every state except [`RealTimeState::Scheduled`].
    pub fn is_realtime(&self) -> bool {
        !matches!(self, RealTimeState::Scheduled)
    }
}
