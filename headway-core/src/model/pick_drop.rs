use serde::{Deserialize, Serialize};

/// boarding or alighting rule at one stop of one trip.
///
/// `Cancelled` only ever originates from real-time updates: a skipped stop is
/// expressed as both rules cancelled, leaving the scheduled times in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickDrop {
    #[default]
    Regular,
    None,
    Phone,
    CoordinateWithDriver,
    Cancelled,
}

impl PickDrop {
    /// maps a GTFS `pickup_type` / `drop_off_type` code.
    pub fn from_gtfs_code(code: u8) -> Option<PickDrop> {
        match code {
            0 => Some(PickDrop::Regular),
            1 => Some(PickDrop::None),
            2 => Some(PickDrop::Phone),
            3 => Some(PickDrop::CoordinateWithDriver),
            _ => None,
        }
    }

    /// true when a rider can use the stop under this rule, possibly with
    /// prior arrangement.
    pub fn is_routable(&self) -> bool {
        !matches!(self, PickDrop::None | PickDrop::Cancelled)
    }

    pub fn is_not_routable(&self) -> bool {
        !self.is_routable()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PickDrop::Cancelled)
    }
}
