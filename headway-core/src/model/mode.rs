use serde::{Deserialize, Serialize};

/// scheduled transit modes, one per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitMode {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
    Trolleybus,
    Monorail,
}

impl TransitMode {
    /// maps a GTFS `route_type` code to a mode, covering the basic table and
    /// the extended european code ranges seen in the wild.
    pub fn from_gtfs_route_type(route_type: i32) -> Option<TransitMode> {
        match route_type {
            0 => Some(TransitMode::Tram),
            1 => Some(TransitMode::Subway),
            2 => Some(TransitMode::Rail),
            3 => Some(TransitMode::Bus),
            4 => Some(TransitMode::Ferry),
            5 => Some(TransitMode::CableCar),
            6 => Some(TransitMode::Gondola),
            7 => Some(TransitMode::Funicular),
            11 => Some(TransitMode::Trolleybus),
            12 => Some(TransitMode::Monorail),
            100..=199 => Some(TransitMode::Rail),
            200..=299 => Some(TransitMode::Bus),
            400..=404 => Some(TransitMode::Subway),
            405 => Some(TransitMode::Monorail),
            700..=799 => Some(TransitMode::Bus),
            800..=899 => Some(TransitMode::Trolleybus),
            900..=999 => Some(TransitMode::Tram),
            1000..=1199 => Some(TransitMode::Ferry),
            1200..=1299 => Some(TransitMode::Ferry),
            1300..=1399 => Some(TransitMode::Gondola),
            1400..=1499 => Some(TransitMode::Funicular),
            _ => None,
        }
    }
}
