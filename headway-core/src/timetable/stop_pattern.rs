use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dedup::Deduplicator;
use crate::model::{PickDrop, Stop, StopTime};

/// the ordered stops of a pattern with their scheduled boarding rules.
///
/// many trips share one shape; value equality (stops and rules) is the key
/// used to collapse them onto a single pattern, so all three arrays are
/// interned and the whole struct hashes cheaply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StopPattern {
    stops: Arc<[Arc<Stop>]>,
    pickups: Arc<[PickDrop]>,
    dropoffs: Arc<[PickDrop]>,
}

impl StopPattern {
    /// derives the shape of a trip from its ordered stop times.
    pub fn from_stop_times(stop_times: &[StopTime], deduplicator: &mut Deduplicator) -> StopPattern {
        StopPattern {
            stops: deduplicator.intern_list(stop_times.iter().map(|st| st.stop.clone()).collect()),
            pickups: deduplicator.intern_list(stop_times.iter().map(|st| st.pickup).collect()),
            dropoffs: deduplicator.intern_list(stop_times.iter().map(|st| st.drop_off).collect()),
        }
    }

    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn stop(&self, index: usize) -> &Arc<Stop> {
        &self.stops[index]
    }

    pub fn stops(&self) -> impl Iterator<Item = &Arc<Stop>> {
        self.stops.iter()
    }

    pub fn pickup(&self, index: usize) -> PickDrop {
        self.pickups[index]
    }

    pub fn dropoff(&self, index: usize) -> PickDrop {
        self.dropoffs[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::FeedScopedId;

    fn stop(id: &str) -> Arc<Stop> {
        Arc::new(Stop::new(FeedScopedId::new("t", id), id))
    }

    fn stop_times(ids: &[&str]) -> Vec<StopTime> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| StopTime::new(stop(id), index as i32 * 60, index as i32 * 60))
            .collect()
    }

    #[test]
    fn test_equal_shapes_compare_equal() {
        let mut deduplicator = Deduplicator::new();
        let a = StopPattern::from_stop_times(&stop_times(&["a", "b", "c"]), &mut deduplicator);
        let b = StopPattern::from_stop_times(&stop_times(&["a", "b", "c"]), &mut deduplicator);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_boarding_rules_differ() {
        let mut deduplicator = Deduplicator::new();
        let times = stop_times(&["a", "b"]);
        let a = StopPattern::from_stop_times(&times, &mut deduplicator);
        let mut flagged = stop_times(&["a", "b"]);
        flagged[1].pickup = PickDrop::Phone;
        let b = StopPattern::from_stop_times(&flagged, &mut deduplicator);
        assert_ne!(a, b);
    }
}
