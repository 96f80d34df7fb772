use std::sync::Arc;

use itertools::Itertools;

use crate::dedup::Deduplicator;
use crate::model::{BookingInfo, PickDrop, RealTimeState, StopTime, Trip};
use crate::timetable::TimetableError;
use crate::util::BitSet;

/// arrival and departure times for one run of one trip on one service day,
/// with the per-stop metadata the router reads.
///
/// stop-indexed data is kept in parallel primitive arrays. the scheduled
/// arrays are normalized so the first arrival is zero and the original value
/// lives in `time_shift`; equal arrays are shared across trips through the
/// [`Deduplicator`], and frequency-based runs are clones differing only in
/// their shift. a real-time overlay, when present, holds absolute times and
/// is owned by the snapshot that produced it.
///
/// scheduled instances are shared behind `Arc` and never mutated; the update
/// pipeline clones the value out of the `Arc`, mutates its copy, and stages
/// the copy into a new snapshot.
#[derive(Debug, Clone)]
pub struct TripTimes {
    trip: Arc<Trip>,
    service_code: usize,
    /// seconds added to every scheduled value to recover actual times.
    time_shift: i32,
    scheduled_arrival_times: Arc<[i32]>,
    scheduled_departure_times: Arc<[i32]>,
    /// absolute real-time times; always both present or both absent.
    arrival_times: Option<Box<[i32]>>,
    departure_times: Option<Box<[i32]>>,
    /// stops where the vehicle has been observed rather than predicted.
    recorded: Option<BitSet>,
    /// stops whose prediction exists but is known to be low quality.
    prediction_inaccurate: Option<BitSet>,
    pickups: Arc<[PickDrop]>,
    dropoffs: Arc<[PickDrop]>,
    pickup_booking_info: Option<Arc<[Option<Arc<BookingInfo>>]>>,
    drop_off_booking_info: Option<Arc<[Option<Arc<BookingInfo>>]>>,
    /// per-stop overrides; absent means the trip headsign applies everywhere.
    headsigns: Option<Arc<[Option<String>]>>,
    /// feed-declared sequence numbers, the address space of real-time messages.
    original_gtfs_stop_sequence: Arc<[u32]>,
    timepoints: Arc<BitSet>,
    real_time_state: RealTimeState,
}

impl TripTimes {
    /// builds the scheduled times vector for `trip` from its ordered stop
    /// times, interning every shared array.
    ///
    /// a stop missing one of arrival/departure takes the other value; missing
    /// both, or any negative dwell or hop, rejects the trip.
    pub fn new(
        trip: Arc<Trip>,
        service_code: usize,
        stop_times: &[StopTime],
        deduplicator: &mut Deduplicator,
    ) -> Result<TripTimes, TimetableError> {
        if stop_times.is_empty() {
            return Err(TimetableError::MalformedSchedule(
                trip.id.clone(),
                "trip has no stop times".to_owned(),
            ));
        }

        let mut resolved = Vec::with_capacity(stop_times.len());
        for stop_time in stop_times {
            let (arrival, departure) = match (stop_time.arrival_time, stop_time.departure_time) {
                (Some(arrival), Some(departure)) => (arrival, departure),
                (Some(arrival), None) => (arrival, arrival),
                (None, Some(departure)) => (departure, departure),
                (None, None) => {
                    return Err(TimetableError::MalformedSchedule(
                        trip.id.clone(),
                        format!(
                            "stop sequence {} has neither arrival nor departure time",
                            stop_time.stop_sequence
                        ),
                    ));
                }
            };
            resolved.push((arrival, departure));
        }

        let time_shift = resolved[0].0;
        let mut arrivals = Vec::with_capacity(resolved.len());
        let mut departures = Vec::with_capacity(resolved.len());
        for (index, (arrival, departure)) in resolved.iter().enumerate() {
            if departure < arrival {
                let message = format!("negative dwell time at stop index {index}");
                log::warn!("rejecting trip {}: {message}", trip.id);
                return Err(TimetableError::MalformedSchedule(trip.id.clone(), message));
            }
            if index + 1 < resolved.len() && resolved[index + 1].0 < *departure {
                let message = format!("negative running time after stop index {index}");
                log::warn!("rejecting trip {}: {message}", trip.id);
                return Err(TimetableError::MalformedSchedule(trip.id.clone(), message));
            }
            arrivals.push(arrival - time_shift);
            departures.push(departure - time_shift);
        }

        let needs_headsign_array = stop_times.iter().any(|st| {
            match (&st.stop_headsign, &trip.headsign) {
                (None, _) => false,
                (Some(stop_headsign), Some(trip_headsign)) => stop_headsign != trip_headsign,
                (Some(_), None) => true,
            }
        });
        let headsigns = needs_headsign_array.then(|| {
            deduplicator
                .intern_string_array(stop_times.iter().map(|st| st.stop_headsign.clone()).collect())
        });

        let pickup_booking: Vec<Option<Arc<BookingInfo>>> = stop_times
            .iter()
            .map(|st| st.pickup_booking_info.clone())
            .collect();
        let drop_off_booking: Vec<Option<Arc<BookingInfo>>> = stop_times
            .iter()
            .map(|st| st.drop_off_booking_info.clone())
            .collect();

        Ok(TripTimes {
            trip,
            service_code,
            time_shift,
            scheduled_arrival_times: deduplicator.intern_int_array(arrivals),
            scheduled_departure_times: deduplicator.intern_int_array(departures),
            arrival_times: None,
            departure_times: None,
            recorded: None,
            prediction_inaccurate: None,
            pickups: deduplicator.intern_list(stop_times.iter().map(|st| st.pickup).collect()),
            dropoffs: deduplicator.intern_list(stop_times.iter().map(|st| st.drop_off).collect()),
            pickup_booking_info: pickup_booking
                .iter()
                .any(Option::is_some)
                .then(|| deduplicator.intern_list(pickup_booking)),
            drop_off_booking_info: drop_off_booking
                .iter()
                .any(Option::is_some)
                .then(|| deduplicator.intern_list(drop_off_booking)),
            headsigns,
            original_gtfs_stop_sequence: deduplicator
                .intern_sequence_array(stop_times.iter().map(|st| st.stop_sequence).collect()),
            timepoints: deduplicator
                .intern_bit_set(stop_times.iter().map(|st| st.timepoint).collect()),
            real_time_state: RealTimeState::Scheduled,
        })
    }

    pub fn trip(&self) -> &Arc<Trip> {
        &self.trip
    }

    pub fn service_code(&self) -> usize {
        self.service_code
    }

    pub fn time_shift(&self) -> i32 {
        self.time_shift
    }

    pub fn num_stops(&self) -> usize {
        self.scheduled_arrival_times.len()
    }

    pub fn real_time_state(&self) -> RealTimeState {
        self.real_time_state
    }

    /// effective arrival at `stop`: the overlay when present, else schedule.
    pub fn arrival_time(&self, stop: usize) -> i32 {
        match &self.arrival_times {
            Some(times) => times[stop],
            None => self.scheduled_arrival_time(stop),
        }
    }

    /// effective departure from `stop`.
    pub fn departure_time(&self, stop: usize) -> i32 {
        match &self.departure_times {
            Some(times) => times[stop],
            None => self.scheduled_departure_time(stop),
        }
    }

    pub fn scheduled_arrival_time(&self, stop: usize) -> i32 {
        self.scheduled_arrival_times[stop] + self.time_shift
    }

    pub fn scheduled_departure_time(&self, stop: usize) -> i32 {
        self.scheduled_departure_times[stop] + self.time_shift
    }

    /// seconds behind (positive) or ahead of (negative) schedule on arrival.
    pub fn arrival_delay(&self, stop: usize) -> i32 {
        self.arrival_time(stop) - self.scheduled_arrival_time(stop)
    }

    pub fn departure_delay(&self, stop: usize) -> i32 {
        self.departure_time(stop) - self.scheduled_departure_time(stop)
    }

    pub fn dwell_time(&self, stop: usize) -> i32 {
        self.departure_time(stop) - self.arrival_time(stop)
    }

    /// seconds from departing `stop` to arriving at the next one.
    pub fn running_time(&self, stop: usize) -> i32 {
        self.arrival_time(stop + 1) - self.departure_time(stop)
    }

    /// the key the owning timetable sorts by.
    pub fn sort_index(&self) -> i32 {
        self.arrival_time(0)
    }

    pub fn is_scheduled(&self) -> bool {
        self.real_time_state == RealTimeState::Scheduled
    }

    pub fn is_canceled(&self) -> bool {
        self.real_time_state == RealTimeState::Canceled
    }

    pub fn is_recorded(&self, stop: usize) -> bool {
        self.recorded.as_ref().map(|set| set.get(stop)).unwrap_or(false)
    }

    pub fn is_prediction_inaccurate(&self, stop: usize) -> bool {
        self.prediction_inaccurate
            .as_ref()
            .map(|set| set.get(stop))
            .unwrap_or(false)
    }

    pub fn is_timepoint(&self, stop: usize) -> bool {
        self.timepoints.get(stop)
    }

    pub fn pickup(&self, stop: usize) -> PickDrop {
        self.pickups[stop]
    }

    pub fn dropoff(&self, stop: usize) -> PickDrop {
        self.dropoffs[stop]
    }

    /// a stop is cancelled when neither boarding nor alighting remains.
    pub fn is_stop_cancelled(&self, stop: usize) -> bool {
        self.pickups[stop].is_cancelled() && self.dropoffs[stop].is_cancelled()
    }

    /// the headsign shown at `stop`: the per-stop override when one exists,
    /// else the trip headsign.
    pub fn headsign(&self, stop: usize) -> Option<&str> {
        self.headsigns
            .as_ref()
            .and_then(|headsigns| headsigns[stop].as_deref())
            .or(self.trip.headsign.as_deref())
    }

    pub fn pickup_booking_info(&self, stop: usize) -> Option<&Arc<BookingInfo>> {
        self.pickup_booking_info
            .as_ref()
            .and_then(|infos| infos[stop].as_ref())
    }

    pub fn drop_off_booking_info(&self, stop: usize) -> Option<&Arc<BookingInfo>> {
        self.drop_off_booking_info
            .as_ref()
            .and_then(|infos| infos[stop].as_ref())
    }

    /// feed-declared sequence number of the stop at array index `stop`.
    pub fn gtfs_sequence(&self, stop: usize) -> u32 {
        self.original_gtfs_stop_sequence[stop]
    }

    /// array index of the stop with feed-declared sequence `sequence`.
    /// sequence numbers need not be contiguous, so this is a scan.
    pub fn stop_index_of_gtfs_sequence(&self, sequence: u32) -> Option<usize> {
        self.original_gtfs_stop_sequence
            .iter()
            .position(|s| *s == sequence)
    }

    /// replaces the arrival at `stop` with an absolute time, materializing
    /// the overlay on first use.
    pub fn update_arrival_time(&mut self, stop: usize, time: i32) {
        self.materialize_overlay();
        if let Some(times) = &mut self.arrival_times {
            times[stop] = time;
        }
    }

    pub fn update_departure_time(&mut self, stop: usize, time: i32) {
        self.materialize_overlay();
        if let Some(times) = &mut self.departure_times {
            times[stop] = time;
        }
    }

    /// sets the arrival at `stop` to schedule plus `delay` seconds.
    /// a later delay for the same stop replaces the earlier one.
    pub fn update_arrival_delay(&mut self, stop: usize, delay: i32) {
        self.update_arrival_time(stop, self.scheduled_arrival_time(stop) + delay);
    }

    pub fn update_departure_delay(&mut self, stop: usize, delay: i32) {
        self.update_departure_time(stop, self.scheduled_departure_time(stop) + delay);
    }

    /// cancels the whole run. times are left in place for display; repeated
    /// cancellation has no further effect.
    pub fn cancel(&mut self) {
        self.real_time_state = RealTimeState::Canceled;
    }

    pub fn mark_added(&mut self) {
        self.real_time_state = RealTimeState::Added;
    }

    pub fn mark_modified(&mut self) {
        self.real_time_state = RealTimeState::Modified;
    }

    /// cancels a single stop: both boarding rules become `Cancelled`, times
    /// are untouched. the shared rule arrays are copied on first write.
    pub fn cancel_stop(&mut self, stop: usize) {
        let mut pickups = self.pickups.to_vec();
        pickups[stop] = PickDrop::Cancelled;
        self.pickups = Arc::from(pickups);
        let mut dropoffs = self.dropoffs.to_vec();
        dropoffs[stop] = PickDrop::Cancelled;
        self.dropoffs = Arc::from(dropoffs);
    }

    pub fn set_recorded(&mut self, stop: usize, recorded: bool) {
        let num_stops = self.num_stops();
        self.recorded
            .get_or_insert_with(|| BitSet::new(num_stops))
            .assign(stop, recorded);
    }

    pub fn set_prediction_inaccurate(&mut self, stop: usize, inaccurate: bool) {
        let num_stops = self.num_stops();
        self.prediction_inaccurate
            .get_or_insert_with(|| BitSet::new(num_stops))
            .assign(stop, inaccurate);
    }

    /// sweeps the effective times and reports whether every dwell and hop is
    /// non-negative. callers reject the offending update when this fails.
    pub fn times_increasing(&self) -> bool {
        let dwells_ok =
            (0..self.num_stops()).all(|stop| self.arrival_time(stop) <= self.departure_time(stop));
        let hops_ok = (0..self.num_stops())
            .tuple_windows()
            .all(|(stop, next)| self.departure_time(stop) <= self.arrival_time(next));
        dwells_ok && hops_ok
    }

    /// a clone whose shift makes the arrival (or departure, when `depart`) at
    /// `stop` equal `time`. this is how frequency-based services materialize
    /// runs without copying the time arrays. `None` when an overlay exists:
    /// shifting is only meaningful for purely scheduled times.
    pub fn time_shifted_copy(&self, stop: usize, time: i32, depart: bool) -> Option<TripTimes> {
        if self.arrival_times.is_some() || self.departure_times.is_some() {
            return None;
        }
        let scheduled = if depart {
            self.scheduled_departure_times[stop]
        } else {
            self.scheduled_arrival_times[stop]
        };
        let mut copy = self.clone();
        copy.time_shift = time - scheduled;
        Some(copy)
    }

    /// stable fingerprint of the interior scheduled hop times, excluding the
    /// first arrival and last departure so that shifting a whole trip leaves
    /// the hash unchanged. used to match trips across feed versions.
    pub fn semantic_hash(&self) -> u64 {
        const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        fn mix(hash: &mut u64, value: i32) {
            for byte in value.to_le_bytes() {
                *hash ^= byte as u64;
                *hash = hash.wrapping_mul(FNV_PRIME);
            }
        }

        let n = self.num_stops();
        let mut hash = FNV_OFFSET_BASIS;
        mix(&mut hash, n as i32);
        if n > 1 {
            mix(&mut hash, self.scheduled_departure_times[0]);
            for stop in 1..n - 1 {
                mix(&mut hash, self.scheduled_arrival_times[stop]);
                mix(&mut hash, self.scheduled_departure_times[stop]);
            }
            mix(&mut hash, self.scheduled_arrival_times[n - 1]);
        }
        hash
    }

    /// clones the scheduled times into the overlay arrays, shifted to
    /// absolute values, and leaves the scheduled state behind.
    fn materialize_overlay(&mut self) {
        if self.arrival_times.is_some() {
            return;
        }
        let shift = self.time_shift;
        self.arrival_times = Some(self.scheduled_arrival_times.iter().map(|t| t + shift).collect());
        self.departure_times = Some(
            self.scheduled_departure_times
                .iter()
                .map(|t| t + shift)
                .collect(),
        );
        if self.real_time_state == RealTimeState::Scheduled {
            self.real_time_state = RealTimeState::Updated;
        }
    }
}
