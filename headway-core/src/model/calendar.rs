use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::FeedScopedId;

/// service code given to trip-times vectors synthesized by real-time updates.
/// such runs exist only inside a dated overlay timetable, which is their
/// calendar; they never match a scheduled service code.
pub const SERVICE_CODE_REALTIME: usize = usize::MAX;

/// the service-day calendar: which services run on which dates.
///
/// feed service ids are mapped to dense integer codes once during build so
/// that trip-times vectors carry a `usize` instead of a shared string, and
/// the router filters a timetable with a set of codes for its search date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceCalendar {
    codes: HashMap<FeedScopedId, usize>,
    ids: Vec<FeedScopedId>,
    running: HashMap<NaiveDate, HashSet<usize>>,
}

impl ServiceCalendar {
    pub fn new() -> ServiceCalendar {
        ServiceCalendar::default()
    }

    /// returns the dense code for a service id, assigning the next one on
    /// first sight.
    pub fn service_code(&mut self, service_id: &FeedScopedId) -> usize {
        if let Some(code) = self.codes.get(service_id) {
            return *code;
        }
        let code = self.ids.len();
        self.codes.insert(service_id.clone(), code);
        self.ids.push(service_id.clone());
        code
    }

    pub fn lookup_code(&self, service_id: &FeedScopedId) -> Option<usize> {
        self.codes.get(service_id).copied()
    }

    pub fn service_id(&self, code: usize) -> Option<&FeedScopedId> {
        self.ids.get(code)
    }

    /// marks the service as running on `date`.
    pub fn add_service_date(&mut self, code: usize, date: NaiveDate) {
        self.running.entry(date).or_default().insert(code);
    }

    pub fn remove_service_date(&mut self, code: usize, date: NaiveDate) {
        if let Some(codes) = self.running.get_mut(&date) {
            codes.remove(&code);
        }
    }

    /// the set of service codes running on `date`.
    pub fn running_on(&self, date: NaiveDate) -> HashSet<usize> {
        self.running.get(&date).cloned().unwrap_or_default()
    }

    pub fn is_running(&self, code: usize, date: NaiveDate) -> bool {
        self.running
            .get(&date)
            .map(|codes| codes.contains(&code))
            .unwrap_or(false)
    }

    pub fn num_services(&self) -> usize {
        self.ids.len()
    }
}
