// Snapshot Store: last authoritative copy of the hotel, replaced wholesale on every applied load.
// Loads are fenced by ticket so a late response for an older request is dropped.

use crate::client::ServiceError;
use crate::hotel::HotelProfile;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub hotel_id: String,
    pub profile: Arc<HotelProfile>,
    pub fetched_at: DateTime<Utc>,
}

// Issued when a load starts; only the most recently issued ticket may complete it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    hotel_id: String,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn hotel_id(&self) -> &str {
        &self.hotel_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    // A newer load was started after this one; its result was discarded
    Stale,
    // Prior snapshot (if any) kept
    Failed(ServiceError),
}

#[derive(Debug)]
pub struct SnapshotStore {
    current: Option<Snapshot>,
    loading: bool,
    issued: u64,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    // Starts out loading: nothing has been fetched yet
    pub fn new() -> Self {
        Self {
            current: None,
            loading: true,
            issued: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn profile(&self) -> Option<Arc<HotelProfile>> {
        self.current.as_ref().map(|s| Arc::clone(&s.profile))
    }

    pub fn begin_load(&mut self, hotel_id: impl Into<String>) -> LoadTicket {
        self.issued += 1;
        self.loading = true;
        LoadTicket {
            seq: self.issued,
            hotel_id: hotel_id.into(),
        }
    }

    pub fn is_latest(&self, ticket: &LoadTicket) -> bool {
        ticket.seq == self.issued
    }

    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<HotelProfile, ServiceError>,
    ) -> LoadOutcome {
        if !self.is_latest(ticket) {
            return LoadOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(profile) => {
                self.current = Some(Snapshot {
                    hotel_id: ticket.hotel_id.clone(),
                    profile: Arc::new(profile),
                    fetched_at: Utc::now(),
                });
                LoadOutcome::Applied
            }
            Err(err) => LoadOutcome::Failed(err),
        }
    }
}
