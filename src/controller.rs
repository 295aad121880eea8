// Reconciliation Controller
// Loads the snapshot, runs the edit and add-room sessions against the hotel service,
// and re-fetches the snapshot after every successful write.

use crate::client::{ClientError, HotelService, HttpHotelService, ServiceError};
use crate::composer::{ComposeError, RoomComposer};
use crate::config::ClientConfig;
use crate::draft::{DraftEditor, EditError, FieldChange, HotelDraft};
use crate::hotel::HotelProfile;
use crate::room::{CoercionPolicy, RoomChange, RoomDraft, ValidationError};
use crate::session::{SessionError, SessionState};
use crate::snapshot::{LoadOutcome, Snapshot, SnapshotStore};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<ComposeError> for AccountError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::Session(e) => AccountError::Session(e),
            ComposeError::Validation(e) => AccountError::Validation(e),
        }
    }
}

// What a renderer should show for the account
#[derive(Debug, Clone, PartialEq)]
pub enum AccountView {
    Loading,
    NoData,
    Ready(Arc<HotelProfile>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(String),
}

// Operator-facing alerts for actions the operator started
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => info!("{}", message),
            Notification::Failure(message) => warn!("{}", message),
        }
    }
}

pub const ROOM_ADDED: &str = "Room added successfully!";
pub const ROOM_ADD_FAILED: &str = "Failed to add room.";
pub const HOTEL_UPDATE_FAILED: &str = "Failed to update hotel.";

// State is only ever locked between awaits, never across one
pub struct AccountController {
    service: Arc<dyn HotelService>,
    notifier: Arc<dyn Notifier>,
    coercion: CoercionPolicy,
    hotel_id: Mutex<String>,
    store: Mutex<SnapshotStore>,
    editor: Mutex<DraftEditor>,
    composer: Mutex<RoomComposer>,
}

impl AccountController {
    pub fn new(service: Arc<dyn HotelService>, hotel_id: impl Into<String>) -> Self {
        Self {
            service,
            notifier: Arc::new(LogNotifier),
            coercion: CoercionPolicy::default(),
            hotel_id: Mutex::new(hotel_id.into()),
            store: Mutex::new(SnapshotStore::new()),
            editor: Mutex::new(DraftEditor::new()),
            composer: Mutex::new(RoomComposer::new()),
        }
    }

    // Controller talking HTTP to the service at `config.base_url`
    pub fn from_config(
        config: &ClientConfig,
        hotel_id: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let service = HttpHotelService::new(config)?;
        Ok(Self::new(Arc::new(service), hotel_id).with_coercion(config.coercion))
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_coercion(mut self, policy: CoercionPolicy) -> Self {
        self.coercion = policy;
        self
    }

    pub fn hotel_id(&self) -> String {
        self.hotel_id.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.store.lock().is_loading()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.store.lock().snapshot().cloned()
    }

    pub fn view(&self) -> AccountView {
        let store = self.store.lock();
        match store.profile() {
            Some(profile) => AccountView::Ready(profile),
            None if store.is_loading() => AccountView::Loading,
            None => AccountView::NoData,
        }
    }

    // ----- Snapshot -----

    pub async fn mount(&self) -> LoadOutcome {
        self.load().await
    }

    // A new hotel id triggers a load; the same id again is a no-op
    pub async fn set_hotel_id(&self, hotel_id: impl Into<String>) -> Option<LoadOutcome> {
        let hotel_id = hotel_id.into();
        {
            let mut current = self.hotel_id.lock();
            if *current == hotel_id {
                return None;
            }
            *current = hotel_id;
        }
        Some(self.load().await)
    }

    // Failures are logged only: the prior snapshot stays on screen
    #[tracing::instrument(skip_all, fields(hotel_id = %self.hotel_id()))]
    pub async fn load(&self) -> LoadOutcome {
        let ticket = {
            let hotel_id = self.hotel_id();
            self.store.lock().begin_load(hotel_id)
        };
        debug!("Loading hotel {} (request {})", ticket.hotel_id(), ticket.seq());

        let result = self.service.fetch_hotel(ticket.hotel_id()).await;
        let outcome = self.store.lock().complete_load(&ticket, result);

        match &outcome {
            LoadOutcome::Applied => info!("Hotel {} loaded", ticket.hotel_id()),
            LoadOutcome::Stale => debug!(
                "Discarding stale response for hotel {} (request {})",
                ticket.hotel_id(),
                ticket.seq()
            ),
            LoadOutcome::Failed(err) => {
                error!("Error fetching hotel info for {}: {}", ticket.hotel_id(), err)
            }
        }
        outcome
    }

    // ----- Draft Editor -----

    // The draft is bound to the hotel of the snapshot it was seeded from
    pub fn open_for_edit(&self) -> Result<(), SessionError> {
        let (hotel_id, profile) = match self.store.lock().snapshot() {
            Some(snapshot) => (snapshot.hotel_id.clone(), Some(snapshot.profile.clone())),
            None => (self.hotel_id(), None),
        };
        self.editor.lock().open(hotel_id, profile.as_deref())
    }

    pub fn editor_state(&self) -> SessionState {
        self.editor.lock().state()
    }

    pub fn draft(&self) -> Arc<HotelDraft> {
        self.editor.lock().draft()
    }

    pub fn set_field(&self, change: FieldChange) -> Result<(), EditError> {
        self.editor.lock().set_field(change)
    }

    pub fn append_room_type(&self) -> Result<(), EditError> {
        self.editor.lock().append_room_type()
    }

    pub fn edit_room_type(&self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        self.editor.lock().edit_room_type(index, text)
    }

    pub fn remove_room_type(&self, index: usize) -> Result<(), EditError> {
        self.editor.lock().remove_room_type(index)
    }

    // No network call
    pub fn cancel_edit(&self) -> Result<(), SessionError> {
        self.editor.lock().cancel()
    }

    #[tracing::instrument(skip_all, fields(hotel_id = %self.hotel_id()))]
    pub async fn commit_edit(&self) -> Result<LoadOutcome, AccountError> {
        let (hotel_id, draft) = {
            let mut editor = self.editor.lock();
            let draft = editor.begin_commit()?;
            (editor.hotel_id().to_string(), draft)
        };
        debug!("Committing draft for hotel {}", hotel_id);

        let result = self.service.update_hotel(&hotel_id, &draft).await;
        match result {
            Ok(()) => {
                self.editor.lock().commit_succeeded();
                info!("Hotel {} updated successfully", hotel_id);
                Ok(self.load().await)
            }
            Err(err) => {
                self.editor.lock().commit_failed();
                error!("Failed to update hotel {}: {}", hotel_id, err);
                self.notifier.notify(Notification::Failure(format!(
                    "{} {}",
                    HOTEL_UPDATE_FAILED,
                    err.user_message()
                )));
                Err(err.into())
            }
        }
    }

    // ----- Room Composer -----

    pub fn open_add_room(&self) -> Result<(), SessionError> {
        self.composer.lock().open()
    }

    pub fn composer_state(&self) -> SessionState {
        self.composer.lock().state()
    }

    pub fn room_draft(&self) -> Arc<RoomDraft> {
        self.composer.lock().draft()
    }

    pub fn set_room_field(&self, change: RoomChange) -> Result<(), SessionError> {
        self.composer.lock().set(change)
    }

    pub fn cancel_add_room(&self) -> Result<(), SessionError> {
        self.composer.lock().cancel()
    }

    #[tracing::instrument(skip_all, fields(hotel_id = %self.hotel_id()))]
    pub async fn submit_room(&self) -> Result<LoadOutcome, AccountError> {
        let hotel_id = self.hotel_id();
        let prepared = self.composer.lock().prepare_submit(&hotel_id, self.coercion);
        let payload = match prepared {
            Ok(payload) => payload,
            Err(ComposeError::Validation(err)) => {
                warn!("Room for hotel {} not submitted: {}", hotel_id, err);
                self.notifier.notify(Notification::Failure(err.to_string()));
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };

        let result = self.service.create_room(&payload).await;
        match result {
            Ok(()) => {
                self.composer.lock().submit_succeeded();
                self.notifier
                    .notify(Notification::Success(ROOM_ADDED.to_string()));
                Ok(self.load().await)
            }
            Err(err) => {
                self.composer.lock().submit_failed();
                error!("Error adding room to hotel {}: {}", hotel_id, err);
                self.notifier.notify(Notification::Failure(format!(
                    "{} {}",
                    ROOM_ADD_FAILED,
                    err.user_message()
                )));
                Err(err.into())
            }
        }
    }
}
