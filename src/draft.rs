// Draft Editor: a partial, copy-on-write working copy of a hotel profile

use crate::hotel::HotelProfile;
use crate::session::{SessionError, SessionState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Room type index {index} is out of bounds (list has {len} entries)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error(transparent)]
    Session(#[from] SessionError),
}

// Ordered list of room-type labels.
// Every edit returns a new list; a clone taken earlier keeps seeing the
// elements it was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RoomTypes(Arc<[String]>);

impl Default for RoomTypes {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl From<Vec<String>> for RoomTypes {
    fn from(labels: Vec<String>) -> Self {
        Self(Arc::from(labels))
    }
}

impl From<RoomTypes> for Vec<String> {
    fn from(list: RoomTypes) -> Self {
        list.0.to_vec()
    }
}

impl RoomTypes {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    // Copy with one empty label appended
    pub fn appended(&self) -> Self {
        let mut labels = self.0.to_vec();
        labels.push(String::new());
        Self::from(labels)
    }

    // Copy with the label at `index` replaced
    pub fn edited(&self, index: usize, text: impl Into<String>) -> Result<Self, EditError> {
        self.check_index(index)?;
        let mut labels = self.0.to_vec();
        labels[index] = text.into();
        Ok(Self::from(labels))
    }

    // Copy without the label at `index`; later labels shift down by one
    pub fn removed(&self, index: usize) -> Result<Self, EditError> {
        self.check_index(index)?;
        let mut labels = self.0.to_vec();
        labels.remove(index);
        Ok(Self::from(labels))
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.0.len() {
            Ok(())
        } else {
            Err(EditError::IndexOutOfBounds {
                index,
                len: self.0.len(),
            })
        }
    }
}

// Fields present are sent on commit, even when equal to the snapshot value
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotelDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_rooms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_types: Option<RoomTypes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mess_included: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
}

// A single operator edit to one draft field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    HotelName(String),
    HotelClass(String),
    NumberOfRooms(String),
    CompleteAddress(String),
    RoomTypes(Vec<String>),
    Functional(bool),
    MessIncluded(bool),
    City(String),
    Latitude(String),
    Longitude(String),
}

impl HotelDraft {
    // Seeds every editable field. The room-type list is copied, not shared with the profile.
    pub fn seeded_from(profile: &HotelProfile) -> Self {
        Self {
            hotel_name: Some(profile.hotel_name.clone()),
            hotel_class: Some(profile.hotel_class.clone()),
            number_of_rooms: Some(profile.number_of_rooms.clone()),
            complete_address: Some(profile.complete_address.clone()),
            room_types: Some(RoomTypes::from(profile.room_types.clone())),
            functional: Some(profile.functional),
            mess_included: Some(profile.mess_included),
            city: Some(profile.city.clone()),
            latitude: Some(profile.latitude.clone()),
            longitude: Some(profile.longitude.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn room_types(&self) -> RoomTypes {
        self.room_types.clone().unwrap_or_default()
    }

    pub fn with_change(&self, change: FieldChange) -> Self {
        let mut next = self.clone();
        match change {
            FieldChange::HotelName(value) => next.hotel_name = Some(value),
            FieldChange::HotelClass(value) => next.hotel_class = Some(value),
            FieldChange::NumberOfRooms(value) => next.number_of_rooms = Some(value),
            FieldChange::CompleteAddress(value) => next.complete_address = Some(value),
            FieldChange::RoomTypes(labels) => next.room_types = Some(RoomTypes::from(labels)),
            FieldChange::Functional(value) => next.functional = Some(value),
            FieldChange::MessIncluded(value) => next.mess_included = Some(value),
            FieldChange::City(value) => next.city = Some(value),
            FieldChange::Latitude(value) => next.latitude = Some(value),
            FieldChange::Longitude(value) => next.longitude = Some(value),
        }
        next
    }

    pub fn with_room_types(&self, room_types: RoomTypes) -> Self {
        Self {
            room_types: Some(room_types),
            ..self.clone()
        }
    }

    // Field-level merge, the way the service applies a partial update
    pub fn apply_to(&self, profile: &mut HotelProfile) {
        if let Some(value) = &self.hotel_name {
            profile.hotel_name = value.clone();
        }
        if let Some(value) = &self.hotel_class {
            profile.hotel_class = value.clone();
        }
        if let Some(value) = &self.number_of_rooms {
            profile.number_of_rooms = value.clone();
        }
        if let Some(value) = &self.complete_address {
            profile.complete_address = value.clone();
        }
        if let Some(value) = &self.room_types {
            profile.room_types = value.as_slice().to_vec();
        }
        if let Some(value) = self.functional {
            profile.functional = value;
        }
        if let Some(value) = self.mess_included {
            profile.mess_included = value;
        }
        if let Some(value) = &self.city {
            profile.city = value.clone();
        }
        if let Some(value) = &self.latitude {
            profile.latitude = value.clone();
        }
        if let Some(value) = &self.longitude {
            profile.longitude = value.clone();
        }
    }
}

// Owns the draft for one edit session. Every change swaps in a whole new draft.
// The session is bound to the hotel it was seeded from and commits against it.
#[derive(Debug, Default)]
pub struct DraftEditor {
    state: SessionState,
    hotel_id: String,
    draft: Arc<HotelDraft>,
}

impl DraftEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn draft(&self) -> Arc<HotelDraft> {
        Arc::clone(&self.draft)
    }

    pub fn hotel_id(&self) -> &str {
        &self.hotel_id
    }

    // Opening while already open re-seeds from the given snapshot
    pub fn open(
        &mut self,
        hotel_id: impl Into<String>,
        snapshot: Option<&HotelProfile>,
    ) -> Result<(), SessionError> {
        self.state.ensure_not_committing()?;
        self.hotel_id = hotel_id.into();
        self.draft = Arc::new(snapshot.map(HotelDraft::seeded_from).unwrap_or_default());
        self.state = SessionState::Open;
        Ok(())
    }

    pub fn set_field(&mut self, change: FieldChange) -> Result<(), EditError> {
        self.state.ensure_open()?;
        self.draft = Arc::new(self.draft.with_change(change));
        Ok(())
    }

    pub fn append_room_type(&mut self) -> Result<(), EditError> {
        self.state.ensure_open()?;
        let room_types = self.draft.room_types().appended();
        self.draft = Arc::new(self.draft.with_room_types(room_types));
        Ok(())
    }

    pub fn edit_room_type(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        self.state.ensure_open()?;
        let room_types = self.draft.room_types().edited(index, text)?;
        self.draft = Arc::new(self.draft.with_room_types(room_types));
        Ok(())
    }

    pub fn remove_room_type(&mut self, index: usize) -> Result<(), EditError> {
        self.state.ensure_open()?;
        let room_types = self.draft.room_types().removed(index)?;
        self.draft = Arc::new(self.draft.with_room_types(room_types));
        Ok(())
    }

    // Open -> Committing, handing out the draft to send
    pub fn begin_commit(&mut self) -> Result<Arc<HotelDraft>, SessionError> {
        self.state.ensure_open()?;
        self.state = SessionState::Committing;
        Ok(self.draft())
    }

    pub fn commit_succeeded(&mut self) {
        self.state = SessionState::Closed;
        self.hotel_id.clear();
        self.draft = Arc::default();
    }

    // Back to Open with the draft untouched so the operator can retry
    pub fn commit_failed(&mut self) {
        self.state = SessionState::Open;
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.state.ensure_not_committing()?;
        self.state = SessionState::Closed;
        self.hotel_id.clear();
        self.draft = Arc::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample_profile() -> HotelProfile {
        HotelProfile {
            id: "hotel-1".to_string(),
            hotel_name: "Manzil Residency".to_string(),
            hotel_class: "3 Star".to_string(),
            number_of_rooms: "24".to_string(),
            room_types: vec!["Suite".to_string(), "Single".to_string()],
            functional: true,
            city: "Lahore".to_string(),
            ..Default::default()
        }
    }

    fn labels(list: &RoomTypes) -> Vec<&str> {
        list.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_room_type_edits_are_copy_on_write() {
        let original = RoomTypes::from(vec!["Suite".to_string(), "Single".to_string()]);

        let appended = original.appended();
        let edited = appended.edited(2, "Double").unwrap();
        let removed = edited.removed(0).unwrap();

        assert_eq!(labels(&original), vec!["Suite", "Single"]);
        assert_eq!(labels(&appended), vec!["Suite", "Single", ""]);
        assert_eq!(labels(&edited), vec!["Suite", "Single", "Double"]);
        assert_eq!(labels(&removed), vec!["Single", "Double"]);
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let list = RoomTypes::from(vec!["Suite".to_string()]);

        assert_eq!(
            list.edited(1, "Double"),
            Err(EditError::IndexOutOfBounds { index: 1, len: 1 })
        );
        assert_eq!(
            RoomTypes::default().removed(0),
            Err(EditError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    // Random appends followed by random edits and removals, checked against a plain Vec model
    #[test]
    fn test_random_edit_sequences_match_model() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let appends = rng.gen_range(0..12);
            let mut list = RoomTypes::default();
            for _ in 0..appends {
                list = list.appended();
            }

            let mut model: Vec<String> = vec![String::new(); appends];
            let mut removals = 0;

            for step in 0..rng.gen_range(0..20) {
                if model.is_empty() {
                    break;
                }
                let index = rng.gen_range(0..model.len());
                if rng.gen_bool(0.6) {
                    let text = format!("type-{}", step);
                    list = list.edited(index, text.clone()).unwrap();
                    model[index] = text;
                } else {
                    list = list.removed(index).unwrap();
                    model.remove(index);
                    removals += 1;
                }
            }

            assert_eq!(list.len(), appends - removals);
            assert_eq!(list.as_slice(), model.as_slice());
        }
    }

    #[test]
    fn test_seeded_draft_does_not_alias_profile() {
        let profile = sample_profile();
        let mut editor = DraftEditor::new();
        editor.open("hotel-1", Some(&profile)).unwrap();

        editor.edit_room_type(0, "Penthouse").unwrap();
        editor.append_room_type().unwrap();

        assert_eq!(profile.room_types, vec!["Suite", "Single"]);
        assert_eq!(
            labels(&editor.draft().room_types()),
            vec!["Penthouse", "Single", ""]
        );
    }

    #[test]
    fn test_readers_keep_their_draft_version() {
        let mut editor = DraftEditor::new();
        editor.open("hotel-1", Some(&sample_profile())).unwrap();

        let before = editor.draft();
        editor
            .set_field(FieldChange::HotelName("Renamed".to_string()))
            .unwrap();
        editor.remove_room_type(1).unwrap();

        assert_eq!(before.hotel_name.as_deref(), Some("Manzil Residency"));
        assert_eq!(before.room_types().len(), 2);
        assert_eq!(editor.draft().hotel_name.as_deref(), Some("Renamed"));
        assert_eq!(editor.draft().room_types().len(), 1);
    }

    #[test]
    fn test_edits_require_open_session() {
        let mut editor = DraftEditor::new();

        assert_eq!(
            editor.append_room_type(),
            Err(EditError::Session(SessionError::NotOpen(
                SessionState::Closed
            )))
        );

        editor.open("hotel-1", None).unwrap();
        editor.begin_commit().unwrap();
        assert_eq!(
            editor.set_field(FieldChange::City("Karachi".to_string())),
            Err(EditError::Session(SessionError::AlreadyCommitting))
        );
    }

    #[test]
    fn test_out_of_bounds_edit_leaves_draft_unchanged() {
        let mut editor = DraftEditor::new();
        editor.open("hotel-1", Some(&sample_profile())).unwrap();
        let before = editor.draft();

        let result = editor.remove_room_type(5);

        assert_eq!(result, Err(EditError::IndexOutOfBounds { index: 5, len: 2 }));
        assert_eq!(*editor.draft(), *before);
    }

    #[test]
    fn test_commit_lifecycle() {
        let mut editor = DraftEditor::new();
        editor.open("hotel-1", Some(&sample_profile())).unwrap();
        editor.set_field(FieldChange::Functional(false)).unwrap();

        let sent = editor.begin_commit().unwrap();
        assert_eq!(editor.state(), SessionState::Committing);
        assert_eq!(editor.begin_commit(), Err(SessionError::AlreadyCommitting));

        editor.commit_failed();
        assert_eq!(editor.state(), SessionState::Open);
        assert_eq!(editor.draft(), sent);

        editor.begin_commit().unwrap();
        editor.commit_succeeded();
        assert_eq!(editor.state(), SessionState::Closed);
        assert!(editor.draft().is_empty());
    }

    #[test]
    fn test_session_remembers_seeding_hotel() {
        let mut editor = DraftEditor::new();
        editor.open("hotel-1", Some(&sample_profile())).unwrap();
        assert_eq!(editor.hotel_id(), "hotel-1");

        editor.begin_commit().unwrap();
        editor.commit_failed();
        assert_eq!(editor.hotel_id(), "hotel-1");

        editor.begin_commit().unwrap();
        editor.commit_succeeded();
        assert_eq!(editor.hotel_id(), "");
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut editor = DraftEditor::new();
        editor.open("hotel-1", Some(&sample_profile())).unwrap();
        editor
            .set_field(FieldChange::City("Karachi".to_string()))
            .unwrap();

        editor.cancel().unwrap();

        assert_eq!(editor.state(), SessionState::Closed);
        assert!(editor.draft().is_empty());
    }

    #[test]
    fn test_empty_draft_serializes_to_empty_object() {
        let json = serde_json::to_value(HotelDraft::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let draft = HotelDraft::default()
            .with_change(FieldChange::RoomTypes(vec!["Suite".to_string()]))
            .with_change(FieldChange::MessIncluded(true));
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"room_types": ["Suite"], "mess_included": true})
        );
    }

    #[test]
    fn test_apply_to_merges_present_fields_only() {
        let mut profile = sample_profile();
        let draft = HotelDraft::default()
            .with_change(FieldChange::City("Karachi".to_string()))
            .with_change(FieldChange::RoomTypes(vec![]));

        draft.apply_to(&mut profile);

        assert_eq!(profile.city, "Karachi");
        assert!(profile.room_types.is_empty());
        assert_eq!(profile.hotel_name, "Manzil Residency");
    }
}
