// In-process hotel service for tests, benches and demos.
// Applies partial updates field by field and can inject failures or hold fetches back.

use crate::client::{HotelService, ServiceError};
use crate::draft::HotelDraft;
use crate::hotel::{HotelProfile, RoomRecord};
use crate::room::RoomPayload;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

#[derive(Default)]
pub struct InMemoryHotelService {
    hotels: DashMap<String, HotelProfile>,
    updates: Mutex<Vec<(String, HotelDraft)>>,
    created_rooms: Mutex<Vec<RoomPayload>>,
    held_fetches: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    fail_next_requests: AtomicUsize,
    fetch_count: AtomicUsize,
}

impl InMemoryHotelService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hotel(self, profile: HotelProfile) -> Self {
        self.insert_hotel(profile);
        self
    }

    pub fn insert_hotel(&self, profile: HotelProfile) {
        self.hotels.insert(profile.id.clone(), profile);
    }

    pub fn hotel(&self, hotel_id: &str) -> Option<HotelProfile> {
        self.hotels.get(hotel_id).map(|entry| entry.value().clone())
    }

    // The next `count` requests of any kind fail with a 500
    pub fn fail_next_requests(&self, count: usize) {
        self.fail_next_requests.store(count, Ordering::SeqCst);
    }

    // The next fetch of `hotel_id` waits until the returned sender fires (or is dropped)
    pub fn hold_next_fetch(&self, hotel_id: &str) -> oneshot::Sender<()> {
        let (release, held) = oneshot::channel();
        self.held_fetches.lock().insert(hotel_id.to_string(), held);
        release
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> Vec<(String, HotelDraft)> {
        self.updates.lock().clone()
    }

    pub fn created_rooms(&self) -> Vec<RoomPayload> {
        self.created_rooms.lock().clone()
    }

    fn take_failure(&self) -> Result<(), ServiceError> {
        let failed = self
            .fail_next_requests
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(ServiceError::Status {
                status_code: 500,
                message: "Internal Server Error".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn not_found(hotel_id: &str) -> ServiceError {
        ServiceError::Status {
            status_code: 404,
            message: format!("hotel {} not found", hotel_id),
        }
    }
}

#[async_trait]
impl HotelService for InMemoryHotelService {
    async fn fetch_hotel(&self, hotel_id: &str) -> Result<HotelProfile, ServiceError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        let held = self.held_fetches.lock().remove(hotel_id);
        if let Some(held) = held {
            // A dropped sender releases the fetch as well
            let _ = held.await;
        }

        self.hotel(hotel_id).ok_or_else(|| Self::not_found(hotel_id))
    }

    async fn update_hotel(&self, hotel_id: &str, draft: &HotelDraft) -> Result<(), ServiceError> {
        self.take_failure()?;

        let mut hotel = self
            .hotels
            .get_mut(hotel_id)
            .ok_or_else(|| Self::not_found(hotel_id))?;
        draft.apply_to(hotel.value_mut());
        drop(hotel);

        self.updates
            .lock()
            .push((hotel_id.to_string(), draft.clone()));
        Ok(())
    }

    async fn create_room(&self, room: &RoomPayload) -> Result<(), ServiceError> {
        self.take_failure()?;

        let mut hotel = self
            .hotels
            .get_mut(&room.hotel_id)
            .ok_or_else(|| Self::not_found(&room.hotel_id))?;
        let record = RoomRecord {
            id: format!("room-{}", hotel.rooms.len() + 1),
            room_type: room.room_type.map(|t| t.to_string()).unwrap_or_default(),
            room_number: Some(room.room_number).filter(|n| n.is_finite()),
            rent: Some(room.rent).filter(|n| n.is_finite()),
            available: room.available,
            bed_size: room.bed_size.map(|b| b.to_string()).unwrap_or_default(),
        };
        hotel.rooms.push(record);
        drop(hotel);

        self.created_rooms.lock().push(room.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::FieldChange;
    use crate::room::{BedSize, RoomType};

    fn profile(id: &str) -> HotelProfile {
        HotelProfile {
            id: id.to_string(),
            hotel_name: format!("Hotel {}", id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_and_not_found() {
        let service = InMemoryHotelService::new().with_hotel(profile("h1"));

        let hotel = service.fetch_hotel("h1").await.unwrap();
        assert_eq!(hotel.hotel_name, "Hotel h1");

        let err = service.fetch_hotel("missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::Status { status_code: 404, .. }));
        assert_eq!(service.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed() {
        let service = InMemoryHotelService::new().with_hotel(profile("h1"));
        service.fail_next_requests(2);

        assert!(service.fetch_hotel("h1").await.is_err());
        assert!(service.fetch_hotel("h1").await.is_err());
        assert!(service.fetch_hotel("h1").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let service = InMemoryHotelService::new().with_hotel(profile("h1"));
        let draft = HotelDraft::default().with_change(FieldChange::City("Multan".to_string()));

        service.update_hotel("h1", &draft).await.unwrap();

        let hotel = service.hotel("h1").unwrap();
        assert_eq!(hotel.city, "Multan");
        assert_eq!(hotel.hotel_name, "Hotel h1");
        assert_eq!(service.updates(), vec![("h1".to_string(), draft)]);
    }

    #[tokio::test]
    async fn test_create_room_appends_record() {
        let service = InMemoryHotelService::new().with_hotel(profile("h1"));
        let payload = RoomPayload {
            room_type: Some(RoomType::Suite),
            room_number: 301.0,
            rent: f64::NAN,
            available: true,
            bed_size: Some(BedSize::King),
            hotel_id: "h1".to_string(),
        };

        service.create_room(&payload).await.unwrap();

        let rooms = service.hotel("h1").unwrap().rooms;
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room_type, "Suite");
        assert_eq!(rooms[0].room_number, Some(301.0));
        assert_eq!(rooms[0].rent, None);
        assert_eq!(service.created_rooms().len(), 1);
    }

    #[tokio::test]
    async fn test_held_fetch_waits_for_release() {
        let service = InMemoryHotelService::new().with_hotel(profile("h1"));
        let release = service.hold_next_fetch("h1");

        let (fetched, _) = tokio::join!(service.fetch_hotel("h1"), async {
            tokio::task::yield_now().await;
            release.send(()).unwrap();
        });

        assert!(fetched.is_ok());
    }
}
