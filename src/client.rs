// Remote hotel service client
// The trait is the seam the controller talks through; HttpHotelService is the networked implementation

use crate::config::ClientConfig;
use crate::draft::HotelDraft;
use crate::hotel::{HotelEnvelope, HotelProfile};
use crate::room::RoomPayload;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

// Failures while talking to the service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status_code} - {message}")]
    Status { status_code: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Network(_) => true,
            ServiceError::Status { status_code, .. } => {
                *status_code == 429 || (500..600).contains(status_code)
            }
            ServiceError::Decode(_) => false,
        }
    }

    // Short text suitable for an operator-facing alert
    pub fn user_message(&self) -> &'static str {
        match self {
            ServiceError::Network(_) => "Could not reach the hotel service.",
            ServiceError::Status { status_code, .. } if *status_code == 404 => {
                "The hotel could not be found."
            }
            ServiceError::Status { .. } => "The hotel service rejected the request.",
            ServiceError::Decode(_) => "The hotel service sent an unexpected response.",
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Network(format!("request timed out: {}", err))
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[async_trait]
pub trait HotelService: Send + Sync + 'static {
    // GET /hotels/{hotel_id}
    async fn fetch_hotel(&self, hotel_id: &str) -> Result<HotelProfile, ServiceError>;

    // PUT /edithotel/{hotel_id} with only the fields present in the draft
    async fn update_hotel(&self, hotel_id: &str, draft: &HotelDraft) -> Result<(), ServiceError>;

    // POST /room
    async fn create_room(&self, room: &RoomPayload) -> Result<(), ServiceError>;
}

pub struct HttpHotelService {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpHotelService {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::ConfigError(format!("invalid base url {:?}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::ConfigError(format!(
                "base url {:?} cannot carry a path",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    // Segments are percent-encoded, so hotel ids cannot escape their path position
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Network(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

// Turns a non-2xx response into ServiceError::Status carrying the body text
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ServiceError::Status {
        status_code: status.as_u16(),
        message,
    })
}

pub fn decode_hotel(body: &[u8]) -> Result<HotelProfile, ServiceError> {
    serde_json::from_slice::<HotelEnvelope>(body)
        .map(|envelope| envelope.hotel)
        .map_err(|e| ServiceError::Decode(e.to_string()))
}

#[async_trait]
impl HotelService for HttpHotelService {
    async fn fetch_hotel(&self, hotel_id: &str) -> Result<HotelProfile, ServiceError> {
        let url = self.endpoint(&["hotels", hotel_id])?;
        debug!("GET {}", url);

        let response = ensure_success(self.http.get(url).send().await?).await?;
        let body = response.bytes().await?;
        decode_hotel(&body)
    }

    async fn update_hotel(&self, hotel_id: &str, draft: &HotelDraft) -> Result<(), ServiceError> {
        let url = self.endpoint(&["edithotel", hotel_id])?;
        debug!("PUT {}", url);

        let response = ensure_success(self.http.put(url).json(draft).send().await?).await?;
        let ack = response.text().await?;
        debug!("Hotel {} updated: {}", hotel_id, ack);
        Ok(())
    }

    async fn create_room(&self, room: &RoomPayload) -> Result<(), ServiceError> {
        let url = self.endpoint(&["room"])?;
        debug!("POST {}", url);

        let response = ensure_success(self.http.post(url).json(room).send().await?).await?;
        let ack = response.text().await?;
        debug!("Room created for hotel {}: {}", room.hotel_id, ack);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base_url: &str) -> HttpHotelService {
        let config = ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        HttpHotelService::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let service = service("http://10.0.0.5:3000");

        assert_eq!(
            service.endpoint(&["hotels", "abc123"]).unwrap().as_str(),
            "http://10.0.0.5:3000/hotels/abc123"
        );
        assert_eq!(
            service.endpoint(&["room"]).unwrap().as_str(),
            "http://10.0.0.5:3000/room"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_ids() {
        let service = service("https://api.example.com/v1/");

        assert_eq!(
            service.endpoint(&["edithotel", "a/b c"]).unwrap().as_str(),
            "https://api.example.com/v1/edithotel/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpHotelService::new(&config),
            Err(ClientError::ConfigError(_))
        ));

        let config = ClientConfig {
            base_url: "mailto:ops@example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpHotelService::new(&config),
            Err(ClientError::ConfigError(_))
        ));
    }

    #[test]
    fn test_decode_hotel_errors_are_decode_failures() {
        let hotel = decode_hotel(br#"{"hotel": {"hotel_name": "Manzil"}}"#).unwrap();
        assert_eq!(hotel.hotel_name, "Manzil");

        assert!(matches!(
            decode_hotel(b"<html>502</html>"),
            Err(ServiceError::Decode(_))
        ));
        assert!(matches!(
            decode_hotel(br#"{"hotel": {"room_types": "Suite"}}"#),
            Err(ServiceError::Decode(_))
        ));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ServiceError::Network("reset".to_string()).is_retryable());
        assert!(ServiceError::Status {
            status_code: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!ServiceError::Status {
            status_code: 404,
            message: String::new()
        }
        .is_retryable());
        assert!(!ServiceError::Decode("eof".to_string()).is_retryable());
    }

    #[test]
    fn test_user_messages_hide_transport_details() {
        let not_found = ServiceError::Status {
            status_code: 404,
            message: "Hotel not found".to_string(),
        };
        assert_eq!(not_found.user_message(), "The hotel could not be found.");

        let rejected = ServiceError::Status {
            status_code: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(rejected.user_message(), "The hotel service rejected the request.");
        assert!(!rejected.user_message().contains("500"));

        let unreachable = ServiceError::Network("connection refused".to_string());
        assert_eq!(unreachable.user_message(), "Could not reach the hotel service.");
    }
}
