// New-room input and its conversion into the POST /room payload

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RoomType {
    Single,
    Double,
    Suite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum BedSize {
    Single,
    Double,
    Queen,
    King,
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Suite => "Suite",
        };
        f.write_str(label)
    }
}

impl FromStr for RoomType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single" => Ok(RoomType::Single),
            "Double" => Ok(RoomType::Double),
            "Suite" => Ok(RoomType::Suite),
            _ => Err(FieldError::UnknownOption {
                field: RoomField::RoomType,
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BedSize::Single => "Single",
            BedSize::Double => "Double",
            BedSize::Queen => "Queen",
            BedSize::King => "King",
        };
        f.write_str(label)
    }
}

impl FromStr for BedSize {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single" => Ok(BedSize::Single),
            "Double" => Ok(BedSize::Double),
            "Queen" => Ok(BedSize::Queen),
            "King" => Ok(BedSize::King),
            _ => Err(FieldError::UnknownOption {
                field: RoomField::BedSize,
                input: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomField {
    RoomType,
    RoomNumber,
    Rent,
    Available,
    BedSize,
}

impl fmt::Display for RoomField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoomField::RoomType => "room type",
            RoomField::RoomNumber => "room number",
            RoomField::Rent => "rent",
            RoomField::Available => "availability",
            RoomField::BedSize => "bed size",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0} is required")]
    Missing(RoomField),

    #[error("{field} must be a number, got {input:?}")]
    NotANumber { field: RoomField, input: String },

    #[error("availability must be \"true\" or \"false\", got {input:?}")]
    NotABoolean { input: String },

    #[error("{field} has no option {input:?}")]
    UnknownOption { field: RoomField, input: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid room input: {}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

// How operator text becomes typed wire values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionPolicy {
    // Reject input that does not parse; nothing is sent
    #[default]
    Strict,
    // Legacy behaviour: non-numeric text becomes NaN, unknown availability becomes false
    Lenient,
}

// Availability is carried as the picker's text value: "", "true" or "false"
pub const AVAILABLE: &str = "true";
pub const NOT_AVAILABLE: &str = "false";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoomDraft {
    pub room_type: Option<RoomType>,
    pub room_number: String,
    pub rent: String,
    pub available: String,
    pub bed_size: Option<BedSize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoomChange {
    RoomType(Option<RoomType>),
    RoomNumber(String),
    Rent(String),
    Available(String),
    BedSize(Option<BedSize>),
}

// Body of POST /room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomPayload {
    #[serde(serialize_with = "blank_when_unset")]
    pub room_type: Option<RoomType>,
    pub room_number: f64,
    pub rent: f64,
    pub available: bool,
    #[serde(serialize_with = "blank_when_unset")]
    pub bed_size: Option<BedSize>,
    pub hotel_id: String,
}

fn blank_when_unset<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    match value {
        Some(value) => serializer.collect_str(value),
        None => serializer.serialize_str(""),
    }
}

// Number() semantics: blank text is zero, anything unparsable is NaN
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

// Only the "true" sentinel (any case) is true; unset and anything else is false
pub fn coerce_available(text: &str) -> bool {
    text.eq_ignore_ascii_case(AVAILABLE)
}

pub fn parse_number(field: RoomField, text: &str) -> Result<f64, FieldError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Missing(field));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FieldError::NotANumber {
            field,
            input: text.to_string(),
        }),
    }
}

// Unset stays false in strict mode too; only unrecognised text is rejected
pub fn parse_available(text: &str) -> Result<bool, FieldError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) {
        Ok(false)
    } else if trimmed.eq_ignore_ascii_case(AVAILABLE) {
        Ok(true)
    } else {
        Err(FieldError::NotABoolean {
            input: text.to_string(),
        })
    }
}

impl RoomDraft {
    pub fn with_change(&self, change: RoomChange) -> Self {
        let mut next = self.clone();
        match change {
            RoomChange::RoomType(value) => next.room_type = value,
            RoomChange::RoomNumber(value) => next.room_number = value,
            RoomChange::Rent(value) => next.rent = value,
            RoomChange::Available(value) => next.available = value,
            RoomChange::BedSize(value) => next.bed_size = value,
        }
        next
    }

    pub fn to_payload(
        &self,
        hotel_id: &str,
        policy: CoercionPolicy,
    ) -> Result<RoomPayload, ValidationError> {
        match policy {
            CoercionPolicy::Lenient => Ok(self.coerce(hotel_id)),
            CoercionPolicy::Strict => self.validate(hotel_id),
        }
    }

    fn coerce(&self, hotel_id: &str) -> RoomPayload {
        RoomPayload {
            room_type: self.room_type,
            room_number: coerce_number(&self.room_number),
            rent: coerce_number(&self.rent),
            available: coerce_available(&self.available),
            bed_size: self.bed_size,
            hotel_id: hotel_id.to_string(),
        }
    }

    // Collects every field problem so the operator sees them all at once
    fn validate(&self, hotel_id: &str) -> Result<RoomPayload, ValidationError> {
        let mut errors = Vec::new();

        if self.room_type.is_none() {
            errors.push(FieldError::Missing(RoomField::RoomType));
        }
        let room_number = parse_number(RoomField::RoomNumber, &self.room_number)
            .map_err(|e| errors.push(e))
            .ok();
        let rent = parse_number(RoomField::Rent, &self.rent)
            .map_err(|e| errors.push(e))
            .ok();
        let available = parse_available(&self.available)
            .map_err(|e| errors.push(e))
            .ok();
        if self.bed_size.is_none() {
            errors.push(FieldError::Missing(RoomField::BedSize));
        }

        match (room_number, rent, available) {
            (Some(room_number), Some(rent), Some(available)) if errors.is_empty() => {
                Ok(RoomPayload {
                    room_type: self.room_type,
                    room_number,
                    rent,
                    available,
                    bed_size: self.bed_size,
                    hotel_id: hotel_id.to_string(),
                })
            }
            _ => Err(ValidationError { errors }),
        }
    }
}
