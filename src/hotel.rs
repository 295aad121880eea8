// Hotel profile as returned by the hotel service
// Numeric fields are kept as text until an operator edit needs them typed

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// Response body of GET /hotels/{hotel_id}
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HotelEnvelope {
    pub hotel: HotelProfile,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotelProfile {
    #[serde(rename = "_id", alias = "hotel_id")]
    pub id: String,
    pub hotel_name: String,
    pub hotel_class: String,
    #[serde(deserialize_with = "text_or_number")]
    pub number_of_rooms: String,
    pub complete_address: String,
    // Display order, duplicates allowed. Empty means "unspecified".
    pub room_types: Vec<String>,
    pub functional: bool,
    pub mess_included: bool,
    pub city: String,
    #[serde(deserialize_with = "text_or_number")]
    pub latitude: String,
    #[serde(deserialize_with = "text_or_number")]
    pub longitude: String,
    pub rooms: Vec<RoomRecord>,
}

// Room embedded in a hotel response
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RoomRecord {
    #[serde(rename = "_id", alias = "room_id")]
    pub id: String,
    pub room_type: String,
    pub room_number: Option<f64>,
    pub rent: Option<f64>,
    pub available: bool,
    pub bed_size: String,
}

impl HotelProfile {
    pub fn room_types_label(&self) -> String {
        self.room_types.join(", ")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

// Account summary, one labelled line per field
impl fmt::Display for HotelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.hotel_name)?;
        writeln!(f, "Class: {}", self.hotel_class)?;
        writeln!(f, "No. of Rooms: {}", self.number_of_rooms)?;
        writeln!(f, "Room Types: {}", self.room_types_label())?;
        writeln!(f, "Functional: {}", yes_no(self.functional))?;
        writeln!(f, "Mess Included: {}", yes_no(self.mess_included))?;
        writeln!(f, "City: {}", self.city)?;
        writeln!(f, "Address: {}", self.complete_address)?;
        write!(
            f,
            "Coordinates: Lat -- {}, Long -- {}",
            self.latitude, self.longitude
        )
    }
}

// The service is not strict about these fields: accept "12", 12 or null
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Text(text)) => text,
        Some(TextOrNumber::Number(number)) => number.to_string(),
        None => String::new(),
    })
}
