// ABOUTME: Wire type definitions and serialization
// ABOUTME: Time endpoint response and the reservation service DTOs (camelCase JSON)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeResponse {
    /// Server time in Unix milliseconds
    pub timestamp: i64,
    /// Server time as an RFC 3339 string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso8601: Option<String>,
    /// Server timezone name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    /// Bearer token
    pub access_token: String,
    /// Token type (usually "Bearer")
    pub token_type: String,
}

/// User account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Server-assigned id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email
    pub email: String,
    /// Password (registration and profile updates only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Vehicle owned by the current user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    /// Server-assigned id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Manufacturer
    pub make: String,
    /// Model
    pub model: String,
    /// Model year
    pub year: String,
    /// Color
    pub color: String,
    /// License plate
    pub license_plate: String,
    /// Whether this is the user's default vehicle
    #[serde(default)]
    pub is_default: bool,
}

/// Parking reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    /// Server-assigned id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Human-readable reservation code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_code: Option<String>,
    /// Start of the reserved window
    pub start_time: DateTime<Utc>,
    /// End of the reserved window
    pub end_time: DateTime<Utc>,
    /// Server status (e.g. "ACTIVE", "CANCELLED")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Price charged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Reserved vehicle
    pub vehicle_id: i64,
    /// Reserved space
    pub parking_space_id: i64,
    /// Location name (server-filled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    /// Level name (server-filled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
    /// Space number (server-filled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_number: Option<String>,
    /// Vehicle description (server-filled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_info: Option<String>,
}

impl ReservationDto {
    /// A new reservation request for a vehicle and space
    pub fn new(
        vehicle_id: i64,
        parking_space_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            reservation_code: None,
            start_time,
            end_time,
            status: None,
            price: None,
            notes: None,
            vehicle_id,
            parking_space_id,
            location_name: None,
            level_name: None,
            space_number: None,
            vehicle_info: None,
        }
    }

    /// Attach notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Parking location (a garage or lot)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLocationDto {
    /// Location id
    pub id: i64,
    /// Location name
    pub name: String,
    /// Street address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Levels, when included by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<ParkingLevelDto>>,
    /// Free spaces across all levels
    pub available_spaces: u32,
}

/// One level of a parking location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLevelDto {
    /// Level id
    pub id: i64,
    /// Level name
    pub name: String,
    /// Owning location id
    pub location_id: i64,
    /// Owning location name
    pub location_name: String,
    /// Total spaces on the level
    pub total_spaces: u32,
    /// Free spaces on the level
    pub available_spaces: u32,
}

/// A single parking space
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpaceDto {
    /// Space id
    pub id: i64,
    /// Space label
    pub space_number: String,
    /// Status (e.g. "AVAILABLE")
    pub status: String,
    /// Owning level id
    pub level_id: i64,
}

/// Request to park a vehicle in a space now
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkRequest {
    /// Vehicle to park
    pub vehicle_id: i64,
    /// Target space
    pub space_id: i64,
}

/// A vehicle currently parked
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkedVehicleDto {
    /// Parking record id
    pub id: i64,
    /// When the vehicle was parked
    pub parked_time: DateTime<Utc>,
    /// Expected exit time, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_exit_time: Option<DateTime<Utc>>,
    /// Parked vehicle id
    pub vehicle_id: i64,
    /// Vehicle description
    pub vehicle_info: String,
    /// Occupied space id
    pub parking_space_id: i64,
    /// Location name
    pub location_name: String,
    /// Level name
    pub level_name: String,
    /// Space label
    pub space_number: String,
}
