// ABOUTME: Wire protocol module
// ABOUTME: JSON message types exchanged with the time endpoint and the reservation service

/// JSON message definitions
pub mod messages;

pub use messages::{
    AuthToken, LoginRequest, ParkRequest, ParkedVehicleDto, ParkingLevelDto, ParkingLocationDto,
    ParkingSpaceDto, ReservationDto, TimeResponse, UserDto, VehicleDto,
};
