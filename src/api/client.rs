// ABOUTME: REST client for the reservation service
// ABOUTME: Bearer-authenticated JSON calls for auth, users, vehicles, reservations and parking

use crate::api::errors::{error_message, reservation_error_message};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::protocol::messages::{
    AuthToken, LoginRequest, ParkRequest, ParkedVehicleDto, ParkingLevelDto, ParkingLocationDto,
    ParkingSpaceDto, ReservationDto, UserDto, VehicleDto,
};
use crate::reservation::ReservationWindow;
use crate::sync::ClockService;
use crate::Result;
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Client for the reservation service REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the configured API URL
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http(http, config.api_base_url()))
    }

    /// Create a client that shares an existing HTTP client
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token: None,
        }
    }

    /// Attach a bearer token for authenticated calls
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replace the bearer token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Auth

    /// Log in and return the issued token
    ///
    /// The token is not stored; pass it to [`with_token`](Self::with_token).
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.request(Method::POST, "auth/login").json(&body))
            .await
    }

    /// Register a new account
    pub async fn register(&self, user: &UserDto) -> Result<UserDto> {
        self.send_json(self.request(Method::POST, "auth/register").json(user))
            .await
    }

    // Users

    /// The logged-in user
    pub async fn current_user(&self) -> Result<UserDto> {
        self.get("users/me").await
    }

    /// Update the logged-in user's profile
    pub async fn update_profile(&self, user: &UserDto) -> Result<UserDto> {
        self.put("users/me", user).await
    }

    // Vehicles

    /// The user's vehicles
    pub async fn vehicles(&self) -> Result<Vec<VehicleDto>> {
        self.get("vehicles").await
    }

    /// One vehicle
    pub async fn vehicle(&self, id: i64) -> Result<VehicleDto> {
        self.get(&format!("vehicles/{id}")).await
    }

    /// Register a vehicle
    pub async fn add_vehicle(&self, vehicle: &VehicleDto) -> Result<VehicleDto> {
        self.post("vehicles", vehicle).await
    }

    /// Update a vehicle
    pub async fn update_vehicle(&self, id: i64, vehicle: &VehicleDto) -> Result<VehicleDto> {
        self.put(&format!("vehicles/{id}"), vehicle).await
    }

    /// Delete a vehicle
    pub async fn delete_vehicle(&self, id: i64) -> Result<()> {
        self.delete(&format!("vehicles/{id}")).await
    }

    // Reservations

    /// All of the user's reservations
    pub async fn reservations(&self) -> Result<Vec<ReservationDto>> {
        self.get("reservations").await
    }

    /// The user's active reservations
    pub async fn active_reservations(&self) -> Result<Vec<ReservationDto>> {
        self.get("reservations/active").await
    }

    /// One reservation
    pub async fn reservation(&self, id: i64) -> Result<ReservationDto> {
        self.get(&format!("reservations/{id}")).await
    }

    /// Create a reservation after validating its window against adjusted time
    ///
    /// An invalid window is rejected with [`Error::Validation`] without
    /// contacting the service.
    pub async fn create_reservation(
        &self,
        clock: &ClockService,
        reservation: &ReservationDto,
    ) -> Result<ReservationDto> {
        ReservationWindow::new(reservation.start_time, reservation.end_time).validate(clock)?;

        self.post("reservations", reservation)
            .await
            .map_err(|e| match e {
                Error::Api { status, message } => Error::Api {
                    status,
                    message: reservation_error_message(&message),
                },
                other => other,
            })
    }

    /// Cancel a reservation
    pub async fn cancel_reservation(&self, id: i64) -> Result<ReservationDto> {
        self.send_json(self.request(Method::POST, &format!("reservations/{id}/cancel")))
            .await
    }

    // Parking

    /// All parking locations
    pub async fn parking_locations(&self) -> Result<Vec<ParkingLocationDto>> {
        self.get("parking/locations").await
    }

    /// Levels of a location
    pub async fn levels(&self, location_id: i64) -> Result<Vec<ParkingLevelDto>> {
        self.get(&format!("parking/locations/{location_id}/levels"))
            .await
    }

    /// Spaces on a level
    pub async fn spaces(&self, level_id: i64) -> Result<Vec<ParkingSpaceDto>> {
        self.get(&format!("parking/levels/{level_id}/spaces")).await
    }

    /// Park a vehicle in a space now
    pub async fn park_vehicle(&self, vehicle_id: i64, space_id: i64) -> Result<ParkedVehicleDto> {
        let body = ParkRequest {
            vehicle_id,
            space_id,
        };
        self.post("parking/park", &body).await
    }

    /// The user's currently parked vehicles
    pub async fn parked_vehicles(&self) -> Result<Vec<ParkedVehicleDto>> {
        self.get("parking/parked").await
    }

    /// End a parking session
    pub async fn remove_parked_vehicle(&self, parked_id: i64) -> Result<()> {
        self.delete(&format!("parking/parked/{parked_id}")).await
    }

    // Plumbing

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(self.request(Method::POST, path).json(body))
            .await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send_json(self.request(Method::PUT, path).json(body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.check(self.request(Method::DELETE, path).send().await?)
            .await?;
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.ok();
        let message = error_message(status, content_type.as_deref(), body.as_deref());

        log::warn!("API request failed with {}: {}", status, message);
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}
