use crate::adapters::http::payloads::{
    HistoryResponse, MessageResponse, ParkResponse, SlotsResponse, StatisticsResponse,
    StatusResponse, UnparkResponse, VehicleRequest,
};
use crate::utils::error::{ParkingError, Result};
use crate::utils::validation::validate_url;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/parking";

/// HTTP client for the `/api/parking` endpoints.
#[derive(Debug, Clone)]
pub struct ParkingClient {
    base_url: String,
    client: Client,
}

impl ParkingClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let url = validate_url("api_url", base_url)?;
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // 失敗時盡量取出伺服器回傳的訊息
        let message = match response.json::<MessageResponse>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };

        Err(ParkingError::ApiResponseError {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn park(&self, vehicle_number: &str) -> Result<ParkResponse> {
        let request = self
            .client
            .post(self.url("/park"))
            .json(&VehicleRequest::new(vehicle_number));
        self.send(request).await
    }

    pub async fn unpark(&self, vehicle_number: &str) -> Result<UnparkResponse> {
        let request = self
            .client
            .post(self.url("/unpark"))
            .json(&VehicleRequest::new(vehicle_number));
        self.send(request).await
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        self.send(self.client.get(self.url("/status"))).await
    }

    pub async fn slots(&self) -> Result<SlotsResponse> {
        self.send(self.client.get(self.url("/slots"))).await
    }

    pub async fn start_maintenance(&self, slot_number: u32) -> Result<SlotsResponse> {
        let path = format!("/maintenance/{}", slot_number);
        self.send(self.client.put(self.url(&path))).await
    }

    pub async fn end_maintenance(&self, slot_number: u32) -> Result<SlotsResponse> {
        let path = format!("/maintenance/end/{}", slot_number);
        self.send(self.client.put(self.url(&path))).await
    }

    pub async fn statistics(&self) -> Result<StatisticsResponse> {
        self.send(self.client.get(self.url("/statistics"))).await
    }

    pub async fn history(&self) -> Result<HistoryResponse> {
        self.send(self.client.get(self.url("/history"))).await
    }
}
