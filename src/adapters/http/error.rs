use crate::adapters::http::payloads::MessageResponse;
use crate::utils::error::ParkingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

impl ParkingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ParkingError::ValidationError { .. }
            | ParkingError::NoSlotAvailable
            | ParkingError::VehicleAlreadyParked { .. }
            | ParkingError::SlotNotFound { .. } => StatusCode::BAD_REQUEST,
            ParkingError::VehicleNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ParkingError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                self,
                self.category(),
                self.severity()
            );
            "Internal server error".to_string()
        } else {
            tracing::debug!("Request rejected: {}", self);
            self.to_string()
        };

        (
            status,
            Json(MessageResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ParkingError::NoSlotAvailable.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ParkingError::VehicleNotFound {
                vehicle_number: "X".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ParkingError::SlotNotFound { slot_number: 42 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ParkingError::store("disk full").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_response_is_generic() {
        let response = ParkingError::store("disk full").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
