use crate::adapters::http::payloads::{
    HistoryResponse, MessageResponse, ParkResponse, SlotsResponse, StatisticsResponse,
    StatusResponse, UnparkResponse, VehicleRequest,
};
use crate::adapters::http::state::AppState;
use crate::utils::error::{ParkingError, Result};
use crate::utils::validation::{parse_slot_number, validate_vehicle_number};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

fn extract_vehicle_number(payload: std::result::Result<Json<VehicleRequest>, JsonRejection>) -> Result<String> {
    let Json(request) = payload.map_err(|e| ParkingError::validation(e.body_text()))?;
    validate_vehicle_number(request.vehicle_number.as_deref())
}

pub async fn welcome_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "Welcome to the parking lot service".to_string(),
    })
}

pub async fn park_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<VehicleRequest>, JsonRejection>,
) -> Result<Json<ParkResponse>> {
    let vehicle_number = extract_vehicle_number(payload)?;
    let allocation = state.service.park(&vehicle_number).await?;

    Ok(Json(ParkResponse {
        success: true,
        message: allocation.message(),
        slot_number: allocation.record.slot_number,
    }))
}

pub async fn unpark_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<VehicleRequest>, JsonRejection>,
) -> Result<Json<UnparkResponse>> {
    let vehicle_number = extract_vehicle_number(payload)?;
    let release = state.service.unpark(&vehicle_number).await?;

    Ok(Json(UnparkResponse {
        success: true,
        message: "Vehicle unparked successfully".to_string(),
        parking_fee: release.parking_fee,
    }))
}

pub async fn status_handler(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    Ok(Json(StatusResponse {
        success: true,
        parking_lot: state.service.status().await?,
    }))
}

pub async fn slots_handler(State(state): State<AppState>) -> Result<Json<SlotsResponse>> {
    Ok(Json(SlotsResponse {
        success: true,
        message: "List of Slots".to_string(),
        slots: state.service.slots().await?,
    }))
}

pub async fn start_maintenance_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SlotsResponse>> {
    let slot_number = parse_slot_number(&id)?;
    let slots = state.service.start_maintenance(slot_number).await?;

    Ok(Json(SlotsResponse {
        success: true,
        message: format!("Parking slot with ID {} is now in maintenance mode", slot_number),
        slots,
    }))
}

pub async fn end_maintenance_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SlotsResponse>> {
    let slot_number = parse_slot_number(&id)?;
    let slots = state.service.end_maintenance(slot_number).await?;

    Ok(Json(SlotsResponse {
        success: true,
        message: format!("Parking slot with ID {} is now in working state", slot_number),
        slots,
    }))
}

pub async fn statistics_handler(State(state): State<AppState>) -> Result<Json<StatisticsResponse>> {
    Ok(Json(StatisticsResponse {
        success: true,
        statistics: state.service.statistics().await?,
    }))
}

pub async fn history_handler(State(state): State<AppState>) -> Result<Json<HistoryResponse>> {
    Ok(Json(HistoryResponse {
        success: true,
        records: state.service.history().await?,
    }))
}
