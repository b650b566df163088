use crate::adapters::client::ParkingClient;
use crate::domain::model::Slot;
use crate::utils::error::{ParkingError, Result};
use crate::utils::validation::validate_vehicle_number;

const GRID_COLUMNS: usize = 5;

/// Terminal version of the lot management screen.
///
/// Keeps the last slot list fetched from the API plus the message and input
/// error that the next `render` shows.
pub struct ParkingScreen {
    client: ParkingClient,
    slots: Vec<Slot>,
    response_message: Option<String>,
    input_error: Option<String>,
}

impl ParkingScreen {
    pub fn new(client: ParkingClient) -> Self {
        Self {
            client,
            slots: Vec::new(),
            response_message: None,
            input_error: None,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn response_message(&self) -> Option<&str> {
        self.response_message.as_deref()
    }

    pub fn input_error(&self) -> Option<&str> {
        self.input_error.as_deref()
    }

    /// Failure messages are the ones mentioning "failed".
    pub fn is_error_message(&self) -> bool {
        self.response_message
            .as_deref()
            .map(|m| m.to_lowercase().contains("failed"))
            .unwrap_or(false)
    }

    pub async fn refresh_slots(&mut self) -> Result<()> {
        let response = self.client.slots().await?;
        self.slots = response.slots;
        Ok(())
    }

    fn validate_input(&mut self, vehicle_number: &str) -> Result<String> {
        match validate_vehicle_number(Some(vehicle_number)) {
            Ok(v) => {
                self.input_error = None;
                Ok(v)
            }
            Err(e) => {
                self.input_error = Some("Please enter a valid vehicle number".to_string());
                Err(e)
            }
        }
    }

    pub async fn park(&mut self, vehicle_number: &str) -> Result<()> {
        let vehicle_number = self.validate_input(vehicle_number)?;

        match self.client.park(&vehicle_number).await {
            Ok(response) => {
                self.response_message = Some(response.message);
            }
            Err(e) => {
                tracing::error!("Error parking vehicle: {}", e);
                self.response_message = Some("Failed to Park the Vehicle".to_string());
                return Err(e);
            }
        }

        self.refresh_slots().await
    }

    pub async fn unpark(&mut self, vehicle_number: &str) -> Result<()> {
        let vehicle_number = self.validate_input(vehicle_number)?;

        match self.client.unpark(&vehicle_number).await {
            Ok(response) => {
                self.response_message = Some(format!(
                    "{} Parking Fee: Rs. {}",
                    response.message, response.parking_fee
                ));
            }
            Err(e) => {
                tracing::error!("Error unparking vehicle: {}", e);
                self.response_message = Some("Failed to Unpark the Vehicle".to_string());
                return Err(e);
            }
        }

        self.refresh_slots().await
    }

    /// 點選車位：切換維修狀態
    pub async fn press_slot(&mut self, slot_number: u32) -> Result<()> {
        if self.slots.is_empty() {
            self.refresh_slots().await?;
        }

        let in_maintenance = self
            .slots
            .iter()
            .find(|s| s.slot_number == slot_number)
            .map(|s| s.in_maintenance)
            .ok_or(ParkingError::SlotNotFound { slot_number })?;

        let result = if in_maintenance {
            self.client.end_maintenance(slot_number).await
        } else {
            self.client.start_maintenance(slot_number).await
        };

        match result {
            Ok(response) => {
                self.response_message = Some(response.message);
                self.slots = response.slots;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error toggling maintenance on slot {}: {}", slot_number, e);
                self.response_message = Some("Failed to update slot maintenance".to_string());
                Err(e)
            }
        }
    }

    pub async fn show_statistics(&mut self) -> Result<()> {
        let stats = self.client.statistics().await?.statistics;
        self.response_message = Some(format!(
            "Total slots: {}, In maintenance: {}, Parked vehicles: {}, Revenue: Rs. {}",
            stats.total_slots,
            stats.maintenance_slots,
            stats.total_parked_vehicles,
            stats.total_revenue
        ));
        Ok(())
    }

    pub async fn show_status(&mut self) -> Result<()> {
        let records = self.client.status().await?.parking_lot;

        let message = if records.is_empty() {
            "No vehicles parked".to_string()
        } else {
            records
                .iter()
                .map(|r| format!("{} @ slot {}", r.vehicle_number, r.slot_number))
                .collect::<Vec<_>>()
                .join(", ")
        };

        self.response_message = Some(message);
        Ok(())
    }

    /// 已離場紀錄：車號、車位與收費
    pub async fn show_history(&mut self) -> Result<()> {
        let records = self.client.history().await?.records;

        let message = if records.is_empty() {
            "No completed parking sessions".to_string()
        } else {
            records
                .iter()
                .map(|r| {
                    format!(
                        "{} @ slot {}: Rs. {}",
                        r.vehicle_number, r.slot_number, r.charged_amount
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        self.response_message = Some(message);
        Ok(())
    }

    /// Booked wins over maintenance, maintenance over available.
    fn slot_marker(slot: &Slot) -> char {
        if slot.is_booked() {
            'B'
        } else if slot.in_maintenance {
            'M'
        } else {
            '.'
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec!["Parking Lot Application".to_string()];

        if let Some(message) = &self.response_message {
            let prefix = if self.is_error_message() { "✗" } else { "✓" };
            lines.push(format!("{} {}", prefix, message));
        }
        if let Some(error) = &self.input_error {
            lines.push(format!("! {}", error));
        }

        lines.push(String::new());
        lines.push("All available Slots".to_string());
        lines.push("  B: Booked Slot   .: Available Slot   M: Slot is Under Maintenance".to_string());

        for row in self.slots.chunks(GRID_COLUMNS) {
            let cells: Vec<String> = row
                .iter()
                .map(|slot| format!("[{:>2} {}]", slot.slot_number, Self::slot_marker(slot)))
                .collect();
            lines.push(cells.join(" "));
        }

        lines.join("\n")
    }
}
