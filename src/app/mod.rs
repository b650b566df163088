pub mod screen;

pub use screen::ParkingScreen;
