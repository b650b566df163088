pub mod fee;
pub mod service;
