pub mod checkin;
pub mod message;
pub mod monitor;
