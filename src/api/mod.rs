pub mod checkin;
pub mod history;
pub mod roster;
pub mod settings;
