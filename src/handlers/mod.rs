pub mod daily_logs;
pub mod dashboard;
pub mod extract;
pub mod health;
