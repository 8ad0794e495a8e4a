// API module - HTTP endpoints

pub mod auth;
pub mod email;
pub mod expert;
pub mod feedback;
pub mod middleware;
pub mod results;
pub mod selftest;
pub mod superuser;
pub mod systems;
pub mod uploads;
