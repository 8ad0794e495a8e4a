// Services module - Business logic

pub mod mailer;
pub mod password;
pub mod scoring;
pub mod upload;
pub mod verification;
