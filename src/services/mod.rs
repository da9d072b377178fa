pub mod auth;
pub mod certificate;
pub mod progress;
