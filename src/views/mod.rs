pub mod account;
pub mod admin;
pub mod articles;
pub mod certificate;
pub mod components;
pub mod deals;
pub mod homepage;
pub mod layout;
pub mod learn;
pub mod mdf;
pub mod tickets;

// Re-export commonly used functions from layout
pub use layout::{page, render, titled};
