pub mod account;
pub mod admin;
pub mod articles;
pub mod deals;
pub mod homepage;
pub mod learn;
pub mod mdf;
pub mod tickets;
