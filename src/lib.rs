pub mod admin;
pub mod config;
pub mod dates;
pub mod error;
pub mod portal;
pub mod store;
pub mod web;
