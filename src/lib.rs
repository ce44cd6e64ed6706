// src/lib.rs

//! Simulados client library
//!
//! Page controllers for the simulados study tracker, the typed API client
//! they share, and the session timer.

pub mod api;
pub mod error;
pub mod models;
pub mod page;
pub mod session;
pub mod utils;
pub mod views;
