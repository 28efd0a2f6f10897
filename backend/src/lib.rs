//! # IntegraUPT services portal backend
//!
//! Booking of laboratories and classrooms and scheduling of counseling
//! appointments for the university services portal.
//!
//! ## Features
//!
//! - **Weekly schedules**: derive the occupation grid of a space from its
//!   schedule entries and the time-block catalog
//! - **Reservations**: quick and general booking forms, status overlay,
//!   cancellation and deletion rules
//! - **Counseling**: fixed-length psychological counseling appointments
//! - **Audit trail**: status-change history, searches and statistics
//! - **HTTP API**: RESTful endpoints for the portal frontend
//!
//! ## Architecture
//!
//! - [`models`]: domain types with the portal's wire names
//! - [`services`]: pure domain logic (grid derivation, validation, filters)
//! - [`portal`]: view-state machine and session access
//! - [`db`]: repository pattern, seed fixtures and the service layer
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod portal;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
