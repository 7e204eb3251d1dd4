//! # Agenda Rust Backend
//!
//! Appointment-booking backend for multi-tenant businesses.
//!
//! This crate provides the scheduling core of the platform: given a business,
//! a calendar date and optionally a service, it computes the bookable start
//! times for that date, honoring weekly operating hours, seasonal schedule
//! overrides, explicit blocks (vacations, holidays, maintenance), existing
//! bookings and per-business lead-time configuration. The backend exposes a
//! REST API via Axum.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes and Data Transfer Objects (DTOs)
//! - [`models`]: Typed domain records (businesses, schedules, bookings, ...)
//! - [`db`]: Repository pattern and the in-memory persistence backend
//! - [`services`]: Availability computation and booking commands
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! All interval arithmetic uses half-open `[start, end)` semantics and all
//! wall-clock decisions are made in the business's own IANA timezone; instants
//! are stored and compared in UTC.

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
