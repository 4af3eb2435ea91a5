//! # Trip Planner
//!
//! Multi-city itinerary planning: a trip is an ordered list of cities, each
//! staying a number of nights, each night a dated day holding events. Day
//! dates are always derived from the trip start and the nights of the cities
//! before; structural edits rebuild the day sequence and carry events over
//! by day position.
//!
//! ## Usage
//!
//! ```bash
//! trip-planner show
//! trip-planner city add Lisbon --nights 3
//! trip-planner event add Lisbon 1 "Tram 28" --type transport
//! ```
//!
//! ## Modules
//!
//! - `itinerary` - Trip model, date sequencing, reconciliation, moves, selection and views
//! - `planner` - Command surface that edits a trip and persists after every change
//! - `storage` - Whole-document JSON persistence behind the `TripStore` trait
//! - `config` - TOML configuration with environment overrides
//! - `error` - Unified error type with stable error codes
pub mod config;
pub mod error;
pub mod itinerary;
pub mod planner;
pub mod storage;

pub use error::{PlannerError, Result};
pub use planner::Planner;
