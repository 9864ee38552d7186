//! Read-only JSON API over the Hawaii weather-observation dataset.
//!
//! - [`store`]: SQLite queries against the `station` and `measurement` tables
//! - [`climate`]: lookback window and date-range clamping
//! - [`gateway`]: axum routes and server loop
//! - [`config`]: TOML + environment configuration

pub mod climate;
pub mod config;
pub mod gateway;
pub mod store;
