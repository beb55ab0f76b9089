//! Core library for airboard.
//!
//! Looks up a fixed list of airlines against a public lookup service, keeps
//! the merged results in a local cache, refreshes them on a timer and
//! projects them through the board's tabs. The terminal front end lives in
//! the `airboard-tui` crate.

pub mod api;
pub mod board;
pub mod cache;
pub mod config;
pub mod filter;
pub mod models;
pub mod sync;
pub mod utils;

pub use api::{AirlineClient, AirlineLookup, ApiError};
pub use board::{BoardState, CardView};
pub use cache::CacheManager;
pub use config::{Config, AIRLINE_CODES};
pub use filter::{filter_airlines, BoardTab};
pub use models::{AirlineList, AirlineRecord};
pub use sync::{BoardHandle, SyncEvent, Synchronizer};
