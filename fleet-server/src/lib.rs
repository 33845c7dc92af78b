//! Fleet route planner server.
//!
//! Resolves place names, compares route estimates under three routing
//! policies, fetches a driving path for the chosen route and replays it as
//! simulated live tracking.

pub mod cache;
pub mod config;
pub mod domain;
pub mod geocode;
pub mod osrm;
pub mod planner;
pub mod simulator;
pub mod storage;
pub mod web;
