//! Shared UI crate for Tollboard. Cross-platform logic and views live here.

pub mod chart;
pub mod core;
pub mod data;
pub mod views;
pub mod vote;
