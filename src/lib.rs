#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Terminal field builder and end-user form for a dynamic select-field
//! backend.

pub mod api;
pub mod config;
pub mod logging;
pub mod model;
pub mod storage;
pub mod tui;
