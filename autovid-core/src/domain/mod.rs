//! Core domain types
//!
//! This module contains the domain structures shared across the AutoVid
//! client crates. These types represent the entities the orchestration
//! layer reasons about: the run configuration, the interactive script,
//! the pipeline stage model, and the video library snapshot.

pub mod config;
pub mod library;
pub mod script;
pub mod stage;
