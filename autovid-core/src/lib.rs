//! AutoVid Core
//!
//! Core types for the AutoVid content-generation client.
//!
//! This crate contains:
//! - Domain types: Core entities (VideoConfig, Script, WorkflowStage, etc.)
//! - DTOs: Data transfer objects for the generation service wire protocol

pub mod domain;
pub mod dto;
