//! Data transfer objects for the generation service wire protocol
//!
//! One module per endpoint family. DTOs mirror the JSON bodies exchanged
//! with the service and stay free of client logic.

pub mod library;
pub mod pipeline;
pub mod script;
pub mod suggest;
