//! Portfolio site: page rendering, the contact relay and interaction-driven
//! content personalization.
//!
//! The `portfolio` binary serves the HTTP surface; `session` is the
//! visitor-side model (interaction tracking, the single-shot
//! personalization trigger and the contact form state machine) that talks
//! to it.

pub mod config;
pub mod contact;
pub mod content;
pub mod errors;
pub mod llm_client;
pub mod personalization;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;
