//! Core types for the support agent
//!
//! This crate provides the foundational types shared across the other crates:
//! - Conversation turns and speaker roles
//! - Closed classification label sets (sentiment, intent)

pub mod classification;
pub mod conversation;

pub use classification::{IntentLabel, Sentiment};
pub use conversation::{Turn, TurnRole};
