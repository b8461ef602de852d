//! Decision-source interface and the Google AI Studio client behind it.
//!
//! The decision source is deliberately untrusted: whatever it emits is run
//! through an explicit fallible parse, and the caller maps parse failures to
//! a safe HOLD.

mod client;
mod parse;
mod scripted;
mod types;

pub use client::{AiStudioClient, AiStudioConfig};
pub use parse::{normalize_payload, parse_decision_text};
pub use scripted::ScriptedDecisionSource;
pub use types::{DecisionError, DecisionPayload, DecisionRequest, DecisionSource, RiskSummary};
