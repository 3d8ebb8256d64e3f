//! Dr. Hipócrates, a symptom triage relay service.
//!
//! Relays patient-described symptoms to a hosted Gemini chat endpoint,
//! validates the model's structured JSON reply into display data, and on
//! request compiles the accumulated technical records into a referral
//! letter rendered as a PDF.
//!
//! Nothing is persisted: a session's conversation, records, and report live
//! only in memory and are destroyed when the session ends.

pub mod api;
pub mod config;
pub mod core_state;
pub mod models;
pub mod pipeline;
pub mod report;
