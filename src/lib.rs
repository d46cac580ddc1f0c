//! Evalio - technical interview simulator for vocational-training students.
//!
//! A candidate talks to an AI interviewer one turn at a time; at the end the
//! transcript is turned into an evaluation report with an employability
//! rating. Candidate input is screened for prompt injection before it is
//! stored, and model output is cleaned before it reaches the report.
//!
//! Layout follows a hexagonal architecture:
//! - `domain` - conversations, turns, metadata extraction and sanitizers
//! - `ports` - traits for the model, storage, rendering and auth
//! - `application` - exchange and chat management handlers
//! - `adapters` - implementations of the ports plus the axum API
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
