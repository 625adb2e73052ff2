//! Line-oriented TCP chat relay.
//!
//! Participants connect over TCP, choose a name, and exchange newline-delimited
//! messages that are fanned out to every other connected participant.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// wiring
pub mod bootstrap;
pub mod config;
