//! `autofisher` - Reactive automation for a timed fishing minigame
//!
//! Subscribes to a fishing engine's phase and crit events, hooks fish as
//! soon as they bite, and reels on good crit windows after a human-like
//! delay. A simulated engine lets the core run and be tested without a game.

pub mod automation;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod observability;
pub mod sim;
