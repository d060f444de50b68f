//! # stegoboard
//!
//! A community platform for image steganography puzzles: users publish
//! image-based tasks with a hidden answer, other users solve them for
//! points, and abusive tasks can be reported and taken down through a
//! lightweight complaint workflow.
//!
//! ## Core flow
//! 1. An author creates a task (image + hidden answer + points)
//! 2. Solvers submit answers; exact matches add them to the task's done set
//!    and credit the points once
//! 3. Anyone can file a complaint against a task; staff adjudicate.
//!    Accepting a complaint deactivates the task and dismisses the other
//!    pending complaints against it
//!
//! ## Modules
//! - `api`: HTTP surface (axum), JWT sessions
//! - `workflow`: task completion/scoring and complaint moderation engines
//! - `store`: entity storage (sqlite, plus in-memory for tests)
//! - `config`: environment-driven configuration

pub mod api;
pub mod config;
pub mod store;
pub mod workflow;

pub use config::Config;
