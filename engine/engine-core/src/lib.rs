//! Core traits and types for NoGo-style placement games
//!
//! This crate provides the abstractions the search engine consumes:
//! - `Color`: the two players
//! - `Board`: the board service (copy, legality-checked placement, side to move)
//! - `Place`: a placement move value
//! - `Verdict`: the legality outcome of a placement
//! - Helpers for enumerating and counting legal placements

pub mod action;
pub mod game_utils;
pub mod typed;

// Re-export main types for convenience
pub use action::Place;
pub use game_utils::{has_legal_move, legal_move_count, legal_moves};
pub use typed::{Board, Color, ParseColorError, Verdict};
