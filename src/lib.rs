// SPDX-License-Identifier: GPL-3.0-or-later

//! Static position evaluation for a multi-variant chess engine.
//!
//! The crate exposes a single entry point, [`evaluate::Evaluator`], which
//! owns the material and pawn hash caches and the contempt setting. A search
//! creates one evaluator per thread and calls [`evaluate::Evaluator::evaluate`]
//! at leaf nodes; [`evaluate::Evaluator::trace`] renders the same computation
//! as a per-term table for diagnostics.

pub mod bitboard;
pub mod endgame;
pub mod evaluate;
pub mod material;
pub mod misc;
pub mod params;
pub mod pawns;
pub mod position;
pub mod psqt;
pub mod types;

pub use evaluate::Evaluator;
pub use position::Position;
pub use types::{Value, Variant};
