//! Position notation handling.
//!
//! This module implements parsing, serialization and orientation flipping
//! for FEN position strings.

pub mod fen;

pub use fen::{encode_fen, parse_fen, CastlingRights, FenError, FenRecord, START_FEN};
