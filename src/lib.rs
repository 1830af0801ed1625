//! poseval library.
//!
//! Parses FEN positions, flips their orientation, and encodes them into the
//! flat, sparse and dense tensors used as position evaluation model input.

pub mod batch;
pub mod board;
pub mod nn;
pub mod protocol;
