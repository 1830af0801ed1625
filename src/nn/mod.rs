//! Model input feature encoding.
//!
//! Converts a `FenRecord` into the flat, sparse and dense [8, 8, L] tensor
//! formats consumed by the position evaluation model.

pub mod encoding;

pub use encoding::{
    encode_castling, encode_dense, encode_en_passant, encode_flat, encode_full, encode_sparse,
    transform, EncodeError, Encoded, SparseEncoding, Transformation, ALL_TRANSFORMATIONS,
};
