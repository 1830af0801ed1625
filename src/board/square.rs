//! Algebraic square names.
//!
//! Square coordinates here are `(rank_index, file_index)` with rank 1 at
//! index 0 and file `a` at index 0, so `"e4"` maps to `(3, 4)`. This is the
//! opposite row direction from a placement scan, which starts at rank 8.

/// File letters in board order.
pub const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// Errors from square name lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareError {
    #[error("invalid square name: '{0}'")]
    InvalidSquareName(String),
}

/// Converts an algebraic square name (`"a1"`..`"h8"`, lowercase only) into
/// `(rank_index, file_index)`.
pub fn square_to_index(square: &str) -> Result<(usize, usize), SquareError> {
    let invalid = || SquareError::InvalidSquareName(square.to_string());

    let mut chars = square.chars();
    let (file_char, rank_char) = match (chars.next(), chars.next(), chars.next()) {
        (Some(f), Some(r), None) => (f, r),
        _ => return Err(invalid()),
    };

    let file = FILES.iter().position(|&f| f == file_char).ok_or_else(invalid)?;
    let rank = match rank_char.to_digit(10) {
        Some(r @ 1..=8) => r as usize - 1,
        _ => return Err(invalid()),
    };

    Ok((rank, file))
}

/// Inverse of `square_to_index`. Returns `None` if either index is off the board.
pub fn index_to_square(rank: usize, file: usize) -> Option<String> {
    if rank >= 8 || file >= 8 {
        return None;
    }
    Some(format!("{}{}", FILES[file], rank + 1))
}

/// Mirrors a square across the horizontal center line: the file is kept and
/// rank `r` becomes `9 - r`.
pub fn mirror_rank(square: &str) -> Result<String, SquareError> {
    let (rank, file) = square_to_index(square)?;
    Ok(format!("{}{}", FILES[file], 8 - rank))
}
