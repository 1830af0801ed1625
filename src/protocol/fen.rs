//! FEN (Forsyth-Edwards Notation) parsing and board flipping.
//!
//! A FEN string has six space-separated fields:
//! `<placement> <side> <castling> <en_passant> <halfmove> <fullmove>`
//!
//! Parsing only checks the field count. The individual fields are kept as
//! written so that an unflipped record prints back exactly as it was parsed.
//! Placement characters are validated later, when the record is encoded.

use std::fmt;
use std::str::FromStr;

use crate::board::piece::{swap_symbol_color, Color};
use crate::board::square::mirror_rank;

/// Number of space-separated fields in a FEN string.
pub const FEN_FIELD_COUNT: usize = 6;

/// The standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors that can occur during FEN parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 6 fields separated by ' ', got {0}")]
    WrongFieldCount(usize),
}

/// The four castling rights, as flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub white_king: bool,
    pub white_queen: bool,
    pub black_king: bool,
    pub black_queen: bool,
}

/// A parsed FEN position.
///
/// The record owns its six fields. `flip` rewrites the first four in place
/// and never touches the move counters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FenRecord {
    placement: String,
    side_to_move: String,
    castling: String,
    en_passant: String,
    halfmove_clock: String,
    fullmove_number: String,
}

/// Parses a FEN string into a `FenRecord`.
///
/// Fields are split on single spaces, so doubled spaces count as an empty
/// field and make the string malformed.
pub fn parse_fen(s: &str) -> Result<FenRecord, FenError> {
    let fields: Vec<&str> = s.split(' ').collect();
    if fields.len() != FEN_FIELD_COUNT {
        return Err(FenError::WrongFieldCount(fields.len()));
    }

    Ok(FenRecord {
        placement: fields[0].to_string(),
        side_to_move: fields[1].to_string(),
        castling: fields[2].to_string(),
        en_passant: fields[3].to_string(),
        halfmove_clock: fields[4].to_string(),
        fullmove_number: fields[5].to_string(),
    })
}

/// Encodes a `FenRecord` into its canonical string: the six fields joined by
/// single spaces.
pub fn encode_fen(record: &FenRecord) -> String {
    record.fields().join(" ")
}

impl FenRecord {
    /// The six fields in FEN order.
    pub fn fields(&self) -> [&str; FEN_FIELD_COUNT] {
        [
            &self.placement,
            &self.side_to_move,
            &self.castling,
            &self.en_passant,
            &self.halfmove_clock,
            &self.fullmove_number,
        ]
    }

    /// The piece placement field (rank 8 first).
    pub fn placement(&self) -> &str {
        &self.placement
    }

    /// The side-to-move letter, normally `"w"` or `"b"`.
    pub fn side_to_move(&self) -> &str {
        &self.side_to_move
    }

    /// The side to move, if the field holds a valid color letter.
    pub fn active_color(&self) -> Option<Color> {
        Color::from_fen(&self.side_to_move)
    }

    pub fn castling(&self) -> &str {
        &self.castling
    }

    pub fn halfmove_clock(&self) -> &str {
        &self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> &str {
        &self.fullmove_number
    }

    pub fn can_castle_white_king(&self) -> bool {
        self.castling.contains('K')
    }

    pub fn can_castle_white_queen(&self) -> bool {
        self.castling.contains('Q')
    }

    pub fn can_castle_black_king(&self) -> bool {
        self.castling.contains('k')
    }

    pub fn can_castle_black_queen(&self) -> bool {
        self.castling.contains('q')
    }

    /// All four castling rights.
    pub fn castling_rights(&self) -> CastlingRights {
        CastlingRights {
            white_king: self.can_castle_white_king(),
            white_queen: self.can_castle_white_queen(),
            black_king: self.can_castle_black_king(),
            black_queen: self.can_castle_black_queen(),
        }
    }

    /// Castling rights ordered `[black king, white king, black queen, white queen]`.
    pub fn castling_vector(&self) -> [bool; 4] {
        [
            self.can_castle_black_king(),
            self.can_castle_white_king(),
            self.can_castle_black_queen(),
            self.can_castle_white_queen(),
        ]
    }

    /// The en-passant target square, or `None` when the field is `"-"`.
    pub fn en_passant_target(&self) -> Option<&str> {
        if self.en_passant == "-" {
            None
        } else {
            Some(&self.en_passant)
        }
    }

    /// Canonical string form of the record.
    pub fn fen_string(&self) -> String {
        encode_fen(self)
    }

    /// Flips the board orientation: toggles the side to move, mirrors the
    /// placement vertically with every piece color swapped, swaps the colors
    /// of the castling rights, and mirrors the en-passant rank (the file is
    /// kept).
    ///
    /// Applying `flip` twice restores the original record whenever the
    /// castling field is `-` or a subsequence of `KQkq`.
    pub fn flip(&mut self) {
        self.side_to_move = flip_side(&self.side_to_move).to_string();
        self.placement = flip_placement(&self.placement);
        self.castling = flip_castling(&self.castling);
        self.en_passant = flip_en_passant(&self.en_passant);
    }

    /// Flips the record if black is to move, so the result always has white
    /// to move. Returns whether a flip happened.
    pub fn orient_white(&mut self) -> bool {
        if self.active_color() == Some(Color::Black) {
            self.flip();
            true
        } else {
            false
        }
    }
}

impl FromStr for FenRecord {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fen(s)
    }
}

impl fmt::Display for FenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_fen(self))
    }
}

/// `"b"` becomes `"w"`; anything else becomes `"b"`.
fn flip_side(side: &str) -> &'static str {
    if side == "b" {
        "w"
    } else {
        "b"
    }
}

/// Reverses the rank order and swaps the color of every piece. Files within
/// a rank keep their order.
fn flip_placement(placement: &str) -> String {
    placement
        .split('/')
        .rev()
        .map(|rank| rank.chars().map(swap_symbol_color).collect::<String>())
        .collect::<Vec<_>>()
        .join("/")
}

/// Swaps the color of each castling right. The output is built by scanning
/// `k q K Q` and emitting the swapped letter for each one present, so it is
/// always a subsequence of `KQkq`.
fn flip_castling(castling: &str) -> String {
    if castling == "-" {
        return castling.to_string();
    }

    let flipped: String = ['k', 'q', 'K', 'Q']
        .iter()
        .filter(|&&c| castling.contains(c))
        .map(|&c| swap_symbol_color(c))
        .collect();

    if flipped.is_empty() {
        "-".to_string()
    } else {
        flipped
    }
}

/// Mirrors the en-passant target across the center line. Fields that are
/// not a valid square are left as they are.
fn flip_en_passant(en_passant: &str) -> String {
    if en_passant == "-" {
        return en_passant.to_string();
    }
    mirror_rank(en_passant).unwrap_or_else(|_| en_passant.to_string())
}
