//! Board coordinates and piece definitions.
//!
//! Contains algebraic square lookups and the piece symbol tables that drive
//! both the FEN flip and the tensor layer schemes.

pub mod piece;
pub mod square;

pub use piece::{
    swap_symbol_color, Color, LayerScheme, Piece, PieceKind, PIECE_COUNT, PIECE_SYMBOLS,
};
pub use square::{index_to_square, mirror_rank, square_to_index, SquareError, FILES};
