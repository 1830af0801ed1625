//! FEN position -> tensor encoding for evaluation model input.
//!
//! Piece tensors have shape [8, 8, L] indexed `[row, col, layer]`, where row 0
//! is the first rank token of the placement field (rank 8) and col 0 is file
//! `a`. L is 6 or 12 depending on the `LayerScheme`:
//!   6-layer:  [p, n, b, r, q, k], black +1, white -1
//!   12-layer: [p, P, n, N, b, B, r, R, q, Q, k, K], presence 1
//!
//! The full tensor appends three auxiliary planes after the piece layers:
//!   [L]     castling rights, white (g1 king-side, c1 queen-side)
//!   [L + 1] castling rights, black (g8 king-side, c8 queen-side)
//!   [L + 2] en-passant target square
//!
//! The auxiliary planes address squares with `square_to_index`, which counts
//! rows from rank 1. Piece layers count rows from rank 8.

use std::fmt;
use std::str::FromStr;

use ndarray::{s, Array3};
use serde::{Deserialize, Serialize};

use crate::board::piece::{LayerScheme, Piece};
use crate::board::square::{square_to_index, SquareError};
use crate::protocol::fen::FenRecord;

/// Rows and columns on the board.
pub const BOARD_SIZE: usize = 8;

/// Number of castling planes.
pub const CASTLING_PLANES: usize = 2;

/// Number of en-passant planes.
pub const EN_PASSANT_PLANES: usize = 1;

/// Planes appended after the piece layers in the full tensor.
pub const AUX_PLANES: usize = CASTLING_PLANES + EN_PASSANT_PLANES;

/// Castling cells as `[row, col, plane]`, rows counted from rank 1.
const BLACK_KING_SIDE_CELL: [usize; 3] = [7, 6, 1]; // g8
const WHITE_KING_SIDE_CELL: [usize; 3] = [0, 6, 0]; // g1
const BLACK_QUEEN_SIDE_CELL: [usize; 3] = [7, 2, 1]; // c8
const WHITE_QUEEN_SIDE_CELL: [usize; 3] = [0, 2, 0]; // c1

/// Errors that can occur while encoding a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("unknown piece symbol in placement: '{0}'")]
    UnknownPieceSymbol(char),

    #[error("piece at row {row}, column {col} is off the board")]
    SquareOffBoard { row: usize, col: usize },

    #[error(transparent)]
    Square(#[from] SquareError),

    #[error("no such transformation type: '{0}'")]
    UnknownTransformation(String),
}

/// Occupied squares only, as four parallel arrays of equal length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseEncoding {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub layers: Vec<usize>,
    pub values: Vec<f32>,
}

impl SparseEncoding {
    /// Number of entries (occupied squares).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, row: usize, col: usize, layer: usize, value: f32) {
        self.rows.push(row);
        self.cols.push(col);
        self.layers.push(layer);
        self.values.push(value);
    }

    /// Iterates entries as `(row, col, layer, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, usize, f32)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.layers)
            .zip(&self.values)
            .map(|(((&r, &c), &l), &v)| (r, c, l, v))
    }

    /// Scatters the entries into a zeroed [8, 8, layers] tensor. `layers`
    /// must be the layer count of the scheme the entries were encoded with.
    pub(crate) fn to_dense(&self, layers: usize) -> Array3<f32> {
        let mut tensor = Array3::<f32>::zeros((BOARD_SIZE, BOARD_SIZE, layers));
        for (row, col, layer, value) in self.iter() {
            tensor[[row, col, layer]] = value;
        }
        tensor
    }
}

/// Walks a placement field, calling `visit(row, col, piece)` for each piece.
///
/// Digits skip that many columns and `/` starts the next row. Any other
/// character must be a piece letter.
fn scan_placement<F>(placement: &str, mut visit: F) -> Result<(), EncodeError>
where
    F: FnMut(usize, usize, Piece),
{
    let mut row = 0;
    let mut col = 0;

    for c in placement.chars() {
        if let Some(skip) = c.to_digit(10) {
            col += skip as usize;
        } else if c == '/' {
            row += 1;
            col = 0;
        } else {
            let piece = Piece::from_fen_char(c).ok_or(EncodeError::UnknownPieceSymbol(c))?;
            if row >= BOARD_SIZE || col >= BOARD_SIZE {
                return Err(EncodeError::SquareOffBoard { row, col });
            }
            visit(row, col, piece);
            col += 1;
        }
    }

    Ok(())
}

/// Encodes a placement field as a sparse list of occupied squares.
pub fn encode_sparse(placement: &str, scheme: LayerScheme) -> Result<SparseEncoding, EncodeError> {
    let mut sparse = SparseEncoding::default();
    scan_placement(placement, |row, col, piece| {
        sparse.push(row, col, scheme.layer(piece), scheme.value(piece));
    })?;
    Ok(sparse)
}

/// Encodes a placement field as a dense [8, 8, L] tensor.
pub fn encode_dense(placement: &str, scheme: LayerScheme) -> Result<Array3<f32>, EncodeError> {
    let sparse = encode_sparse(placement, scheme)?;
    Ok(sparse.to_dense(scheme.num_layers()))
}

/// Encodes a placement field as a flat vector of length 64 * L, laid out
/// row-major as `L * (8 * row + col) + layer`.
pub fn encode_flat(placement: &str, scheme: LayerScheme) -> Result<Vec<f32>, EncodeError> {
    let layers = scheme.num_layers();
    let mut vector = vec![0.0f32; BOARD_SIZE * BOARD_SIZE * layers];
    scan_placement(placement, |row, col, piece| {
        vector[layers * (BOARD_SIZE * row + col) + scheme.layer(piece)] = scheme.value(piece);
    })?;
    Ok(vector)
}

/// 6-layer flat vector of a record's pieces.
pub fn pieces_6x8x8_flat(record: &FenRecord) -> Result<Vec<f32>, EncodeError> {
    encode_flat(record.placement(), LayerScheme::Six)
}

/// 12-layer flat vector of a record's pieces.
pub fn pieces_12x8x8_flat(record: &FenRecord) -> Result<Vec<f32>, EncodeError> {
    encode_flat(record.placement(), LayerScheme::Twelve)
}

/// 6-layer sparse encoding of a record's pieces.
pub fn pieces_6x8x8_sparse(record: &FenRecord) -> Result<SparseEncoding, EncodeError> {
    encode_sparse(record.placement(), LayerScheme::Six)
}

/// 12-layer sparse encoding of a record's pieces.
pub fn pieces_12x8x8_sparse(record: &FenRecord) -> Result<SparseEncoding, EncodeError> {
    encode_sparse(record.placement(), LayerScheme::Twelve)
}

/// Dense piece tensor of a record.
pub fn pieces_dense(record: &FenRecord, scheme: LayerScheme) -> Result<Array3<f32>, EncodeError> {
    encode_dense(record.placement(), scheme)
}

/// Encodes castling rights as an [8, 8, 2] tensor with up to four set cells.
pub fn encode_castling(record: &FenRecord) -> Array3<f32> {
    let mut tensor = Array3::<f32>::zeros((BOARD_SIZE, BOARD_SIZE, CASTLING_PLANES));
    let [black_king, white_king, black_queen, white_queen] = record.castling_vector();

    let cells = [
        (BLACK_KING_SIDE_CELL, black_king),
        (WHITE_KING_SIDE_CELL, white_king),
        (BLACK_QUEEN_SIDE_CELL, black_queen),
        (WHITE_QUEEN_SIDE_CELL, white_queen),
    ];
    for (cell, right) in cells {
        tensor[cell] = if right { 1.0 } else { 0.0 };
    }

    tensor
}

/// Encodes the en-passant target as an [8, 8, 1] tensor, all zero when there
/// is no target.
pub fn encode_en_passant(record: &FenRecord) -> Result<Array3<f32>, EncodeError> {
    let mut tensor = Array3::<f32>::zeros((BOARD_SIZE, BOARD_SIZE, EN_PASSANT_PLANES));
    if let Some(square) = record.en_passant_target() {
        let (row, col) = square_to_index(square)?;
        tensor[[row, col, 0]] = 1.0;
    }
    Ok(tensor)
}

/// Stacks the dense pieces, castling planes and en-passant plane along the
/// last axis into an [8, 8, L + 3] tensor.
pub fn encode_full(record: &FenRecord, scheme: LayerScheme) -> Result<Array3<f32>, EncodeError> {
    let layers = scheme.num_layers();
    let pieces = pieces_dense(record, scheme)?;
    let castling = encode_castling(record);
    let en_passant = encode_en_passant(record)?;

    let mut full = Array3::<f32>::zeros((BOARD_SIZE, BOARD_SIZE, layers + AUX_PLANES));
    full.slice_mut(s![.., .., ..layers]).assign(&pieces);
    full.slice_mut(s![.., .., layers..layers + CASTLING_PLANES])
        .assign(&castling);
    full.slice_mut(s![.., .., layers + CASTLING_PLANES..])
        .assign(&en_passant);

    Ok(full)
}

/// The encodings a caller can select by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transformation {
    /// Flat 6-layer piece vector.
    Vector6,
    /// Flat 12-layer piece vector.
    Vector12,
    /// Sparse 6-layer piece coordinates.
    Tensor6Sparse,
    /// Sparse 12-layer piece coordinates.
    Tensor12Sparse,
    /// Flattened full tensor over 6 piece layers.
    Full6,
    /// Flattened full tensor over 12 piece layers.
    Full12,
}

/// All transformations, in declaration order.
pub const ALL_TRANSFORMATIONS: [Transformation; 6] = [
    Transformation::Vector6,
    Transformation::Vector12,
    Transformation::Tensor6Sparse,
    Transformation::Tensor12Sparse,
    Transformation::Full6,
    Transformation::Full12,
];

impl Transformation {
    /// The transformation's name tag.
    pub const fn name(self) -> &'static str {
        match self {
            Transformation::Vector6 => "vector6x8x8",
            Transformation::Vector12 => "vector12x8x8",
            Transformation::Tensor6Sparse => "tensor6x8x8",
            Transformation::Tensor12Sparse => "tensor12x8x8",
            Transformation::Full6 => "full6",
            Transformation::Full12 => "full12",
        }
    }

    /// The piece layer scheme used by this transformation.
    pub const fn scheme(self) -> LayerScheme {
        match self {
            Transformation::Vector6 | Transformation::Tensor6Sparse | Transformation::Full6 => {
                LayerScheme::Six
            }
            Transformation::Vector12
            | Transformation::Tensor12Sparse
            | Transformation::Full12 => LayerScheme::Twelve,
        }
    }
}

impl FromStr for Transformation {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_TRANSFORMATIONS
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| EncodeError::UnknownTransformation(s.to_string()))
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of `transform`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Encoded {
    Vector(Vec<f32>),
    Sparse(SparseEncoding),
}

/// Encodes a record with the selected transformation.
pub fn transform(record: &FenRecord, transformation: Transformation) -> Result<Encoded, EncodeError> {
    let scheme = transformation.scheme();
    match transformation {
        Transformation::Vector6 | Transformation::Vector12 => {
            encode_flat(record.placement(), scheme).map(Encoded::Vector)
        }
        Transformation::Tensor6Sparse | Transformation::Tensor12Sparse => {
            encode_sparse(record.placement(), scheme).map(Encoded::Sparse)
        }
        Transformation::Full6 | Transformation::Full12 => {
            let full = encode_full(record, scheme)?;
            Ok(Encoded::Vector(full.iter().copied().collect()))
        }
    }
}
