//! Piece symbols and tensor layer schemes.
//!
//! The twelve FEN piece letters are indexed in the fixed order
//! `p P n N b B r R q Q k K` (black before white for each piece type).
//! Layer and value assignments for the two tensor schemes are stored in
//! compile-time lookup tables indexed by that ordinal.

/// The number of distinct piece symbols in FEN.
pub const PIECE_COUNT: usize = 12;

/// All FEN piece symbols, in ordinal order.
pub const PIECE_SYMBOLS: [char; PIECE_COUNT] =
    ['p', 'P', 'n', 'N', 'b', 'B', 'r', 'R', 'q', 'Q', 'k', 'K'];

/// Layer index per piece ordinal for the 6-layer scheme (one layer per type).
const LAYERS_6: [usize; PIECE_COUNT] = [0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5];

/// Cell value per piece ordinal for the 6-layer scheme: black +1, white -1.
const VALUES_6: [f32; PIECE_COUNT] = [
    1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0,
];

/// Layer index per piece ordinal for the 12-layer scheme.
const LAYERS_12: [usize; PIECE_COUNT] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Cell value per piece ordinal for the 12-layer scheme (presence only).
const VALUES_12: [f32; PIECE_COUNT] = [1.0; PIECE_COUNT];

/// The side a piece belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the FEN side-to-move letter.
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Parses a color from its FEN side-to-move field.
    pub fn from_fen(s: &str) -> Option<Color> {
        match s {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }

    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// The type of a chess piece, in layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

const ALL_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// A colored piece, as written in a FEN placement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    /// Parses a piece from its FEN letter. Returns `None` for anything that
    /// is not one of the twelve piece symbols.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let ordinal = PIECE_SYMBOLS.iter().position(|&s| s == c)?;
        Some(Piece::from_ordinal(ordinal))
    }

    fn from_ordinal(ordinal: usize) -> Piece {
        let color = if ordinal % 2 == 0 {
            Color::Black
        } else {
            Color::White
        };
        Piece {
            kind: ALL_KINDS[ordinal / 2],
            color,
        }
    }

    /// Index into `PIECE_SYMBOLS` and the scheme tables.
    pub const fn ordinal(self) -> usize {
        let offset = match self.color {
            Color::Black => 0,
            Color::White => 1,
        };
        self.kind as usize * 2 + offset
    }

    /// Returns the FEN letter (lowercase black, uppercase white).
    pub const fn fen_char(self) -> char {
        PIECE_SYMBOLS[self.ordinal()]
    }

    /// Returns the same piece type with the opposite color.
    pub const fn swap_color(self) -> Piece {
        Piece {
            kind: self.kind,
            color: self.color.opposite(),
        }
    }
}

/// Swaps the color of a FEN placement character. Digits, `/` and any other
/// non-piece character pass through unchanged.
pub fn swap_symbol_color(c: char) -> char {
    match Piece::from_fen_char(c) {
        Some(piece) => piece.swap_color().fen_char(),
        None => c,
    }
}

/// How pieces are laid out across tensor layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerScheme {
    /// One layer per piece type shared by both colors; black +1, white -1.
    Six,
    /// One layer per (type, color) pair; presence indicator 1.
    Twelve,
}

impl LayerScheme {
    /// Number of piece layers this scheme produces.
    pub const fn num_layers(self) -> usize {
        match self {
            LayerScheme::Six => 6,
            LayerScheme::Twelve => 12,
        }
    }

    /// Layer index for a piece.
    pub const fn layer(self, piece: Piece) -> usize {
        match self {
            LayerScheme::Six => LAYERS_6[piece.ordinal()],
            LayerScheme::Twelve => LAYERS_12[piece.ordinal()],
        }
    }

    /// Cell value for a piece.
    pub const fn value(self, piece: Piece) -> f32 {
        match self {
            LayerScheme::Six => VALUES_6[piece.ordinal()],
            LayerScheme::Twelve => VALUES_12[piece.ordinal()],
        }
    }

    /// Returns the scheme for a layer count, if one exists.
    pub fn from_layers(layers: usize) -> Option<LayerScheme> {
        match layers {
            6 => Some(LayerScheme::Six),
            12 => Some(LayerScheme::Twelve),
            _ => None,
        }
    }
}
