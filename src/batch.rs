//! Batch encoding of FEN positions for model training and inference.
//!
//! Each input line is parsed, optionally re-oriented so the model sees
//! white to move, and encoded with the configured transformation. Positions
//! are independent, so batches are spread over a rayon thread pool and
//! written out as JSONL.

use std::io::{self, Write};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::nn::encoding::{transform, EncodeError, Encoded, Transformation};
use crate::protocol::fen::{parse_fen, FenError, FenRecord};

/// How a position is oriented before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Encode the position as written.
    AsGiven,
    /// Flip positions with black to move so white is always to move.
    WhiteToMove,
    /// Flip each position with probability 1/2 (training augmentation).
    Augment,
}

impl Orientation {
    /// Returns the command-line name.
    pub const fn name(self) -> &'static str {
        match self {
            Orientation::AsGiven => "as-given",
            Orientation::WhiteToMove => "white",
            Orientation::Augment => "augment",
        }
    }

    /// Parses an orientation from its command-line name.
    pub fn from_name(name: &str) -> Option<Orientation> {
        match name {
            "as-given" => Some(Orientation::AsGiven),
            "white" => Some(Orientation::WhiteToMove),
            "augment" => Some(Orientation::Augment),
            _ => None,
        }
    }
}

/// Configuration for batch encoding.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Encoding applied to every position.
    pub transformation: Transformation,
    /// Orientation policy applied before encoding.
    pub orientation: Orientation,
    /// Number of worker threads (1 = encode on the calling thread).
    pub threads: usize,
    /// Random seed for augmentation (0 = use entropy).
    pub seed: u64,
    /// Suppress the batch summary on stderr.
    pub quiet: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            transformation: Transformation::Vector12,
            orientation: Orientation::AsGiven,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// Errors for a single position in a batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// One encoded position, as written to JSONL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedPosition {
    /// Position of the FEN in the input batch.
    pub index: usize,
    /// FEN after orientation.
    pub fen: String,
    /// Whether the position was flipped before encoding.
    pub flipped: bool,
    /// Transformation name.
    pub encoding: &'static str,
    pub features: Encoded,
}

/// Applies the orientation policy to a record. Returns whether it flipped.
fn apply_orientation(record: &mut FenRecord, config: &BatchConfig, index: usize) -> bool {
    match config.orientation {
        Orientation::AsGiven => false,
        Orientation::WhiteToMove => record.orient_white(),
        Orientation::Augment => {
            let mut rng = if config.seed != 0 {
                SmallRng::seed_from_u64(config.seed.wrapping_add(index as u64))
            } else {
                SmallRng::from_entropy()
            };
            let flip = rng.gen_bool(0.5);
            if flip {
                record.flip();
            }
            flip
        }
    }
}

/// Parses, orients and encodes a single FEN string.
pub fn encode_position(
    index: usize,
    fen: &str,
    config: &BatchConfig,
) -> Result<EncodedPosition, PositionError> {
    let mut record = parse_fen(fen)?;
    let flipped = apply_orientation(&mut record, config, index);
    let features = transform(&record, config.transformation)?;

    Ok(EncodedPosition {
        index,
        fen: record.to_string(),
        flipped,
        encoding: config.transformation.name(),
        features,
    })
}

/// Encodes a batch of FEN strings, preserving input order.
///
/// When `config.threads > 1`, positions are encoded concurrently on a rayon
/// pool of that size. A failure on one position does not affect the others.
pub fn encode_batch<S>(
    fens: &[S],
    config: &BatchConfig,
) -> Result<Vec<Result<EncodedPosition, PositionError>>, rayon::ThreadPoolBuildError>
where
    S: AsRef<str> + Sync,
{
    let start = Instant::now();

    let results = if config.threads > 1 {
        encode_batch_parallel(fens, config)?
    } else {
        fens.iter()
            .enumerate()
            .map(|(i, fen)| encode_position(i, fen.as_ref(), config))
            .collect()
    };

    if !config.quiet {
        let failed = results.iter().filter(|r| r.is_err()).count();
        eprintln!(
            "info string encoded {} positions as {} ({} failed) in {:.3}s",
            results.len() - failed,
            config.transformation,
            failed,
            start.elapsed().as_secs_f64()
        );
    }

    Ok(results)
}

fn encode_batch_parallel<S>(
    fens: &[S],
    config: &BatchConfig,
) -> Result<Vec<Result<EncodedPosition, PositionError>>, rayon::ThreadPoolBuildError>
where
    S: AsRef<str> + Sync,
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    Ok(pool.install(|| {
        fens.par_iter()
            .enumerate()
            .map(|(i, fen)| encode_position(i, fen.as_ref(), config))
            .collect()
    }))
}

/// Writes encoded positions as JSONL (one JSON object per line).
pub fn write_jsonl<W: Write>(positions: &[EncodedPosition], out: &mut W) -> io::Result<()> {
    for position in positions {
        write_position_json(position, out)?;
    }
    out.flush()
}

/// Writes a single encoded position as one JSON line.
pub fn write_position_json<W: Write>(position: &EncodedPosition, out: &mut W) -> io::Result<()> {
    serde_json::to_writer(&mut *out, position)?;
    writeln!(out)
}
