//! poseval -- FEN to model-input encoder.
//!
//! Reads one FEN per line from stdin and writes one JSON object per line to
//! stdout (or `--output FILE`) holding the encoded features.
//!
//! Usage:
//!   poseval [OPTIONS] < positions.fen
//!
//! Options:
//!   --encoding NAME     vector6x8x8, vector12x8x8, tensor6x8x8, tensor12x8x8,
//!                       full6 or full12 (default: vector12x8x8)
//!   --orientation MODE  as-given, white or augment (default: as-given)
//!   --threads N         Number of worker threads (default: 4)
//!   --seed N            Augmentation seed, 0 for entropy (default: 0)
//!   --output FILE       Output file path (default: stdout)
//!   --quiet             Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufWriter};
use std::process;
use std::str::FromStr;

use poseval::batch::{self, BatchConfig, Orientation};
use poseval::nn::ALL_TRANSFORMATIONS;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = BatchConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--encoding" => {
                i += 1;
                config.transformation = parse_value(&args, i, "--encoding");
            }
            "--orientation" => {
                i += 1;
                let name = value_at(&args, i, "--orientation");
                config.orientation = match Orientation::from_name(name) {
                    Some(o) => o,
                    None => usage_error(&format!("invalid --orientation value: {}", name)),
                };
            }
            "--threads" => {
                i += 1;
                config.threads = parse_value(&args, i, "--threads");
            }
            "--seed" => {
                i += 1;
                config.seed = parse_value(&args, i, "--seed");
            }
            "--output" => {
                i += 1;
                output_path = Some(value_at(&args, i, "--output").to_string());
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => usage_error(&format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    let stdin = io::stdin();
    let fens = match read_fens(stdin.lock()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("failed to read input: {}", e);
            process::exit(1);
        }
    };

    if !config.quiet {
        eprintln!(
            "info string encoding {} positions: {}, orientation {}, {} threads",
            fens.len(),
            config.transformation,
            config.orientation.name(),
            config.threads
        );
    }

    let results = match batch::encode_batch(&fens, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("failed to build thread pool: {}", e);
            process::exit(1);
        }
    };

    let mut positions = Vec::with_capacity(results.len());
    for (fen, result) in fens.iter().zip(results) {
        match result {
            Ok(p) => positions.push(p),
            Err(e) => eprintln!("skipping '{}': {}", fen, e),
        }
    }

    let written = match output_path {
        Some(ref path) => File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            batch::write_jsonl(&positions, &mut writer)
        }),
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            batch::write_jsonl(&positions, &mut writer)
        }
    };

    if let Err(e) = written {
        eprintln!("failed to write output: {}", e);
        process::exit(1);
    }

    if !config.quiet {
        if let Some(path) = output_path {
            eprintln!("info string wrote {} positions to {}", positions.len(), path);
        }
    }
}

/// Reads one FEN per input line.
///
/// Only the line terminator is stripped, so stray spaces still fail the
/// field-count check. Blank lines are ignored and lines that are not valid
/// UTF-8 are reported and skipped. Only an I/O error stops reading.
fn read_fens<R: BufRead>(mut input: R) -> io::Result<Vec<String>> {
    let mut fens = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("skipping line {}: {}", line_number, e);
                continue;
            }
        };
        let fen = line.trim_end_matches(['\r', '\n']);
        if !fen.is_empty() {
            fens.push(fen.to_string());
        }
    }

    Ok(fens)
}

/// Returns the value following a flag, or exits with usage.
fn value_at<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v.as_str(),
        None => usage_error(&format!("missing value for {}", flag)),
    }
}

/// Parses the value following a flag, or exits with usage.
fn parse_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let raw = value_at(args, i, flag);
    match raw.parse() {
        Ok(v) => v,
        Err(_) => usage_error(&format!("invalid {} value: {}", flag, raw)),
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(1);
}

fn print_usage() {
    eprintln!("Usage: poseval [OPTIONS] < positions.fen");
    eprintln!();
    eprintln!("Options:");
    eprintln!(
        "  --encoding NAME     One of: {} (default: vector12x8x8)",
        encoding_names()
    );
    eprintln!("  --orientation MODE  as-given, white or augment (default: as-given)");
    eprintln!("  --threads N         Number of worker threads (default: 4)");
    eprintln!("  --seed N            Augmentation seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE       Output file path (default: stdout)");
    eprintln!("  --quiet             Suppress summary output");
    eprintln!("  --help              Show this help");
}

fn encoding_names() -> String {
    ALL_TRANSFORMATIONS
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}
