//! Integration tests for the poseval binary.
//!
//! Spawns the encoder process, feeds FEN lines via stdin, and verifies the
//! JSONL written to stdout.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;

/// Runs the binary with `args`, writes `input` to stdin and returns
/// (exit success, stdout lines, stderr).
fn run_poseval(args: &[&str], input: impl AsRef<[u8]>) -> (bool, Vec<String>, String) {
    let exe = env!("CARGO_BIN_EXE_poseval");
    let mut child = Command::new(exe)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start poseval");

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(input.as_ref()).unwrap();
    drop(stdin);

    let output = child.wait_with_output().expect("failed to wait on child");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines = stdout.lines().map(|l| l.to_string()).collect();
    (output.status.success(), lines, stderr)
}

fn parse_line(line: &str) -> Value {
    serde_json::from_str(line).expect("stdout line is not JSON")
}

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const E3_FEN: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
const ENDGAME_FEN: &str = "8/1P4B1/8/1q3k2/2Q5/8/4r1Np/K7 b - - 0 1";

#[test]
fn default_encoding_is_flat_12_layer() {
    let (ok, lines, _) = run_poseval(&["--quiet"], &format!("{}\n", START_FEN));
    assert!(ok);
    assert_eq!(lines.len(), 1);

    let v = parse_line(&lines[0]);
    assert_eq!(v["encoding"], "vector12x8x8");
    assert_eq!(v["fen"], START_FEN);
    let features = v["features"].as_array().unwrap();
    assert_eq!(features.len(), 768);
    let total: f64 = features.iter().map(|x| x.as_f64().unwrap()).sum();
    assert_eq!(total, 32.0);
}

#[test]
fn sparse_encoding_lists_occupied_squares() {
    let (ok, lines, _) = run_poseval(
        &["--quiet", "--encoding", "tensor6x8x8"],
        &format!("{}\n", ENDGAME_FEN),
    );
    assert!(ok);
    let v = parse_line(&lines[0]);
    let features = &v["features"];
    for key in ["rows", "cols", "layers", "values"] {
        assert_eq!(features[key].as_array().unwrap().len(), 9, "{} length", key);
    }
}

#[test]
fn white_orientation_flips_black_to_move() {
    let input = format!("{}\n{}\n", ENDGAME_FEN, START_FEN);
    let (ok, lines, _) = run_poseval(&["--quiet", "--orientation", "white"], &input);
    assert!(ok);
    assert_eq!(lines.len(), 2);

    let first = parse_line(&lines[0]);
    assert_eq!(first["flipped"], true);
    assert_eq!(first["fen"], "k7/4R1nP/8/2q5/1Q3K2/8/1p4b1/8 w - - 0 1");

    let second = parse_line(&lines[1]);
    assert_eq!(second["flipped"], false);
    assert_eq!(second["index"], 1);
}

#[test]
fn full_tensor_has_aux_planes() {
    let (ok, lines, _) = run_poseval(
        &["--quiet", "--encoding", "full12", "--threads", "2"],
        &format!("{}\n", E3_FEN),
    );
    assert!(ok);
    let v = parse_line(&lines[0]);
    let features = v["features"].as_array().unwrap();
    assert_eq!(features.len(), 8 * 8 * 15);
    // e3 en-passant cell: row 2, col 4, plane 14.
    assert_eq!(features[15 * (8 * 2 + 4) + 14], 1.0);
}

#[test]
fn bad_lines_are_skipped_and_reported() {
    let input = format!("{}\nnot a fen\n\n{}\n", START_FEN, E3_FEN);
    let (ok, lines, stderr) = run_poseval(&["--quiet"], &input);
    assert!(ok);
    assert_eq!(lines.len(), 2);
    assert!(stderr.contains("not a fen"), "stderr: {}", stderr);

    let second = parse_line(&lines[1]);
    assert_eq!(second["index"], 2);
}

#[test]
fn invalid_utf8_line_does_not_end_input() {
    let mut input = Vec::new();
    input.extend_from_slice(format!("{}\n", START_FEN).as_bytes());
    input.extend_from_slice(b"\xff\xfe bad\n");
    input.extend_from_slice(format!("{}\n{}\n", E3_FEN, START_FEN).as_bytes());

    let (ok, lines, stderr) = run_poseval(&["--quiet"], &input);
    assert!(ok);
    assert_eq!(lines.len(), 3);
    assert!(stderr.contains("skipping line 2"), "stderr: {}", stderr);

    assert_eq!(parse_line(&lines[0])["fen"], START_FEN);
    assert_eq!(parse_line(&lines[1])["fen"], E3_FEN);
    assert_eq!(parse_line(&lines[2])["fen"], START_FEN);
}

#[test]
fn surrounding_spaces_are_not_trimmed() {
    let input = format!("{} \n {}\n{}\r\n", START_FEN, START_FEN, E3_FEN);
    let (ok, lines, stderr) = run_poseval(&["--quiet"], &input);
    assert!(ok);
    assert_eq!(lines.len(), 1);
    assert_eq!(parse_line(&lines[0])["fen"], E3_FEN);
    assert_eq!(stderr.matches("expected 6 fields").count(), 2, "stderr: {}", stderr);
}

#[test]
fn seeded_augmentation_is_reproducible() {
    let input: String = (0..20).map(|_| format!("{}\n", E3_FEN)).collect();
    let args = ["--quiet", "--orientation", "augment", "--seed", "7"];
    let (ok_a, a, _) = run_poseval(&args, &input);
    let (ok_b, b, _) = run_poseval(&args, &input);
    assert!(ok_a && ok_b);
    assert_eq!(a, b);
}

#[test]
fn summary_goes_to_stderr() {
    let (ok, lines, stderr) = run_poseval(&[], &format!("{}\n", START_FEN));
    assert!(ok);
    assert_eq!(lines.len(), 1);
    assert!(stderr.contains("info string"), "stderr: {}", stderr);
}

#[test]
fn unknown_flag_fails_with_usage() {
    let (ok, lines, stderr) = run_poseval(&["--bogus"], "");
    assert!(!ok);
    assert!(lines.is_empty());
    assert!(stderr.contains("Usage: poseval"));
}

#[test]
fn unknown_encoding_fails() {
    let (ok, _, stderr) = run_poseval(&["--encoding", "vector7x8x8"], "");
    assert!(!ok);
    assert!(stderr.contains("invalid --encoding value"));
}
