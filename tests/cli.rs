//! CLI integration tests for bitlab
//!
//! Tests the binary as a user would interact with it.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn bitlab() -> Command {
    Command::cargo_bin("bitlab").unwrap()
}

/// A binary whose data directory lives in `dir`.
fn bitlab_in(dir: &TempDir) -> Command {
    let config = dir.path().join("bitlab.toml");
    if !config.exists() {
        let data = dir.path().join("data");
        fs::write(
            &config,
            format!("[settings]\ndata_dir = {:?}\n", data.to_string_lossy()),
        )
        .unwrap();
    }
    let mut cmd = bitlab();
    cmd.env("NO_COLOR", "1").arg("--config").arg(config);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

// ============================================================================
// Basic Commands
// ============================================================================

#[test]
fn test_help() {
    bitlab()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bit string workbench"));
}

#[test]
fn test_version() {
    bitlab()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bitlab"));
}

#[test]
fn test_config_list_codecs() {
    bitlab()
        .args(["config", "list", "codecs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("manchester"))
        .stdout(predicate::str::contains("hamming74"));
}

#[test]
fn test_config_show() {
    bitlab()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[analysis]"));
}

// ============================================================================
// Generate
// ============================================================================

#[test]
fn test_generate_alternating() {
    bitlab()
        .args(["generate", "alternating", "-n", "8"])
        .assert()
        .success()
        .stdout("01010101\n");
}

#[test]
fn test_generate_seeded_is_reproducible() {
    let first = stdout_of(bitlab().args(["generate", "random", "-n", "64", "--seed", "5"]));
    let second = stdout_of(bitlab().args(["generate", "random", "-n", "64", "--seed", "5"]));
    assert_eq!(first, second);
    assert_eq!(first.trim().len(), 64);
}

#[test]
fn test_generate_raw() {
    let output = bitlab()
        .args(["generate", "ones", "-n", "8", "--raw"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0xFF]);
}

#[test]
fn test_generate_unknown_suggests() {
    bitlab()
        .env("NO_COLOR", "1")
        .args(["generate", "randon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did you mean 'random'"));
}

#[test]
fn test_generate_from_preset() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(bitlab_in(&dir).args(["generate", "--preset", "random-1k"]));
    assert_eq!(out.trim().len(), 1024);
}

// ============================================================================
// Analyze / Transform
// ============================================================================

#[test]
fn test_analyze_json() {
    bitlab()
        .args(["analyze", "--json"])
        .write_stdin("0110100110010110\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"length\": 16"))
        .stdout(predicate::str::contains("\"ideality\""));
}

#[test]
fn test_analyze_single_metric() {
    bitlab()
        .args(["analyze", "--metric", "transitions"])
        .write_stdin("01010101")
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn test_analyze_human_readable() {
    bitlab()
        .arg("analyze")
        .write_stdin("0011")
        .assert()
        .success()
        .stdout(predicate::str::contains("Length:"))
        .stdout(predicate::str::contains("Ideality:"));
}

#[test]
fn test_transform_chain() {
    bitlab()
        .args(["transform", "-x", "not", "-x", "reverse"])
        .write_stdin("0001")
        .assert()
        .success()
        .stdout("0111\n");
}

#[test]
fn test_transform_bad_operation() {
    bitlab()
        .args(["transform", "-x", "xor:12"])
        .write_stdin("0001")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid character '2'"));
}

// ============================================================================
// Encode / Decode
// ============================================================================

#[test]
fn test_encode_manchester() {
    bitlab()
        .args(["encode", "manchester"])
        .write_stdin("01")
        .assert()
        .success()
        .stdout("1001\n");
}

#[test]
fn test_decode_manchester_corrupt() {
    bitlab()
        .args(["decode", "manchester"])
        .write_stdin("11")
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt stream"));
}

#[test]
fn test_hamming_corrects_flipped_bit() {
    let encoded = stdout_of(bitlab().args(["encode", "hamming74"]).write_stdin("10110010"));
    let mut flipped: Vec<char> = encoded.trim().chars().collect();
    flipped[2] = if flipped[2] == '0' { '1' } else { '0' };
    let flipped: String = flipped.into_iter().collect();

    bitlab()
        .args(["decode", "hamming74"])
        .write_stdin(flipped)
        .assert()
        .success()
        .stdout("10110010\n")
        .stderr(predicate::str::contains("Corrected"));
}

#[test]
fn test_encode_decode_lz77_round_trip() {
    let input = "0000000011111111000000001111111100000000";
    let encoded = stdout_of(bitlab().args(["encode", "lz77"]).write_stdin(input));
    bitlab()
        .args(["decode", "lz77"])
        .write_stdin(encoded)
        .assert()
        .success()
        .stdout(format!("{}\n", input));
}

#[test]
fn test_codec_spec_matches_flags() {
    let input = "1011001110001111";
    let from_spec = stdout_of(bitlab().args(["encode", "parity/4/odd"]).write_stdin(input));
    let from_flags = stdout_of(
        bitlab()
            .args(["encode", "parity", "--block", "4", "--odd"])
            .write_stdin(input),
    );
    assert_eq!(from_spec, from_flags);

    bitlab()
        .args(["encode", "rle/2"])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not take parameters"));
}

#[test]
fn test_encode_unknown_codec() {
    bitlab()
        .env("NO_COLOR", "1")
        .args(["encode", "manchestr"])
        .write_stdin("01")
        .assert()
        .failure()
        .stderr(predicate::str::contains("codec 'manchestr' not found"))
        .stderr(predicate::str::contains("did you mean 'manchester'"));
}

#[test]
fn test_detect_manchester() {
    let random = stdout_of(bitlab().args(["generate", "random", "-n", "256", "--seed", "11"]));
    let encoded = stdout_of(bitlab().args(["encode", "manchester"]).write_stdin(random.clone()));

    bitlab()
        .arg("detect")
        .write_stdin(encoded.clone())
        .assert()
        .success()
        .stdout(predicate::str::contains("manchester"));

    bitlab()
        .args(["detect", "--json"])
        .write_stdin(encoded)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"confidence\""));
}

// ============================================================================
// Bytes: compress / digest / radix
// ============================================================================

#[test]
fn test_compress_json() {
    bitlab()
        .args(["compress", "-a", "gzip", "--json"])
        .write_stdin("0".repeat(4096))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"algorithm\": \"gzip\""));
}

#[test]
fn test_digest_sha256() {
    bitlab()
        .args(["digest", "-a", "sha256"])
        .write_stdin("00000000")
        .assert()
        .success()
        .stdout("6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d\n");
}

#[test]
fn test_digest_all() {
    bitlab()
        .arg("digest")
        .write_stdin("10101010")
        .assert()
        .success()
        .stdout(predicate::str::contains("sha256"))
        .stdout(predicate::str::contains("blake3"));
}

#[test]
fn test_radix_both_ways() {
    bitlab()
        .arg("radix")
        .write_stdin("11111111")
        .assert()
        .success()
        .stdout("ff\n");

    bitlab()
        .args(["radix", "--from", "ff", "--width", "12"])
        .assert()
        .success()
        .stdout("000011111111\n");

    bitlab()
        .args(["radix", "-b", "10", "--from", "5"])
        .assert()
        .success()
        .stdout("101\n");
}

#[test]
fn test_radix_huge_width_is_an_error() {
    bitlab()
        .args(["radix", "--from", "5", "--width", "18446744073709551615"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the"));
}

// ============================================================================
// Partitions
// ============================================================================

#[test]
fn test_partition_split() {
    bitlab()
        .args(["partition", "--split", "2"])
        .write_stdin("0000000011111111")
        .assert()
        .success()
        .stdout(predicate::str::contains("part-1"))
        .stdout(predicate::str::contains("part-2"));
}

#[test]
fn test_partition_range_out_of_bounds() {
    bitlab()
        .args(["partition", "--range", "tail=4..32"])
        .write_stdin("0000000011111111")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of bounds"));
}

// ============================================================================
// Presets and strategies
// ============================================================================

#[test]
fn test_preset_list_builtin() {
    let dir = TempDir::new().unwrap();
    bitlab_in(&dir)
        .args(["preset", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("random-1k"))
        .stdout(predicate::str::contains("builtin"));
}

#[test]
fn test_preset_save_show_delete() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("mine.toml");
    fs::write(
        &file,
        r#"
name = "mine"
description = "eight ones"

[generator]
kind = "ones"
len = 8
"#,
    )
    .unwrap();

    bitlab_in(&dir)
        .args(["preset", "save"])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved preset 'mine'"));

    bitlab_in(&dir)
        .args(["preset", "show", "mine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("eight ones"));

    bitlab_in(&dir)
        .args(["generate", "-p", "mine"])
        .assert()
        .success()
        .stdout("11111111\n");

    bitlab_in(&dir)
        .args(["preset", "delete", "mine"])
        .assert()
        .success();

    bitlab_in(&dir)
        .args(["preset", "show", "mine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_preset_delete_builtin_refused() {
    let dir = TempDir::new().unwrap();
    bitlab_in(&dir)
        .args(["preset", "delete", "random-1k"])
        .assert()
        .failure();
}

#[test]
fn test_strategy_list() {
    let dir = TempDir::new().unwrap();
    bitlab_in(&dir)
        .args(["strategy", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("whiten"))
        .stdout(predicate::str::contains("decorrelate"));
}

#[test]
fn test_strategy_run_json() {
    let dir = TempDir::new().unwrap();
    bitlab_in(&dir)
        .args([
            "strategy",
            "run",
            "compress-chain",
            "--preset",
            "sparse-runs",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"frames\""))
        .stdout(predicate::str::contains("\"final_score\""));
}

#[test]
fn test_strategy_run_prints_bits_on_stdout() {
    let dir = TempDir::new().unwrap();
    let input = "1101".repeat(32);
    let output = bitlab_in(&dir)
        .args(["strategy", "run", "whiten"])
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim().chars().all(|c| c == '0' || c == '1'));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Strategy: whiten"));
    assert!(stderr.contains("Kept"));
}

#[test]
fn test_strategy_play_requires_play_for_interval() {
    bitlab()
        .args(["strategy", "run", "whiten", "--interval", "1s"])
        .assert()
        .failure();
}

// ============================================================================
// Input handling
// ============================================================================

#[test]
fn test_max_size_exceeded() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("big.txt");
    fs::write(&file, "0".repeat(64)).unwrap();

    bitlab()
        .args(["analyze", "--max-size", "16"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds limit"));

    bitlab()
        .args(["analyze", "--max-size", "16", "--force", "-q", "--metric", "ones"])
        .arg(&file)
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_binary_input_format() {
    bitlab()
        .args(["--format", "binary", "analyze", "--metric", "ones"])
        .write_stdin(vec![0xF0u8])
        .assert()
        .success()
        .stdout("4\n");
}
