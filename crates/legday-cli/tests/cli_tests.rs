//! Integration tests for the legday CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn analyze_cmd() -> Command {
    Command::cargo_bin("analyze").unwrap()
}

fn write_words(path: &Path, words: &[i32]) {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    fs::write(path, bytes).unwrap();
}

#[test]
fn test_analyze_help() {
    analyze_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bitplane context-correlation analyzer"));
}

#[test]
fn test_analyze_missing_file() {
    let dir = tempdir().unwrap();
    analyze_cmd()
        .arg(dir.path().join("absent.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_analyze_default_sweep() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    let words: Vec<i32> = (0..2048).map(|i| (i as f32 * 0.001).to_bits() as i32).collect();
    write_words(&path, &words);

    analyze_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2048 words"))
        .stdout(predicate::str::contains("taking bit 4"))
        .stdout(predicate::str::contains("taking bit 27"))
        .stdout(predicate::str::contains("taking bit 28").not())
        .stdout(predicate::str::contains("best: bit"));
}

#[test]
fn test_analyze_reports_rejected_skips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    write_words(&path, &[1, 2, 3, 4]);

    analyze_cmd()
        .arg(&path)
        .args(["--skip-start", "26", "--skip-end", "31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taking bit 31"))
        .stdout(predicate::str::contains("skip 30 rejected: invalid context window"));
}

#[test]
fn test_analyze_strict_rejects_partial_word() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("odd.bin");
    fs::write(&path, [1u8, 0, 0, 0, 9]).unwrap();

    analyze_cmd()
        .arg(&path)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("truncated word"));

    analyze_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 words"));
}

#[test]
fn test_analyze_exports() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    let csv_path = dir.path().join("tables.csv");
    let json_path = dir.path().join("tables.json");
    write_words(&path, &(0..256).collect::<Vec<i32>>());

    analyze_cmd()
        .arg(&path)
        .args(["--bins", "2", "--skip-end", "3", "--xor"])
        .arg("--csv")
        .arg(&csv_path)
        .arg("--json")
        .arg(&json_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("xor transformed"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    // header + 3 skips x 4 contexts
    assert_eq!(csv.lines().count(), 13);
    assert!(csv.starts_with("skip,bins,target_bit,context,ones,observations,probability"));

    let json = fs::read_to_string(&json_path).unwrap();
    assert!(json.contains("\"bins\": 2"));
}

#[test]
fn test_analyze_summaries_and_correlation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    write_words(&path, &(0..64).map(|i| i * 3).collect::<Vec<i32>>());

    analyze_cmd()
        .arg(&path)
        .args(["--skip-end", "1", "--summaries", "--correlation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("previous-word flip rates"))
        .stdout(predicate::str::contains("bitplane popcount"))
        .stdout(predicate::str::contains("window histogram (offset 14, width 8)"))
        .stdout(predicate::str::contains("pairwise flip matrix (25 bits, 64 words)"));
}

#[test]
fn test_analyze_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    let config = dir.path().join("legday.toml");
    write_words(&path, &[5, 6, 7, 8]);
    fs::write(&config, "bins = 3\nskip_start = 2\nskip_end = 4\n").unwrap();

    analyze_cmd()
        .arg(&path)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("taking bit 5"))
        .stdout(predicate::str::contains("taking bit 6"))
        .stdout(predicate::str::contains("taking bit 4").not());
}

#[test]
fn test_analyze_train_len_too_long() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    write_words(&path, &[1, 2]);

    analyze_cmd()
        .arg(&path)
        .args(["--skip-end", "1", "--train-len", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("train length 3 exceeds stream length 2"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_analyze_json_export_to_full_device_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    write_words(&path, &[1, 2, 3, 4]);

    analyze_cmd()
        .arg(&path)
        .args(["--skip-end", "1", "--json", "/dev/full"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_analyze_rejects_oversized_bins() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    write_words(&path, &[1, 2, 3, 4]);

    analyze_cmd()
        .arg(&path)
        .args(["--bins", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bins 30 exceeds the maximum of 24"));
}

#[test]
fn test_compare_requires_files() {
    Command::cargo_bin("compare")
        .unwrap()
        .arg("./legday")
        .assert()
        .failure();
}
