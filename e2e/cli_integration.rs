// e2e/cli_integration.rs — The `zflow` binary as a black box.
//
// Runs the built executable with std::process::Command against files in a
// temporary directory.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use filetime::FileTime;
use flate2::read::GzDecoder;
use tempfile::TempDir;

/// Locate the `zflow` binary produced by Cargo.
fn zflow_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_zflow") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("zflow");
    p
}

fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "Hello, zflow!\n".repeat(300)).unwrap();
    (dir, input)
}

fn zflow(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(zflow_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("ZFLOW_CLEVEL")
        .output()
        .expect("failed to run zflow")
}

// ── 1. File round trip ───────────────────────────────────────────────────────

#[test]
fn compress_then_decompress_files() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let out = zflow(dir.path(), &["input.txt"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let packed = dir.path().join("input.txt.zz");
    assert!(packed.exists());
    assert!(input.exists(), "sources are kept by default");
    assert!(fs::metadata(&packed).unwrap().len() < original.len() as u64);

    fs::remove_file(&input).unwrap();
    let out = zflow(dir.path(), &["-d", "input.txt.zz"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn modification_time_is_copied() {
    let (dir, input) = make_temp_input();
    let stamp = FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(&input, stamp).unwrap();

    let out = zflow(dir.path(), &["input.txt"]);
    assert!(out.status.success());
    let meta = fs::metadata(dir.path().join("input.txt.zz")).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), stamp);
}

#[test]
fn rm_removes_the_source() {
    let (dir, input) = make_temp_input();
    let out = zflow(dir.path(), &["--rm", "-9", "input.txt"]);
    assert!(out.status.success());
    assert!(!input.exists());
    assert!(dir.path().join("input.txt.zz").exists());
}

#[test]
fn existing_output_needs_force() {
    let (dir, _input) = make_temp_input();
    fs::write(dir.path().join("input.txt.zz"), b"occupied").unwrap();

    let out = zflow(dir.path(), &["input.txt"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));

    let out = zflow(dir.path(), &["-f", "input.txt"]);
    assert!(out.status.success());
}

#[test]
fn decompress_rejects_unknown_suffix() {
    let (dir, _input) = make_temp_input();
    let out = zflow(dir.path(), &["-d", "input.txt"]);
    assert!(!out.status.success());
}

#[test]
fn corrupt_input_fails_and_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.zz"), b"definitely not zlib data").unwrap();
    let out = zflow(dir.path(), &["-d", "bad.zz"]);
    assert!(!out.status.success());
    assert!(!dir.path().join("bad").exists());
}

// ── 2. Streams ───────────────────────────────────────────────────────────────

fn pipe_through(dir: &Path, args: &[&str], input: &[u8]) -> Vec<u8> {
    let mut child = Command::new(zflow_bin())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let mut stdin = child.stdin.take().unwrap();
    let payload = input.to_vec();
    let feeder = std::thread::spawn(move || {
        stdin.write_all(&payload).unwrap();
    });
    let mut out = Vec::new();
    child.stdout.take().unwrap().read_to_end(&mut out).unwrap();
    feeder.join().unwrap();
    assert!(child.wait().unwrap().success());
    out
}

#[test]
fn stdin_to_stdout_round_trip() {
    let dir = TempDir::new().unwrap();
    let data = b"streamed through standard input ".repeat(500);
    let packed = pipe_through(dir.path(), &["-f", "-"], &data);
    assert_eq!(pipe_through(dir.path(), &["-d"], &packed), data);
}

#[test]
fn gzip_output_is_readable_by_other_decoders() {
    let dir = TempDir::new().unwrap();
    let data = b"gzip framed ".repeat(400);
    let packed = pipe_through(dir.path(), &["-f", "--format", "gzip"], &data);
    let mut out = Vec::new();
    GzDecoder::new(&packed[..]).read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn stdout_flag_concatenates_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a"), b"first ").unwrap();
    fs::write(dir.path().join("b"), b"second").unwrap();
    let out = zflow(dir.path(), &["-f", "-c", "a"]);
    assert!(out.status.success());
    let back = pipe_through(dir.path(), &["-d"], &out.stdout);
    assert_eq!(back, b"first ");
    assert!(!dir.path().join("a.zz").exists());
}

#[test]
fn dictionary_round_trip() {
    let (dir, input) = make_temp_input();
    fs::write(dir.path().join("words.dict"), "Hello, zflow!\n").unwrap();
    let original = fs::read(&input).unwrap();

    let out = zflow(dir.path(), &["-D", "words.dict", "--rm", "input.txt"]);
    assert!(out.status.success());
    let out = zflow(dir.path(), &["-d", "input.txt.zz"]);
    assert!(!out.status.success(), "missing dictionary must fail");
    let out = zflow(dir.path(), &["-d", "-D", "words.dict", "input.txt.zz"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn help_and_version() {
    let dir = TempDir::new().unwrap();
    let out = zflow(dir.path(), &["--help"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("--format"));
    let out = zflow(dir.path(), &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}
