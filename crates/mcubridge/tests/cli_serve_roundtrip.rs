#![cfg(all(unix, feature = "cli"))]

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/mcubridge-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn wait_for_connect(path: &Path, timeout: Duration) -> std::io::Result<UnixStream> {
    let start = Instant::now();
    loop {
        match UnixStream::connect(path) {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                if start.elapsed() >= timeout {
                    return Err(std::io::Error::other(format!("connect timeout: {err}")));
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

#[test]
fn serve_answers_gpio_write_frames_over_a_socket() {
    let dir = unique_temp_dir("serve");
    let sock_path = dir.join("bridge.sock");

    let mut child = Command::new(env!("CARGO_BIN_EXE_mcubridge"))
        .arg("--log-level")
        .arg("error")
        .arg("serve")
        .arg("--socket")
        .arg(&sock_path)
        .arg("--once")
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("serve command should start");

    let mut stream = wait_for_connect(&sock_path, Duration::from_secs(3))
        .expect("client should connect to the bridge");

    // Drive P1[1] high, then read the 4 response bytes.
    stream
        .write_all(&[0x20, 0x01, 0x13, 0x00])
        .expect("frame should send");
    let mut response = [0u8; 4];
    stream
        .read_exact(&mut response)
        .expect("response should arrive");
    assert_eq!(response, [0x01, 0x00, 0x00, 0x00]);

    // An unknown address echoes its payload and the session survives.
    stream
        .write_all(&[0x42, 0x07, 0xEF, 0xBE])
        .expect("frame should send");
    stream
        .read_exact(&mut response)
        .expect("response should arrive");
    assert_eq!(response, [0xEF, 0xBE, 0x00, 0x00]);

    drop(stream);

    let status = child.wait().expect("serve should exit after --once");
    assert!(status.success(), "serve exited with {status}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_subcommand_prints_the_response_value() {
    let dir = unique_temp_dir("send");
    let sock_path = dir.join("bridge.sock");

    let mut server = Command::new(env!("CARGO_BIN_EXE_mcubridge"))
        .arg("--log-level")
        .arg("error")
        .arg("serve")
        .arg("--socket")
        .arg(&sock_path)
        .arg("--once")
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("serve command should start");

    // The socket file appears once the listener is bound.
    let start = Instant::now();
    while !sock_path.exists() {
        assert!(
            start.elapsed() < Duration::from_secs(3),
            "bridge socket never appeared"
        );
        thread::sleep(Duration::from_millis(25));
    }

    let output = Command::new(env!("CARGO_BIN_EXE_mcubridge"))
        .arg("--log-level")
        .arg("error")
        .arg("--format")
        .arg("json")
        .arg("send")
        .arg(&sock_path)
        .arg("--address")
        .arg("0x20")
        .arg("--command")
        .arg("0x01")
        .arg("--data")
        .arg("0x0013")
        .output()
        .expect("send command should run");

    assert!(output.status.success(), "send failed: {output:?}");
    let stdout = String::from_utf8(output.stdout).expect("send output should be UTF-8");
    assert!(
        stdout.contains("\"value\":1"),
        "unexpected send output: {stdout}"
    );

    let status = server.wait().expect("serve should exit after --once");
    assert!(status.success(), "serve exited with {status}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_prints_the_distilled_wire_vector() {
    let output = Command::new(env!("CARGO_BIN_EXE_mcubridge"))
        .arg("--format")
        .arg("json")
        .arg("decode")
        .arg("20:01:12:00")
        .output()
        .expect("decode command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("decode output should be UTF-8");
    assert!(stdout.contains("\"address\":32"), "output: {stdout}");
    assert!(stdout.contains("\"data\":18"), "output: {stdout}");
    assert!(stdout.contains("\"port\":1"), "output: {stdout}");
    assert!(stdout.contains("\"pin\":1"), "output: {stdout}");
}

#[test]
fn board_rejects_overlapping_configs() {
    let dir = unique_temp_dir("board");
    let config = dir.join("board.json");
    std::fs::write(
        &config,
        r#"{"ports": [
            {"name": "A", "port": 0, "pin": 0, "width": 4},
            {"name": "B", "port": 0, "pin": 3}
        ]}"#,
    )
    .expect("config should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_mcubridge"))
        .arg("board")
        .arg("--file")
        .arg(&config)
        .output()
        .expect("board command should run");

    assert_eq!(output.status.code(), Some(60), "output: {output:?}");

    let _ = std::fs::remove_dir_all(&dir);
}
