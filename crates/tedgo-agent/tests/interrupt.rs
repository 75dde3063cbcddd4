//! Ctrl-C must end the real binary even while stdin stays open.

#![cfg(unix)]

use std::io::Read;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

fn unused_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Forward the child's stdout in chunks so the test can wait on it.
fn watch_stdout(child: &mut Child) -> mpsc::Receiver<String> {
    let mut stdout = child.stdout.take().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = [0u8; 1024];
        while let Ok(n) = stdout.read(&mut buf) {
            if n == 0 || tx.send(String::from_utf8_lossy(&buf[..n]).into_owned()).is_err() {
                break;
            }
        }
    });
    rx
}

fn wait_for(rx: &mpsc::Receiver<String>, needle: &str, seen: &mut String) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !seen.contains(needle) {
        let left = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok(chunk) => seen.push_str(&chunk),
            Err(_) => panic!("never saw {needle:?}; output so far: {seen:?}"),
        }
    }
}

fn wait_for_exit(child: &mut Child, limit: Duration) -> Option<std::process::ExitStatus> {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        thread::sleep(Duration::from_millis(50));
    }
    None
}

#[test]
fn test_sigint_ends_process_with_stdin_open() {
    let dir = tempfile::tempdir().unwrap();
    let history = dir.path().join("history.log");

    let mut child = Command::new(env!("CARGO_BIN_EXE_tedgo"))
        .env("TEDGO_NODE_URL", format!("http://127.0.0.1:{}", unused_port()))
        .env("TEDGO_HISTORY_FILE", &history)
        .env("TEDGO_PENDING_FILE", dir.path().join("pending.json"))
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    // Held open for the whole test; the process must not wait on it.
    let _stdin = child.stdin.take().unwrap();

    let output = watch_stdout(&mut child);
    let mut seen = String::new();
    wait_for(&output, "Você: ", &mut seen);
    // The signal listener is installed right after the prompt is shown.
    thread::sleep(Duration::from_millis(300));

    let rc = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGINT) };
    assert_eq!(rc, 0);

    let status = wait_for_exit(&mut child, Duration::from_secs(5));
    if status.is_none() {
        let _ = child.kill();
    }
    let status = status.expect("tedgo still running 5s after SIGINT");
    assert!(status.success(), "unexpected exit status {status:?}");

    wait_for(&output, "Encerrado. Até a próxima!", &mut seen);
    let logged = std::fs::read_to_string(&history).unwrap();
    assert!(logged.contains("Sessão encerrada (interrupção)."));
    assert!(logged.trim_end().ends_with("TedGo finalizado"));
}
