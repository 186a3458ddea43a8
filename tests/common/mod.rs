//! Shared fixtures for the integration tests
//!
//! Project trees are written into temporary directories and fake HTTP
//! services run on loopback listeners.

#![allow(dead_code)]

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

pub const VALID_EXTRACTION_ENV: &str = "\
# scraper credentials
TWITTER_BEARER_TOKEN=AAAAexampletoken
SUPABASE_URL=https://abc.supabase.co
SUPABASE_ANON_KEY=anon-key
";

pub const VALID_ORCHESTRATION_ENV: &str = "\
SUPABASE_URL=https://abc.supabase.co
SUPABASE_SERVICE_ROLE_KEY=service-role-key
";

pub fn write_module_file(root: &Path, module: &str, file: &str, content: &str) {
    let dir = root.join(module);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

/// A project with both env files valid and an extraction package descriptor.
pub fn valid_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_module_file(temp_dir.path(), "extraction", ".env", VALID_EXTRACTION_ENV);
    write_module_file(
        temp_dir.path(),
        "orchestration",
        ".env",
        VALID_ORCHESTRATION_ENV,
    );
    write_module_file(
        temp_dir.path(),
        "extraction",
        "package.json",
        r#"{"name": "tweet-extraction", "version": "0.3.0"}"#,
    );
    temp_dir
}

/// Serve `status` and `body` to every connection; each request head is sent back on the channel.
pub fn start_http_server(status: &str, body: &str) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");
    let (tx, rx) = mpsc::channel();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if line == "\r\n" {
                            break;
                        }
                        head.push_str(&line);
                    }
                }
            }
            let _ = tx.send(head);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    (format!("http://{addr}"), rx)
}

/// Accept connections but never answer.
pub fn start_hanging_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");

    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
            thread::sleep(Duration::from_millis(10));
        }
    });

    format!("http://{addr}")
}

/// An address nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");
    drop(listener);
    format!("http://{addr}")
}
