//! Minimal HTTP/1.1 server standing in for the storage API and its download host.
//!
//! `GET /api?...` answers with a JSON body whose `href` points back at
//! `GET /archive.zip`, which serves the configured archive bytes.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct DiskServerOptions {
    /// Status for the API call.
    pub api_status: u16,
    /// Body for the API call; `{href}` is replaced with the archive URL.
    pub api_body: String,
    /// Status for the archive download.
    pub archive_status: u16,
}

impl Default for DiskServerOptions {
    fn default() -> Self {
        Self {
            api_status: 200,
            api_body: r#"{"href":"{href}","method":"GET","templated":false}"#.to_string(),
            archive_status: 200,
        }
    }
}

/// Base URL to use as the API base (ends with `public_key=`), served in a background thread.
pub fn start(archive: Vec<u8>) -> String {
    start_with_options(archive, DiskServerOptions::default())
}

pub fn start_with_options(archive: Vec<u8>, opts: DiskServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let origin = format!("http://127.0.0.1:{}", port);
    let href = format!("{}/archive.zip?token=abc", origin);
    let api_body = Arc::new(opts.api_body.replace("{href}", &href));
    let archive = Arc::new(archive);
    let (api_status, archive_status) = (opts.api_status, opts.archive_status);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let archive = Arc::clone(&archive);
            let api_body = Arc::clone(&api_body);
            thread::spawn(move || {
                handle(stream, &api_body, api_status, &archive, archive_status)
            });
        }
    });
    format!("{}/api?public_key=", origin)
}

fn handle(
    mut stream: std::net::TcpStream,
    api_body: &str,
    api_status: u16,
    archive: &[u8],
    archive_status: u16,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("");

    let (status, content_type, body): (u16, &str, &[u8]) = if target.starts_with("/api") {
        (api_status, "application/json", api_body.as_bytes())
    } else if target.starts_with("/archive.zip") {
        (archive_status, "application/zip", archive)
    } else {
        (404, "text/plain", b"not found")
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        content_type,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
