//! Shared fixtures for ratewatch integration tests

#![allow(dead_code)]

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use tempfile::TempDir;

pub const MARKER: &str =
    "td-copy-black td-margin-top-small td-margin-bottom-small td-copy-align-centre";

/// HTML page whose marker cell carries `<h2>{rate}%</h2>`
pub fn rate_page(rate: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Prime rate</title></head>\n<body>\n\
         <h1>Current prime rate</h1>\n\
         <td class=\"{}\"><h2>{}%</h2></td>\n\
         <p>Effective 01.06.2024</p>\n</body>\n</html>\n",
        MARKER, rate
    )
}

/// HTML page without a marker cell
pub fn page_without_marker() -> String {
    "<html>\n<body>\n<td class=\"rate\"><h2>4.75%</h2></td>\n</body>\n</html>\n".to_string()
}

/// Minimal HTTP server answering every request with a fixed response
pub struct PageServer {
    pub url: String,
}

impl PageServer {
    pub fn serve(body: String) -> Self {
        Self::serve_with_status(200, "OK", body)
    }

    pub fn serve_with_status(code: u16, reason: &'static str, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let url = format!("http://{}/rates", listener.local_addr().unwrap());

        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => respond(stream, code, reason, &body),
                    Err(_) => break,
                }
            }
        });

        PageServer { url }
    }
}

fn respond(mut stream: TcpStream, code: u16, reason: &str, body: &str) {
    // Drain the request head before answering
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => continue,
            Err(_) => return,
        }
    }

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        code,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Minimal SMTP server recording every command line it receives.
///
/// It never offers STARTTLS, accepts any PLAIN credentials and queues every
/// message.
pub struct SmtpServer {
    pub port: u16,
    lines: Arc<Mutex<Vec<String>>>,
}

impl SmtpServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind smtp server");
        let port = listener.local_addr().unwrap().port();
        let lines = Arc::new(Mutex::new(Vec::new()));

        let recorded = lines.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => smtp_session(stream, &recorded),
                    Err(_) => break,
                }
            }
        });

        SmtpServer { port, lines }
    }

    /// Every line received so far, DATA payload included
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Lines that start with `prefix` (case-insensitive)
    pub fn commands(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_ascii_uppercase();
        self.lines()
            .into_iter()
            .filter(|l| l.to_ascii_uppercase().starts_with(&prefix))
            .collect()
    }

    /// Text sent between DATA and the terminating "."
    pub fn data(&self) -> String {
        let lines = self.lines();
        let mut payload = Vec::new();
        let mut in_data = false;
        for line in lines {
            if in_data {
                if line == "." {
                    in_data = false;
                } else {
                    payload.push(line);
                }
            } else if line.eq_ignore_ascii_case("DATA") {
                in_data = true;
            }
        }
        payload.join("\n")
    }
}

fn smtp_session(stream: TcpStream, recorded: &Arc<Mutex<Vec<String>>>) {
    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(_) => return,
    };
    let mut reader = BufReader::new(stream);
    let mut reply = |text: &str| writer.write_all(text.as_bytes()).is_ok();

    if !reply("220 fake.smtp ESMTP ready\r\n") {
        return;
    }

    let mut in_data = false;
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let command = line.trim_end_matches(['\r', '\n']).to_string();
        recorded.lock().unwrap().push(command.clone());

        if in_data {
            if command == "." {
                in_data = false;
                if !reply("250 2.0.0 queued\r\n") {
                    return;
                }
            }
            continue;
        }

        let verb = command
            .split(|c: char| c == ' ' || c == ':')
            .next()
            .unwrap_or("")
            .to_ascii_uppercase();
        let answer = match verb.as_str() {
            "EHLO" | "HELO" => "250-fake.smtp\r\n250 AUTH PLAIN\r\n",
            "AUTH" => "235 2.7.0 authenticated\r\n",
            "MAIL" | "RCPT" | "RSET" | "NOOP" => "250 2.1.0 ok\r\n",
            "DATA" => {
                in_data = true;
                "354 end data with <CR><LF>.<CR><LF>\r\n"
            }
            "QUIT" => {
                reply("221 2.0.0 bye\r\n");
                return;
            }
            _ => "502 5.5.2 command not recognized\r\n",
        };
        if !reply(answer) {
            return;
        }
    }
}

/// Scratch directory holding a configuration file
pub struct ConfigFixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl ConfigFixture {
    pub fn new(expected_rate: f32, url: &str) -> Self {
        Self::with_contents(config_json(expected_rate, url))
    }

    /// Configuration whose SMTP settings point at a local server
    pub fn with_smtp(expected_rate: f32, url: &str, smtp_port: u16) -> Self {
        Self::with_contents(smtp_config_json(expected_rate, url, "127.0.0.1", smtp_port))
    }

    fn with_contents(contents: String) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("ratewatch.json");
        fs::write(&path, contents).expect("write config");
        ConfigFixture { dir, path }
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().unwrap()
    }

    pub fn contents(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    pub fn expected_rate(&self) -> f32 {
        read_expected_rate(&self.path)
    }
}

/// Configuration JSON pointing at an SMTP port nothing listens on
pub fn config_json(expected_rate: f32, url: &str) -> String {
    smtp_config_json(expected_rate, url, "127.0.0.1", 1)
}

pub fn smtp_config_json(expected_rate: f32, url: &str, smtp_addr: &str, smtp_port: u16) -> String {
    serde_json::json!({
        "expected_rate": expected_rate,
        "url": url,
        "from": "watcher@example.com",
        "recipients": ["alice@example.com", "bob@example.com"],
        "smtp_addr": smtp_addr,
        "smtp_port": smtp_port,
        "smtp_auth": "app-password"
    })
    .to_string()
}

pub fn read_expected_rate(path: &Path) -> f32 {
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    raw["expected_rate"].as_f64().unwrap() as f32
}
