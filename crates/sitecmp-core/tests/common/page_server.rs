//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed pages by path and a fake OpenAI-style chat-completions
//! endpoint at `POST /v1/chat/completions`. The fake model answers with
//! `compared N sources` where N is the number of source sections in the
//! prompt, and rejects requests without `Authorization: Bearer test-key`.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const API_KEY: &str = "test-key";

#[derive(Debug, Clone)]
pub enum Route {
    Page {
        content_type: &'static str,
        body: String,
    },
    Redirect(&'static str),
    Status(u16),
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Vec<(&'static str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<&'static str, Route>> = Arc::new(routes.into_iter().collect());
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// Convenience route for a text/html page.
pub fn html(body: &str) -> Route {
    Route::Page {
        content_type: "text/html; charset=utf-8",
        body: body.to_string(),
    }
}

struct Request {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Request {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = std::str::from_utf8(&data[..header_end]).ok()?.to_string();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let body = String::from_utf8_lossy(&data[header_end..]).into_owned();

    Some(Request {
        method,
        path,
        headers,
        body,
    })
}

fn respond(stream: &mut TcpStream, status: &str, extra_headers: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
        status,
        body.len(),
        extra_headers,
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn handle(mut stream: TcpStream, routes: &HashMap<&'static str, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let req = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };

    if req.method.eq_ignore_ascii_case("POST") && req.path == "/v1/chat/completions" {
        chat_completion(&mut stream, &req);
        return;
    }

    match routes.get(req.path.as_str()) {
        Some(Route::Page { content_type, body }) => respond(
            &mut stream,
            "200 OK",
            &format!("Content-Type: {}\r\n", content_type),
            body,
        ),
        Some(Route::Redirect(to)) => respond(
            &mut stream,
            "302 Found",
            &format!("Location: {}\r\n", to),
            "",
        ),
        Some(Route::Status(code)) => respond(&mut stream, &format!("{} Status", code), "", ""),
        None => respond(&mut stream, "404 Not Found", "", "not found"),
    }
}

fn chat_completion(stream: &mut TcpStream, req: &Request) {
    let expected = format!("Bearer {}", API_KEY);
    if req.header("authorization") != Some(expected.as_str()) {
        respond(
            stream,
            "401 Unauthorized",
            "Content-Type: application/json\r\n",
            r#"{"error":{"message":"Incorrect API key provided"}}"#,
        );
        return;
    }
    let sources = req.body.matches("=== Source ").count();
    let unavailable = req.body.matches("[unavailable:").count();
    let body = format!(
        r#"{{"id":"chatcmpl-test","object":"chat.completion","choices":[{{"index":0,"message":{{"role":"assistant","content":"compared {} sources ({} unavailable)"}},"finish_reason":"stop"}}],"usage":{{"prompt_tokens":1,"completion_tokens":1,"total_tokens":2}}}}"#,
        sources, unavailable
    );
    respond(stream, "200 OK", "Content-Type: application/json\r\n", &body);
}
