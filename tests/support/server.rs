//! Scripted Bernard backend for integration tests.
//!
//! Serves canned JSON on a local port and records every request line +
//! body so tests can assert on what the client actually sent. The
//! running flag flips when a scan-start or stop endpoint is hit, so
//! status polls observe a live run the way the real backend reports one.

use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

pub struct BernardServer {
    pub url: String,
    running: Arc<AtomicBool>,
    cleared: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl BernardServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let addr = listener.local_addr().expect("server addr");
        let running = Arc::new(AtomicBool::new(false));
        let cleared = Arc::new(AtomicBool::new(false));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let thread_running = running.clone();
        let thread_cleared = cleared.clone();
        let thread_requests = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                handle_connection(
                    stream,
                    &thread_running,
                    &thread_cleared,
                    &thread_requests,
                );
            }
        });

        Self {
            url: format!("http://{addr}"),
            running,
            cleared,
            requests,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Count recorded requests whose request line starts with `prefix`,
    /// e.g. `POST /api/scan/single`.
    pub fn count_requests(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.starts_with(prefix))
            .count()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn handle_connection(
    mut stream: TcpStream,
    running: &AtomicBool,
    cleared: &AtomicBool,
    requests: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let line = request.lines().next().unwrap_or_default();
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let path = parts.next().unwrap_or_default();

    let body = route(method, path, running, cleared);
    // Record only after side effects so a test that observes the
    // request also observes its effect on the running/cleared flags.
    requests.lock().expect("requests lock").push(request);
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn route(method: &str, path: &str, running: &AtomicBool, cleared: &AtomicBool) -> String {
    match (method, path) {
        ("GET", "/api/status") => format!(
            r#"{{ "isRunning": {}, "logs": ["Scan log line"] }}"#,
            running.load(Ordering::SeqCst)
        ),
        ("GET", "/api/stats") => r#"{
            "totalLeads": 3,
            "totalRuns": 1,
            "latestRun": { "id": 1, "city": "Miami", "niche": "Dentists" }
        }"#
        .to_string(),
        ("GET", "/api/runs") => r#"{
            "runs": [
                { "id": 1, "city": "Miami", "niche": "Dentists", "status": "completed", "total_leads": 3 }
            ]
        }"#
        .to_string(),
        ("GET", _) if path.starts_with("/api/leads") => {
            if cleared.load(Ordering::SeqCst) {
                r#"{ "leads": [] }"#.to_string()
            } else {
                r#"{
                    "leads": [
                        { "id": 1, "name": "Joe's Diner", "phone": "555-0101", "city": "Miami", "niche": "Restaurants" },
                        { "id": 2, "name": "Bare Gym", "email": "gym@example.com", "city": "Atlanta", "niche": "Gyms" },
                        { "id": 3, "name": "Shear Salon", "city": "Miami", "niche": "Salons" }
                    ]
                }"#
                .to_string()
            }
        }
        ("GET", "/api/config") => r#"{
            "city": "Raleigh",
            "state": "NC",
            "niche": "Restaurants",
            "searchQuery": "",
            "channelFilter": "",
            "maxLeads": 50,
            "sources": { "google_maps": true, "yelp": false }
        }"#
        .to_string(),
        ("POST", "/api/scan/single") | ("POST", "/api/scan/auto") => {
            running.store(true, Ordering::SeqCst);
            r#"{ "ok": true }"#.to_string()
        }
        ("POST", "/api/scan/stop") => {
            running.store(false, Ordering::SeqCst);
            r#"{ "ok": true }"#.to_string()
        }
        ("POST", "/api/clear") => {
            cleared.store(true, Ordering::SeqCst);
            r#"{ "ok": true }"#.to_string()
        }
        _ => "{}".to_string(),
    }
}

/// Read the request line, headers, and any Content-Length body.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let Ok(read) = stream.read(&mut chunk) else {
            return None;
        };
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
        if let Some(header_end) = find_header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    if buf.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(&buf).into_owned())
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}
