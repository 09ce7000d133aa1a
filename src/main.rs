//! timemark command server — request/response over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"action":"addBookmark", "data":{"subjectId":"...", ...}}
//! Response: {"ok":true, "data":...} or {"ok":false, "error":"..."}
//!
//! An `id` field on a request, when present, is echoed back on its response so
//! callers can correlate concurrent requests.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use serde_json::{json, Value};

use timemark::app::App;
use timemark::command_router::dispatch;

fn main() {
    env_logger::init();

    // Prefer TIMEMARK_DATA_DIR, fall back to the executable's directory.
    let db_path = if let Ok(dir) = std::env::var("TIMEMARK_DATA_DIR") {
        std::path::PathBuf::from(dir).join("timemark.db")
    } else if let Ok(exe) = std::env::current_exe() {
        exe.parent()
            .unwrap_or(std::path::Path::new("."))
            .join("timemark.db")
    } else {
        std::path::PathBuf::from("timemark.db")
    };

    let app = match App::new(db_path.to_str().unwrap_or("timemark.db")) {
        Ok(app) => Mutex::new(app),
        Err(err) => {
            log::error!("failed to open bookmark database: {}", err);
            std::process::exit(1);
        }
    };
    log::info!("bookmark database ready at {}", db_path.display());

    // Signal ready
    let ready = json!({"event":"ready","version":env!("CARGO_PKG_VERSION")});
    println!("{}", ready);
    io::stdout().flush().ok();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(err) => {
                log::warn!("unparseable request line: {}", err);
                let response = json!({"ok": false, "error": format!("parse error: {}", err)});
                println!("{}", response);
                io::stdout().flush().ok();
                continue;
            }
        };

        let envelope = dispatch(&app, &request);
        let mut response = serde_json::to_value(&envelope)
            .unwrap_or_else(|_| json!({"ok": false, "error": "response serialization failed"}));
        if let Some(id) = request.get("id") {
            response["id"] = id.clone();
        }
        println!("{}", response);
        io::stdout().flush().ok();
    }
}
