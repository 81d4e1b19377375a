//! Default child executable for procbridge.
//!
//! Reads one JSON document from stdin and writes one JSON line to stdout.
//! Invalid input exits nonzero with the parse error on stderr.

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const PROGRAM: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Deserialize)]
struct Request {
    message: Option<String>,
    ping: Option<bool>,
    timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
struct Reply {
    ok: bool,
    input: serde_json::Value,
    response: String,
    pong: Option<bool>,
}

fn reply(raw: &str) -> Result<Reply> {
    let input: serde_json::Value = if raw.trim().is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(raw).context("input is not valid JSON")?
    };
    let request = Request::deserialize(&input).context("input does not match the request shape")?;

    let (response, pong) = if request.ping == Some(true) {
        let at = request.timestamp.as_deref().unwrap_or("unknown");
        (
            format!("Pong! {PROGRAM} is alive. Received at: {at}"),
            Some(true),
        )
    } else if let Some(message) = request.message {
        (format!("Echo: {message}"), None)
    } else {
        ("No specific message provided".to_string(), None)
    };

    Ok(Reply {
        ok: true,
        input,
        response,
        pong,
    })
}

fn main() -> Result<()> {
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read stdin")?;

    let reply = reply(&raw)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &reply)?;
    writeln!(stdout)?;
    Ok(())
}
