//! Newline-delimited JSON loop between the rendering host and the router.
//!
//! One request per line in, exactly one response line out. Requests are
//! handled strictly in arrival order.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::layout::{layout, Layout};
use crate::router::{Router, WidgetUpdate};

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Layout,
    Render,
    Change { control: String, value: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Layout(Layout),
    Updates { updates: Vec<WidgetUpdate> },
    Error { message: String },
}

pub fn handle(router: &Router<'_>, request: Request) -> Response {
    match request {
        Request::Layout => Response::Layout(layout(router)),
        Request::Render => Response::Updates {
            updates: router.initial_render(),
        },
        Request::Change { control, value } => match router.dispatch(&control, &value) {
            Ok(updates) => Response::Updates { updates },
            Err(e) => Response::Error { message: e.to_string() },
        },
    }
}

pub fn handle_line(router: &Router<'_>, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle(router, request),
        Err(e) => {
            let err = DashboardError::BadRequest(e.to_string());
            warn!(action = "parse", component = "server", error = %err, "Rejected request");
            Response::Error { message: err.to_string() }
        }
    }
}

/// Serves until `input` reaches EOF. Only I/O failures end the loop early.
pub fn serve<R: BufRead, W: Write>(router: &Router<'_>, input: R, mut output: W) -> Result<()> {
    info!(action = "start", component = "server", "Serving requests");
    let mut served = 0usize;

    for line in input.lines() {
        let line = line.context("Failed to read request")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let start_time = Instant::now();
        let response = handle_line(router, line);
        serde_json::to_writer(&mut output, &response).context("Failed to encode response")?;
        output.write_all(b"\n").context("Failed to write response")?;
        output.flush().context("Failed to flush response")?;

        served += 1;
        debug!(
            action = "respond",
            component = "server",
            duration_ms = start_time.elapsed().as_millis(),
            "Request served"
        );
    }

    info!(action = "complete", component = "server", requests = served, "Input closed");
    Ok(())
}
