//! Line-oriented request loop.
//!
//! Each stdin line is a JSON [`PlacementEnvelope`]; each reply is one
//! JSON [`PlacementReply`] line on stdout. Logs go to stderr.

use revpack_core::{PlacementEnvelope, PlacementReply};
use revpack_placement::{PlacementStrategy, container_to_request};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Run one envelope through the strategy.
pub fn handle_envelope(strategy: &dyn PlacementStrategy, envelope: &PlacementEnvelope) -> PlacementReply {
    let request = container_to_request(&envelope.container);
    match strategy.decide(&request, &envelope.hosts) {
        Ok(host) => {
            info!(
                image = %envelope.container.image,
                host = %host.id,
                "placed container"
            );
            PlacementReply::Host(host.clone())
        }
        Err(e) => {
            debug!(image = %envelope.container.image, error = %e, "placement failed");
            PlacementReply::Error(e.to_string())
        }
    }
}

/// Parse and handle a single request line.
pub fn handle_line(strategy: &dyn PlacementStrategy, line: &str) -> PlacementReply {
    match serde_json::from_str::<PlacementEnvelope>(line) {
        Ok(envelope) => handle_envelope(strategy, &envelope),
        Err(e) => {
            warn!(error = %e, "malformed placement request");
            PlacementReply::Error(format!("malformed request: {e}"))
        }
    }
}

/// Serve requests from stdin until EOF or Ctrl-C.
pub async fn run(strategy: &dyn PlacementStrategy) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut served: u64 = 0;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(strategy = strategy.name(), "serving placement requests on stdin");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let reply = handle_line(strategy, &line);
                let mut out = serde_json::to_vec(&reply)?;
                out.push(b'\n');
                stdout.write_all(&out).await?;
                stdout.flush().await?;
                served += 1;
            }
            _ = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!(served, "serve loop stopped");
    Ok(())
}
