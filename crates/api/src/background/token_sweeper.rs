//! Periodic removal of expired verification tokens.
//!
//! Tokens stop validating the moment they pass their one-hour lifetime;
//! this job only reclaims the rows.

use std::time::Duration;

use reelview_core::token::TokenManager;
use tokio_util::sync::CancellationToken;

/// Run the sweep loop every `interval` until `cancel` is triggered.
pub async fn run(tokens: TokenManager, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Token sweeper started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Token sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                match tokens.purge_expired().await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Token sweeper: purged expired tokens");
                        } else {
                            tracing::debug!("Token sweeper: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Token sweeper: purge failed");
                    }
                }
            }
        }
    }
}
