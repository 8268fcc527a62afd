//! Mock endpoint lifecycle.
//!
//! The mock endpoint is the capture router served on a real listener. It is
//! started once before a run and stopped once afterwards.

use std::net::SocketAddr;

use sst_protocol::endpoints::{capture_router, CaptureSlot, CaptureState};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

use crate::error::{HarnessError, HarnessResult};
use crate::suite::TestSuite;

/// A running mock endpoint.
pub struct MockServer {
    local_addr: SocketAddr,
    path: String,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl MockServer {
    /// Binds `addr` and serves the capture endpoint at `path`.
    pub async fn start(addr: &str, path: &str, slot: CaptureSlot) -> HarnessResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| HarnessError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let app = capture_router(path).with_state(CaptureState::new(slot));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!("Mock endpoint listening on http://{}{}", local_addr, path);

        Ok(Self {
            local_addr,
            path: path.to_string(),
            shutdown_tx,
            handle,
        })
    }

    /// Serves the capture endpoint where `suite` expects its mock counterparty.
    pub async fn start_for(suite: &dyn TestSuite, slot: CaptureSlot) -> HarnessResult<Self> {
        let url = Url::parse(suite.mock_endpoint_url()).map_err(|e| {
            HarnessError::Config(format!(
                "mock endpoint URL of suite {} is invalid: {e}",
                suite.id()
            ))
        })?;
        let host = url.host_str().unwrap_or("localhost");
        let port = url.port_or_known_default().unwrap_or(8080);

        Self::start(&format!("{host}:{port}"), url.path(), slot).await
    }

    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Full URL of the capture endpoint.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}{}", self.local_addr, self.path)
    }

    /// Stops the server and waits for in-flight requests to finish.
    pub async fn stop(self) -> HarnessResult<()> {
        // The server may already have exited, in which case the join reports why.
        let _ = self.shutdown_tx.send(());

        match self.handle.await {
            Ok(Ok(())) => {
                tracing::info!("Mock endpoint stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(HarnessError::Endpoint(e.to_string())),
            Err(e) => Err(HarnessError::Endpoint(e.to_string())),
        }
    }
}
