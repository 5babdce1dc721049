//! Admin API server.

use crate::admin_api::router::route_request;
use crate::mapping::MappingStore;
use crate::metrics::Metrics;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// Admin API server for mimic
pub struct AdminApiServer {
    listener: TcpListener,
    store: Arc<MappingStore>,
    metrics: Arc<Metrics>,
}

impl AdminApiServer {
    /// Bind the admin API listener
    pub async fn bind(
        addr: SocketAddr,
        store: Arc<MappingStore>,
        metrics: Arc<Metrics>,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            store,
            metrics,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the admin API server until shutdown
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        if let Ok(addr) = self.listener.local_addr() {
            info!("mimic Admin API listening on http://{}/__admin", addr);
        }

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    let stream = match result {
                        Ok((stream, _)) => stream,
                        Err(e) => {
                            error!("Admin API accept error: {}", e);
                            continue;
                        }
                    };
                    let io = TokioIo::new(stream);
                    let store = Arc::clone(&self.store);
                    let metrics = Arc::clone(&self.metrics);

                    tokio::spawn(async move {
                        let service = service_fn(move |req| {
                            let store = Arc::clone(&store);
                            let metrics = Arc::clone(&metrics);
                            async move { route_request(req, store, metrics).await }
                        });

                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            debug!("Admin API connection error: {}", e);
                        }
                    });
                }
                _ = shutdown_rx.recv() => {
                    info!("Admin API shutting down");
                    break;
                }
            }
        }
    }
}
