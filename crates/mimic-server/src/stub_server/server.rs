//! Stub traffic server.

use super::dispatcher::StubDispatcher;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// Serves stub traffic on a bound listener.
pub struct StubServer {
    listener: TcpListener,
    dispatcher: StubDispatcher,
}

impl StubServer {
    /// Bind the stub listener. Port 0 picks an ephemeral port.
    pub async fn bind(addr: SocketAddr, dispatcher: StubDispatcher) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dispatcher,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until a shutdown signal arrives.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let port = self.listener.local_addr().map(|a| a.port()).unwrap_or(0);
        info!("Stub server listening on port {}", port);

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let dispatcher = self.dispatcher.clone();
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req| {
                                    let dispatcher = dispatcher.clone();
                                    async move { dispatcher.handle_http(req).await }
                                });
                                if let Err(e) = http1::Builder::new()
                                    .title_case_headers(true)
                                    .serve_connection(io, service)
                                    .await
                                {
                                    debug!("Connection error from {}: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Accept error on port {}: {}", port, e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Stub server on port {} shutting down", port);
                    break;
                }
            }
        }
    }
}
