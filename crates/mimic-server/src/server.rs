//! Server lifecycle: binds the stub and admin listeners around one mapping store.

use crate::admin_api::AdminApiServer;
use crate::config::ServerConfig;
use crate::loader::load_mappings_dir;
use crate::mapping::MappingStore;
use crate::metrics::Metrics;
use crate::stub_server::{StubDispatcher, StubServer};
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

/// A running mimic server.
pub struct MimicServer {
    stub_addr: SocketAddr,
    admin_addr: SocketAddr,
    store: Arc<MappingStore>,
    metrics: Arc<Metrics>,
    shutdown_tx: broadcast::Sender<()>,
    tasks: Vec<JoinHandle<()>>,
}

impl MimicServer {
    /// Start a server with a fresh, empty store.
    pub async fn start(config: &ServerConfig) -> anyhow::Result<Self> {
        Self::start_with_store(config, Arc::new(MappingStore::new())).await
    }

    /// Start a server around an existing store.
    ///
    /// Startup mapping files are registered before either listener accepts traffic.
    pub async fn start_with_store(
        config: &ServerConfig,
        store: Arc<MappingStore>,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let metrics = Arc::new(Metrics::new().context("Failed to register metrics")?);

        if let Some(ref dir) = config.mappings_dir {
            let loaded = load_mappings_dir(dir, &store)?;
            metrics.record_registrations(loaded as u64);
        }

        let stub_addr = config.stub_addr()?;
        let dispatcher = StubDispatcher::new(Arc::clone(&store), Arc::clone(&metrics));
        let stub = StubServer::bind(stub_addr, dispatcher)
            .await
            .with_context(|| format!("Failed to bind stub listener on {stub_addr}"))?;
        let stub_addr = stub.local_addr()?;

        let admin_addr = config.admin_addr()?;
        let admin = AdminApiServer::bind(admin_addr, Arc::clone(&store), Arc::clone(&metrics))
            .await
            .with_context(|| format!("Failed to bind admin listener on {admin_addr}"))?;
        let admin_addr = admin.local_addr()?;

        let (shutdown_tx, _) = broadcast::channel(1);
        let tasks = vec![
            tokio::spawn(stub.run(shutdown_tx.subscribe())),
            tokio::spawn(admin.run(shutdown_tx.subscribe())),
        ];

        info!(
            stub = %stub_addr,
            admin = %admin_addr,
            mappings = store.len(),
            "mimic server started"
        );

        Ok(Self {
            stub_addr,
            admin_addr,
            store,
            metrics,
            shutdown_tx,
            tasks,
        })
    }

    pub fn stub_addr(&self) -> SocketAddr {
        self.stub_addr
    }

    pub fn admin_addr(&self) -> SocketAddr {
        self.admin_addr
    }

    pub fn store(&self) -> &Arc<MappingStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Stop accepting connections on both listeners and wait for the accept loops to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        for task in self.tasks {
            let _ = task.await;
        }
        info!("mimic server stopped");
    }
}
