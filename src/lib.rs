#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod api;
pub mod config;
pub mod domain;
pub mod edge;
pub mod error;
pub mod services;
pub mod telemetry;

use crate::api::MgmtState;
use crate::config::Config;
use crate::domain::routing_plan::RoutingPlanTable;
use crate::services::batch_service::BatchService;
use std::sync::Arc;
use tokio::sync::watch;

/// The wired routers, ready to be served.
#[derive(Debug)]
pub struct App {
    pub api: axum::Router,
    pub mgmt: axum::Router,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    routing_plans: Option<RoutingPlanTable>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, routing_plans: None }
    }

    /// Uses `routing_plans` instead of loading them from the configuration.
    #[must_use]
    pub fn with_routing_plans(mut self, routing_plans: RoutingPlanTable) -> Self {
        self.routing_plans = Some(routing_plans);
        self
    }

    /// Loads the routing plan table and wires the routers.
    ///
    /// # Errors
    /// Returns an error if the configured routing plans file cannot be loaded.
    pub fn build(self) -> anyhow::Result<App> {
        let routing_plans = match (self.routing_plans, &self.config.sandbox.routing_plans_file) {
            (Some(table), _) => table,
            (None, Some(path)) => {
                let table = RoutingPlanTable::load(path)?;
                tracing::info!(path = %path.display(), plans = table.len(), "Loaded routing plans");
                table
            }
            (None, None) => RoutingPlanTable::built_in(),
        };

        let batch_service = BatchService::new(Arc::new(routing_plans), self.config.sandbox.client_id.clone());
        let mgmt = api::mgmt_router(MgmtState { batch_service: batch_service.clone() });
        let api = api::app_router(self.config, batch_service);

        Ok(App { api, mgmt })
    }
}

/// Routes panics through `tracing` so they land in structured logs.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(|l| format!("{}:{}", l.file(), l.line())).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        tracing::error!(panic.location = %location, panic.payload = %payload, "Thread panicked");
    }));
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received ctrl-c, shutting down"),
            () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }

        let _ = shutdown_tx.send(true);
    });
}
