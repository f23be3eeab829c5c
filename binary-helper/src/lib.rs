use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use common::context::{Context, Handler};
use common::prelude::FutureTimeout;
use common::{logging, signal};
use tokio::signal::unix::SignalKind;
use tokio::select;
pub use traits::{Config, Global};

/// How long tasks get to finish after the shutdown signal.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

pub mod config;
pub mod global;
pub mod traits;

/// Runs a service process: parses the config, sets up logging and the global
/// state, then runs `process` until it exits or a SIGINT/SIGTERM arrives.
///
/// Shutdown cancels the shared context and waits up to 60 seconds (or a
/// second signal) for every task holding it to finish.
pub async fn bootstrap<C: Config, G: Global<C>, F: Future<Output = anyhow::Result<()>> + Send + 'static>(
	process: impl FnOnce(Arc<G>) -> F,
) -> anyhow::Result<()> {
	let (ctx, handler) = Context::new();

	let config = C::parse()
		.and_then(|mut config| {
			config.pre_hook()?;
			Ok(config)
		})
		.map_err(|err| {
			logging::init("trace", Default::default()).expect("failed to init logging");

			err
		})
		.context("failed to parse config")?;

	logging::init(&config.logging().level, config.logging().mode).context("failed to init logging")?;

	tracing::info!(name = config.name(), "starting up");

	let global = Arc::new(G::new(ctx, config).await.context("failed to create global state")?);

	tracing::debug!("global state created, starting process");

	let process_future = tokio::spawn(process(global));

	let mut signal_handler = signal::SignalHandler::new()
		.with_signal(SignalKind::interrupt())
		.with_signal(SignalKind::terminate());

	select! {
		_ = signal_handler.recv() => tracing::info!("shutting down"),
		r = process_future => tracing::error!("process stopped unexpectedly: {:#}", match &r {
			Ok(Ok(())) => &"no error raised" as &dyn std::fmt::Display,
			Err(err) => err as &dyn std::fmt::Display,
			Ok(Err(err)) => err as &dyn std::fmt::Display,
		}),
	}

	tracing::info!("waiting for tasks to finish");

	select! {
		drained = drain(handler, SHUTDOWN_TIMEOUT) => if drained {
			tracing::info!("shutting down");
		} else {
			tracing::warn!("force shutting down");
		},
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
	}

	Ok(())
}

/// Cancels the context and waits for every holder to drop it. Returns false
/// when `timeout` passes first.
pub async fn drain(handler: Handler, timeout: Duration) -> bool {
	handler.cancel().timeout(timeout).await.is_ok()
}

#[cfg(test)]
mod tests;
