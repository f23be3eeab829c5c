use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{broadcast, oneshot};
use tokio::time::Instant;

/// A cancellation scope shared by every task of a process.
///
/// A context is done when its [`Handler`] is cancelled (or dropped), when its
/// deadline passes, or when its parent is done. The handler can wait until
/// every clone of the context has been dropped, which is how the server
/// waits for in-flight work during shutdown.
#[derive(Clone)]
pub struct Context(Arc<RawContext>);

struct RawContext {
	_sender: oneshot::Sender<()>,
	deadline: Option<Instant>,
	parent: Option<Context>,
	cancel_receiver: broadcast::Receiver<()>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CancelReason {
	Parent,
	Deadline,
	Cancel,
}

impl Display for CancelReason {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Parent => write!(f, "Parent"),
			Self::Deadline => write!(f, "Deadline"),
			Self::Cancel => write!(f, "Cancel"),
		}
	}
}

impl RawContext {
	#[must_use]
	fn new(parent: Option<Context>, deadline: Option<Instant>) -> (Self, Handler) {
		let (sender, recv) = oneshot::channel();
		let (cancel_sender, cancel_receiver) = broadcast::channel(1);

		(
			Self {
				_sender: sender,
				deadline,
				parent,
				cancel_receiver,
			},
			Handler { recv, cancel_sender },
		)
	}

	fn is_done(&self) -> bool {
		let cancelled = matches!(self.cancel_receiver.resubscribe().try_recv(), Err(TryRecvError::Closed));
		let expired = self.deadline.is_some_and(|deadline| Instant::now() >= deadline);
		let parent_done = self.parent.as_ref().is_some_and(Context::is_done);

		cancelled || expired || parent_done
	}

	fn done(&self) -> Pin<Box<dyn Future<Output = CancelReason> + '_ + Send>> {
		let mut recv = self.cancel_receiver.resubscribe();
		Box::pin(async move {
			match (&self.parent, self.deadline) {
				(Some(parent), Some(deadline)) => {
					tokio::select! {
						_ = parent.done() => CancelReason::Parent,
						_ = tokio::time::sleep_until(deadline) => CancelReason::Deadline,
						_ = recv.recv() => CancelReason::Cancel,
					}
				}
				(Some(parent), None) => {
					tokio::select! {
						_ = parent.done() => CancelReason::Parent,
						_ = recv.recv() => CancelReason::Cancel,
					}
				}
				(None, Some(deadline)) => {
					tokio::select! {
						_ = tokio::time::sleep_until(deadline) => CancelReason::Deadline,
						_ = recv.recv() => CancelReason::Cancel,
					}
				}
				(None, None) => {
					let _ = recv.recv().await;
					CancelReason::Cancel
				}
			}
		})
	}
}

pub struct Handler {
	recv: oneshot::Receiver<()>,
	cancel_sender: broadcast::Sender<()>,
}

impl Handler {
	/// Resolves once every clone of the context has been dropped.
	pub async fn done(&mut self) {
		let _ = (&mut self.recv).await;
	}

	/// Cancels the context and waits for every clone of it to be dropped.
	pub async fn cancel(self) {
		drop(self.cancel_sender);

		let _ = self.recv.await;
	}
}

impl From<RawContext> for Context {
	fn from(ctx: RawContext) -> Self {
		Self(Arc::new(ctx))
	}
}

impl Context {
	pub fn new() -> (Self, Handler) {
		let (ctx, handler) = RawContext::new(None, None);
		(ctx.into(), handler)
	}

	pub fn with_deadline(deadline: Instant) -> (Self, Handler) {
		let (ctx, handler) = RawContext::new(None, Some(deadline));
		(ctx.into(), handler)
	}

	pub fn with_timeout(timeout: std::time::Duration) -> (Self, Handler) {
		Self::with_deadline(Instant::now() + timeout)
	}

	pub fn with_parent(parent: Context, deadline: Option<Instant>) -> (Self, Handler) {
		let (ctx, handler) = RawContext::new(Some(parent), deadline);
		(ctx.into(), handler)
	}

	pub async fn done(&self) -> CancelReason {
		self.0.done().await
	}

	pub fn is_done(&self) -> bool {
		self.0.is_done()
	}
}
