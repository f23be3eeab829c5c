use std::time::Duration;

use common::context::Context;

use crate::drain;

#[tokio::test]
async fn test_drain_finishes_when_tasks_exit() {
	let (ctx, handler) = Context::new();

	let task = tokio::spawn(async move {
		ctx.done().await;
	});

	assert!(drain(handler, Duration::from_secs(1)).await);
	task.await.expect("task should finish");
}

#[tokio::test]
async fn test_drain_gives_up_on_stuck_tasks() {
	let (ctx, handler) = Context::new();

	// Holds the context past the deadline.
	let task = tokio::spawn(async move {
		tokio::time::sleep(Duration::from_secs(5)).await;
		drop(ctx);
	});

	assert!(!drain(handler, Duration::from_millis(50)).await);
	task.abort();
}
