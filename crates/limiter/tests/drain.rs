//! `wait` drains the ticket supply and closes admission for good
//!
//! These tests pin down the literal drain behaviour: `wait` is a one-shot
//! idle barrier, not a reusable "wait until idle".

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tollkit_limiter::{CancellationToken, LimiterError, TicketLimiter};

#[tokio::test]
async fn wait_on_idle_limiter_returns_promptly() {
    let limiter = TicketLimiter::new(4);

    tokio::time::timeout(Duration::from_secs(1), limiter.wait())
        .await
        .expect("idle limiter should drain immediately");

    assert!(limiter.is_drained());
    assert_eq!(limiter.in_progress(), 0);
    assert_eq!(limiter.available(), 0);
}

#[tokio::test]
async fn drained_limiter_admits_nothing() {
    let limiter = TicketLimiter::new(2);
    limiter.wait().await;

    assert!(limiter.try_acquire().is_none());
    assert!(matches!(
        limiter.acquire_timeout(Duration::from_millis(30)).await,
        Err(LimiterError::Timeout { .. })
    ));

    let token = CancellationToken::new();
    token.cancel();
    assert!(matches!(
        limiter.execute_cancellable(&token, |_| async {}).await,
        Err(LimiterError::Cancelled)
    ));

    let stats = limiter.stats();
    assert!(stats.drained);
    assert_eq!(stats.available, 0);
    assert_eq!(stats.in_progress, 0);
}

#[tokio::test]
async fn wait_blocks_until_held_tickets_return() {
    let limiter = TicketLimiter::new(2);
    let held = limiter.acquire().await;

    let drainer = {
        let limiter = limiter.clone();
        tokio::spawn(async move { limiter.wait().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!drainer.is_finished(), "wait returned while work was in flight");
    assert!(!limiter.is_drained());

    drop(held);
    tokio::time::timeout(Duration::from_secs(1), drainer)
        .await
        .expect("wait should finish once the last ticket returns")
        .unwrap();
    assert!(limiter.is_drained());
}

#[tokio::test]
async fn wait_queues_behind_earlier_waiters() {
    let limiter = TicketLimiter::new(1);
    let held = limiter.acquire().await;
    let early_ran = Arc::new(AtomicBool::new(false));

    let early = {
        let limiter = limiter.clone();
        let early_ran = Arc::clone(&early_ran);
        tokio::spawn(async move {
            limiter
                .execute(|| async move { early_ran.store(true, Ordering::SeqCst) })
                .await;
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    let drainer = {
        let limiter = limiter.clone();
        tokio::spawn(async move { limiter.wait().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    drop(held);
    early.await.unwrap();
    drainer.await.unwrap();

    assert!(early_ran.load(Ordering::SeqCst), "earlier waiter was starved by wait");
    assert!(limiter.is_drained());
}

#[tokio::test]
async fn second_wait_never_completes() {
    let limiter = TicketLimiter::new(1);
    limiter.wait().await;

    let again = tokio::time::timeout(Duration::from_millis(30), limiter.wait()).await;
    assert!(again.is_err(), "supply is not replenished after a drain");
}
