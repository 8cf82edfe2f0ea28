use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

#[test]
fn raise_without_listeners_is_noop() {
    let signal = UnauthorizedSignal::new();
    signal.raise();
    assert_eq!(signal.listener_count(), 0);
}

#[test]
fn raise_calls_every_listener_once() {
    let signal = UnauthorizedSignal::new();
    let hits = Arc::new(AtomicUsize::new(0));
    for _ in 0..2 {
        let hits = hits.clone();
        signal.subscribe(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        });
    }
    signal.raise();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn clones_share_listeners() {
    let signal = UnauthorizedSignal::new();
    let other = signal.clone();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    other.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    signal.raise();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(signal.listener_count(), 1);
}

#[test]
fn listener_may_subscribe_during_raise() {
    let signal = UnauthorizedSignal::new();
    let inner = signal.clone();
    signal.subscribe(move || inner.subscribe(|| {}));
    signal.raise();
    assert_eq!(signal.listener_count(), 2);
}
