// ── Time-bounded single-flight memoization ──
//
// Each key owns a slot holding the last good value and, while a fetch is
// running, a watch receiver for its outcome. The first caller to find a
// slot empty or stale leads the fetch; callers arriving meanwhile wait on
// the receiver and get the leader's result, success or failure. The map
// guard is never held across an await. Expiry is checked lazily on
// access; nothing sweeps the map.

use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::trace;

struct Entry<V> {
    value: V,
    fetched_at: Instant,
}

type Outcome<V, E> = Option<Result<V, E>>;

struct Slot<V, E> {
    entry: Option<Entry<V>>,
    flight: Option<watch::Receiver<Outcome<V, E>>>,
}

impl<V, E> Slot<V, E> {
    fn empty() -> Self {
        Self {
            entry: None,
            flight: None,
        }
    }
}

enum Step<V, E> {
    Hit(V),
    Wait(watch::Receiver<Outcome<V, E>>),
    Lead(watch::Sender<Outcome<V, E>>),
}

/// A per-key memo whose entries expire `ttl` after they were fetched.
///
/// Guarantees at most one in-flight fetch per key. Keys never block each
/// other. Callers that join an in-flight fetch share its result, errors
/// included; errors are not stored, so the next call after a failure
/// fetches again. If the leading caller is dropped mid-fetch, one of the
/// waiters takes over.
pub struct TtlCache<K, V, E> {
    ttl: Duration,
    slots: DashMap<K, Slot<V, E>>,
}

impl<K, V, E> TtlCache<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key` if it is younger than the TTL,
    /// otherwise run `fetch` (or join the fetch already running) and
    /// store its result.
    pub async fn get_or_try_fetch<F, Fut>(&self, key: &K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let tx = loop {
            match self.join(key) {
                Step::Hit(value) => {
                    trace!("cache hit");
                    return Ok(value);
                }
                Step::Wait(mut rx) => {
                    let shared = rx
                        .wait_for(Option::is_some)
                        .await
                        .ok()
                        .and_then(|done| (*done).clone());
                    if let Some(result) = shared {
                        return result;
                    }
                    trace!("in-flight fetch was abandoned, retrying");
                }
                Step::Lead(tx) => break tx,
            }
        };

        let result = fetch().await;
        if let Some(mut slot) = self.slots.get_mut(key) {
            if let Ok(value) = &result {
                slot.entry = Some(Entry {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                });
            }
            slot.flight = None;
        }
        tx.send_replace(Some(result.clone()));
        result
    }

    // Decide under the shard lock whether to hit, wait, or lead.
    fn join(&self, key: &K) -> Step<V, E> {
        let mut slot = self.slots.entry(key.clone()).or_insert_with(Slot::empty);

        if let Some(entry) = &slot.entry {
            if entry.fetched_at.elapsed() < self.ttl {
                return Step::Hit(entry.value.clone());
            }
        }
        // A closed channel means the leader was dropped before finishing.
        if let Some(rx) = &slot.flight {
            if rx.has_changed().is_ok() {
                return Step::Wait(rx.clone());
            }
        }

        let (tx, rx) = watch::channel(None);
        slot.flight = Some(rx);
        Step::Lead(tx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::{advance, sleep, timeout};

    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    type Cache = TtlCache<&'static str, u32, &'static str>;

    async fn counted(calls: &AtomicUsize, value: u32) -> Result<u32, &'static str> {
        calls.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_millis(10)).await;
        Ok(value)
    }

    async fn failing(calls: &AtomicUsize) -> Result<u32, &'static str> {
        calls.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_millis(10)).await;
        Err("boom")
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_value_is_reused() {
        let cache = Cache::new(TTL);
        let calls = AtomicUsize::new(0);

        for _ in 0..5 {
            let v = cache.get_or_try_fetch(&"k", || counted(&calls, 7)).await;
            assert_eq!(v, Ok(7));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_value_is_refetched_exactly_once() {
        let cache = Cache::new(TTL);
        let calls = AtomicUsize::new(0);

        cache.get_or_try_fetch(&"k", || counted(&calls, 1)).await.unwrap();

        advance(TTL - Duration::from_secs(1)).await;
        let v = cache.get_or_try_fetch(&"k", || counted(&calls, 2)).await;
        assert_eq!(v, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        advance(Duration::from_secs(2)).await;
        let v = cache.get_or_try_fetch(&"k", || counted(&calls, 2)).await;
        assert_eq!(v, Ok(2));
        let v = cache.get_or_try_fetch(&"k", || counted(&calls, 3)).await;
        assert_eq!(v, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_fetch() {
        let cache = Cache::new(TTL);
        let calls = AtomicUsize::new(0);

        let (a, b, c) = tokio::join!(
            cache.get_or_try_fetch(&"k", || counted(&calls, 1)),
            cache.get_or_try_fetch(&"k", || counted(&calls, 2)),
            cache.get_or_try_fetch(&"k", || counted(&calls, 3)),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, Ok(1));
        assert_eq!(b, Ok(1));
        assert_eq!(c, Ok(1));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_failure() {
        let cache = Cache::new(TTL);
        let calls = AtomicUsize::new(0);

        let (a, b, c) = tokio::join!(
            cache.get_or_try_fetch(&"k", || failing(&calls)),
            cache.get_or_try_fetch(&"k", || failing(&calls)),
            cache.get_or_try_fetch(&"k", || failing(&calls)),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!((a, b, c), (Err("boom"), Err("boom"), Err("boom")));
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_cached_independently() {
        let cache = Cache::new(TTL);
        let calls = AtomicUsize::new(0);

        let (a, b) = tokio::join!(
            cache.get_or_try_fetch(&"a", || counted(&calls, 1)),
            cache.get_or_try_fetch(&"b", || counted(&calls, 2)),
        );
        assert_eq!((a, b), (Ok(1), Ok(2)));

        let (a, b) = tokio::join!(
            cache.get_or_try_fetch(&"a", || counted(&calls, 3)),
            cache.get_or_try_fetch(&"b", || counted(&calls, 4)),
        );
        assert_eq!((a, b), (Ok(1), Ok(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_not_cached() {
        let cache = Cache::new(TTL);
        let calls = AtomicUsize::new(0);

        let v = cache.get_or_try_fetch(&"k", || failing(&calls)).await;
        assert_eq!(v, Err("boom"));

        let v = cache.get_or_try_fetch(&"k", || counted(&calls, 9)).await;
        assert_eq!(v, Ok(9));
        let v = cache.get_or_try_fetch(&"k", || counted(&calls, 10)).await;
        assert_eq!(v, Ok(9));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_leader_lets_next_caller_fetch() {
        let cache = Cache::new(TTL);
        let calls = AtomicUsize::new(0);

        let abandoned = timeout(
            Duration::from_millis(5),
            cache.get_or_try_fetch(&"k", || counted(&calls, 1)),
        )
        .await;
        assert!(abandoned.is_err());

        let v = cache.get_or_try_fetch(&"k", || counted(&calls, 2)).await;
        assert_eq!(v, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn waiter_takes_over_from_dropped_leader() {
        let cache = Cache::new(TTL);
        let calls = AtomicUsize::new(0);

        let (abandoned, waiter) = tokio::join!(
            timeout(
                Duration::from_millis(5),
                cache.get_or_try_fetch(&"k", || counted(&calls, 1)),
            ),
            cache.get_or_try_fetch(&"k", || counted(&calls, 2)),
        );

        assert!(abandoned.is_err());
        assert_eq!(waiter, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
