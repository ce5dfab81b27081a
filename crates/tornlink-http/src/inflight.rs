use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;

use tornlink_core::{ApiError, Result};

use crate::fetch::RawResponse;

type Shared = Result<RawResponse>;

/// Shares one outbound request between concurrent callers asking for the
/// same thing
#[derive(Clone, Default)]
pub struct InflightRequests {
    // Map identity -> broadcast sender of the leader's result
    inflight: Arc<DashMap<String, broadcast::Sender<Shared>>>,
}

/// Removes the leader's map entry even if the leader is cancelled
struct LeaderGuard<'a> {
    map: &'a DashMap<String, broadcast::Sender<Shared>>,
    key: &'a str,
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(self.key);
    }
}

impl InflightRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests currently led by some caller
    pub fn len(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inflight.is_empty()
    }

    /// Execute `f` unless a request with the same identity is already
    /// running, in which case wait for that one's result instead.
    pub async fn run<F, Fut>(&self, key: &str, f: F) -> Shared
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Shared>,
    {
        // Scope keeps the DashMap entry lock from living across an await
        let action = {
            match self.inflight.entry(key.to_string()) {
                Entry::Occupied(o) => Ok(o.get().subscribe()),
                Entry::Vacant(v) => {
                    let (tx, _rx) = broadcast::channel(1);
                    v.insert(tx.clone());
                    Err(tx)
                }
            }
        };

        match action {
            Ok(mut rx) => match rx.recv().await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Transport(
                    "shared in-flight request was abandoned".to_string(),
                )),
            },
            Err(tx) => {
                let guard = LeaderGuard {
                    map: &self.inflight,
                    key,
                };
                let result = f().await;
                drop(guard);

                if tx.receiver_count() > 0 {
                    let _ = tx.send(result.clone());
                }
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_execution() {
        let inflight = InflightRequests::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let call = || {
            let runs = runs.clone();
            let inflight = inflight.clone();
            async move {
                inflight
                    .run("v1 user [profile]", || async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok(Arc::new(json!({"ok": true})))
                    })
                    .await
            }
        };

        let (a, b, c) = tokio::join!(call(), call(), call());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        for result in [a, b, c] {
            assert_eq!(result.unwrap()["ok"], json!(true));
        }
        assert!(inflight.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_callers_run_again() {
        let inflight = InflightRequests::new();
        let runs = AtomicUsize::new(0);

        for _ in 0..2 {
            let result = inflight
                .run("k", || async {
                    runs.fetch_add(1, Ordering::SeqCst);
                    Err(ApiError::Status(503))
                })
                .await;
            assert_eq!(result, Err(ApiError::Status(503)));
        }
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
