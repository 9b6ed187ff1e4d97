//! Ordered concurrent gather
//!
//! Every branch is spawned onto the runtime's worker pool through a
//! `JoinSet`, tagged with its input position. Results are slotted back by
//! position, so the output order is the input order no matter which branch
//! completes first.
//!
//! The join fails as soon as any branch fails. Siblings still in flight are
//! detached rather than aborted: they run to completion and their results are
//! dropped.

use std::future::Future;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{HolonetError, Result};

/// Run `branches` concurrently and collect their results in input order
///
/// An empty input completes immediately with an empty vector.
///
/// # Errors
///
/// Returns `HolonetError::Aggregate` wrapping the first failure observed
/// (by completion time), or a panicked branch as `TaskFailed`.
pub async fn gather<T, F>(branches: Vec<F>) -> Result<Vec<T>>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let total = branches.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let mut join_set = JoinSet::new();
    for (index, branch) in branches.into_iter().enumerate() {
        join_set.spawn(async move { (index, branch.await) });
    }

    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, Ok(value))) => {
                slots[index] = Some(value);
            }
            Ok((index, Err(err))) => {
                debug!("branch {} of {} failed: {}", index, total, err);
                join_set.detach_all();
                return Err(HolonetError::aggregate(total, err));
            }
            Err(join_err) => {
                join_set.detach_all();
                return Err(HolonetError::aggregate(
                    total,
                    HolonetError::TaskFailed(join_err.to_string()),
                ));
            }
        }
    }

    slots
        .into_iter()
        .map(|slot| {
            slot.ok_or_else(|| HolonetError::TaskFailed("branch finished without a result".into()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use holonet_core_interface::GatewayError;
    use std::time::Duration;

    fn delayed(value: u32, millis: u64) -> impl Future<Output = Result<u32>> + Send + 'static {
        async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            Ok(value)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_preserves_input_order() {
        // Later inputs complete first
        let branches = (1..=5).map(|n| delayed(n, 100 - n as u64 * 10)).collect();
        let values = gather(branches).await.unwrap();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let branches: Vec<std::future::Ready<Result<u32>>> = Vec::new();
        assert!(gather(branches).await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_wins() {
        let branches: Vec<std::pin::Pin<Box<dyn Future<Output = Result<u32>> + Send>>> = vec![
            Box::pin(delayed(1, 50)),
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err(HolonetError::Transport(GatewayError::Network("reset".into())))
            }),
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Err(HolonetError::Transport(GatewayError::Other("late".into())))
            }),
        ];

        match gather(branches).await {
            Err(HolonetError::Aggregate { branches, source }) => {
                assert_eq!(branches, 3);
                assert!(matches!(
                    *source,
                    HolonetError::Transport(GatewayError::Network(_))
                ));
            }
            other => panic!("expected aggregate failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panicking_branch_is_reported() {
        let branches: Vec<std::pin::Pin<Box<dyn Future<Output = Result<u32>> + Send>>> = vec![
            Box::pin(async { Ok(1) }),
            Box::pin(async {
                let missing: Option<u32> = None;
                Ok(missing.expect("boom"))
            }),
        ];

        let err = gather(branches).await.unwrap_err();
        assert!(matches!(err.root_cause(), HolonetError::TaskFailed(_)));
    }
}
