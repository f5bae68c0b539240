//! All-or-nothing fan-out/fan-in.
//!
//! [`join_all_or_nothing`] spawns every future onto a [`JoinSet`] and waits
//! for all of them. Results come back in input order regardless of
//! completion order. The first failure (task error, panic or cancellation)
//! aborts the remaining tasks and is returned; successes collected up to that
//! point are dropped, never returned partially.

use std::future::Future;

use tokio::task::{JoinError, JoinSet};

pub async fn join_all_or_nothing<T, E, F>(tasks: impl IntoIterator<Item = F>) -> Result<Vec<T>, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: From<JoinError> + Send + 'static,
{
    let mut set = JoinSet::new();
    let mut len = 0usize;
    for (index, task) in tasks.into_iter().enumerate() {
        set.spawn(async move { (index, task.await) });
        len += 1;
    }

    let mut slots: Vec<Option<T>> = (0..len).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        let (index, result) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                set.abort_all();
                return Err(E::from(e));
            }
        };
        match result {
            Ok(value) => slots[index] = Some(value),
            Err(e) => {
                set.abort_all();
                return Err(e);
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::source::SourceError;

    #[tokio::test(start_paused = true)]
    async fn results_keep_input_order() {
        let delays = [30u64, 10, 20];
        let tasks = delays.iter().enumerate().map(|(i, &ms)| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, SourceError>(i)
        });
        let out = join_all_or_nothing(tasks).await.unwrap();
        assert_eq!(out, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn empty_input_is_ok() {
        let tasks: Vec<std::future::Ready<Result<u8, SourceError>>> = vec![];
        assert_eq!(join_all_or_nothing(tasks).await.unwrap(), Vec::<u8>::new());
    }

    #[tokio::test(start_paused = true)]
    async fn first_failure_aborts_the_rest() {
        let finished = Arc::new(AtomicBool::new(false));
        let completed = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for i in 0..3u64 {
            let finished = finished.clone();
            let completed = completed.clone();
            tasks.push(Box::pin(async move {
                match i {
                    0 => {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        completed.fetch_add(1, Ordering::SeqCst);
                        Ok(i)
                    }
                    1 => {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        Err(SourceError::Timeout)
                    }
                    _ => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        finished.store(true, Ordering::SeqCst);
                        Ok(i)
                    }
                }
            })
                as std::pin::Pin<Box<dyn Future<Output = Result<u64, SourceError>> + Send>>);
        }

        let err = join_all_or_nothing(tasks).await.unwrap_err();
        assert_eq!(err, SourceError::Timeout);
        assert_eq!(completed.load(Ordering::SeqCst), 1);

        // The slow task was aborted and never completes.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panicking_task_becomes_error() {
        let tasks = (0..2).map(|i| async move {
            if i == 1 {
                panic!("boom");
            }
            Ok::<_, SourceError>(i)
        });
        let err = join_all_or_nothing(tasks).await.unwrap_err();
        assert!(matches!(err, SourceError::Task(_)));
    }
}
