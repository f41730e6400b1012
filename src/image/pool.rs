//! Fixed-size worker pool for per-file checks.

use anyhow::Result;
use crossbeam::channel;

/// Run `job` over `items` on `workers` threads.
///
/// `on_result` is called on the calling thread as each job completes, in
/// completion order. Jobs share nothing but `job` itself.
pub fn run_pool<T, R, F, C>(items: Vec<T>, workers: usize, job: F, mut on_result: C) -> Result<()>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
    C: FnMut(R),
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("docsweep-worker-{i}"))
        .build()?;

    let (tx, rx) = channel::unbounded::<R>();
    let job = &job;

    pool.in_place_scope(|scope| {
        for item in items {
            let tx = tx.clone();
            scope.spawn(move |_| {
                // receiver outlives every sender, so send cannot fail
                let _ = tx.send(job(item));
            });
        }
        drop(tx);

        for result in rx.iter() {
            on_result(result);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_all_results_collected() {
        let mut results = Vec::new();
        run_pool((1..=20).collect(), 4, |n: u32| n * 2, |r| results.push(r)).unwrap();

        results.sort_unstable();
        assert_eq!(results, (1..=20).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_bounded_concurrency() {
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        run_pool(
            (0..16).collect::<Vec<u32>>(),
            3,
            |_| {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(10));
                active.fetch_sub(1, Ordering::SeqCst);
            },
            |_| {},
        )
        .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn test_failures_do_not_stop_siblings() {
        let mut ok = 0;
        let mut failed = 0;
        run_pool(
            (0..10).collect::<Vec<u32>>(),
            2,
            |n| if n % 3 == 0 { Err(n) } else { Ok(n) },
            |r: Result<u32, u32>| match r {
                Ok(_) => ok += 1,
                Err(_) => failed += 1,
            },
        )
        .unwrap();
        assert_eq!(ok, 6);
        assert_eq!(failed, 4);
    }

    #[test]
    fn test_empty_input() {
        let mut calls = 0;
        run_pool(Vec::<u32>::new(), 4, |n| n, |_| calls += 1).unwrap();
        assert_eq!(calls, 0);
    }
}
