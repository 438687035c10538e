//! Concurrency tests for the log store: parallel appends, readers racing
//! writers, and the sweeper running against live traffic.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use logtide_core::{
    shared_store, LogStore, ManualClock, RetentionConfig, RetentionSweeper, TimeRange,
};
use tokio_util::sync::CancellationToken;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 17, 10, 0, 0).unwrap()
}

#[test]
fn concurrent_appends_are_neither_lost_nor_duplicated() {
    const THREADS: usize = 16;
    const PER_THREAD: usize = 500;

    let store = shared_store();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    let ts = base() + ChronoDuration::milliseconds((i * THREADS + t) as i64);
                    store
                        .append("stress", ts, format!("{t}-{i}"))
                        .expect("append should succeed");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let results = store
        .range_query("stress", base(), base() + ChronoDuration::hours(1))
        .unwrap();

    assert_eq!(results.len(), THREADS * PER_THREAD);

    let unique: HashSet<&str> = results.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);

    assert!(results.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn concurrent_appends_across_services() {
    const SERVICES: usize = 8;
    const PER_SERVICE: usize = 250;

    let store = shared_store();

    thread::scope(|s| {
        for svc in 0..SERVICES {
            let store = &store;
            s.spawn(move || {
                for i in 0..PER_SERVICE {
                    let ts = base() + ChronoDuration::seconds(i as i64);
                    store.append(&format!("svc-{svc}"), ts, "x").unwrap();
                }
            });
        }
    });

    assert_eq!(store.service_count(), SERVICES);
    for svc in 0..SERVICES {
        assert_eq!(store.service_len(&format!("svc-{svc}")), PER_SERVICE);
    }
}

#[test]
fn readers_only_see_whole_entries_during_writes() {
    const WRITES: usize = 2_000;

    let store = Arc::new(LogStore::new());

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..WRITES {
                let ts = base() + ChronoDuration::seconds(i as i64);
                store.append("auth", ts, format!("msg-{i}")).unwrap();
            }
        });

        for _ in 0..4 {
            s.spawn(|| {
                let mut last_seen = 0;
                while last_seen < WRITES {
                    let snapshot = store.query("auth", TimeRange::all());
                    // A snapshot never shrinks while only appends run, and
                    // entries appear in the same order they were written.
                    assert!(snapshot.len() >= last_seen);
                    for (i, entry) in snapshot.iter().enumerate() {
                        assert_eq!(entry.message, format!("msg-{i}"));
                    }
                    last_seen = snapshot.len();
                }
            });
        }
    });
}

#[test]
fn expire_racing_appends_never_drops_fresh_entries() {
    const WRITES: usize = 1_000;

    let store = shared_store();
    let cutoff = base();

    for i in 0..100 {
        store
            .append("auth", cutoff - ChronoDuration::seconds(i + 1), "stale")
            .unwrap();
    }

    let removed = thread::scope(|s| {
        s.spawn(|| {
            for i in 0..WRITES {
                let ts = cutoff + ChronoDuration::seconds(i as i64);
                store.append("auth", ts, "fresh").unwrap();
            }
        });

        s.spawn(|| {
            let mut removed = 0;
            for _ in 0..50 {
                removed += store.expire(cutoff);
                thread::yield_now();
            }
            removed
        })
        .join()
        .unwrap()
    });

    assert_eq!(removed, 100);
    assert_eq!(store.service_len("auth"), WRITES);
    let results = store.query("auth", TimeRange::all());
    assert!(results.iter().all(|e| e.message == "fresh"));
}

#[test]
fn expire_pruning_leaves_no_empty_services() {
    let store = shared_store();

    thread::scope(|s| {
        s.spawn(|| {
            for round in 0..500 {
                let ts = base() + ChronoDuration::seconds(round);
                store.append("ephemeral", ts, "short-lived").unwrap();
                store.expire(ts + ChronoDuration::seconds(1));
            }
        });

        s.spawn(|| {
            for _ in 0..2_000 {
                // At most one entry lives between an append and the next expire.
                assert!(store.service_len("ephemeral") <= 1);
                let results = store.query("ephemeral", TimeRange::all());
                assert!(results.len() <= 1);
            }
        });
    });

    assert!(store.is_empty());
    assert_eq!(store.service_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sweeper_runs_alongside_request_traffic() {
    let store = shared_store();
    let clock = ManualClock::new(base());
    let config = RetentionConfig::new()
        .with_interval(Duration::from_millis(5))
        .with_retention(Duration::from_secs(60));

    for i in 0..50 {
        store
            .append("auth", base() - ChronoDuration::minutes(10 + i), "stale")
            .unwrap();
    }

    let sweeper = RetentionSweeper::new(store.clone(), Arc::new(clock), config).unwrap();
    let token = CancellationToken::new();
    let handle = sweeper.spawn(token.clone());

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for i in 0..200 {
                    let ts = base() + ChronoDuration::milliseconds(i * 4 + w);
                    store.append("auth", ts, format!("live-{w}-{i}")).unwrap();
                    if i % 20 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.await.unwrap();
    }

    while handle.stats().sweeps_completed == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    token.cancel();
    let stats = handle.shutdown().await;

    assert_eq!(stats.failed_sweeps, 0);
    assert_eq!(stats.entries_removed, 50);

    let live = store.query("auth", TimeRange::all());
    assert_eq!(live.len(), 800);
    assert!(live.iter().all(|e| e.message.starts_with("live-")));
}
