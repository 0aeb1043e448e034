//! Cross-thread tests for the admission gate and slot pool together.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use inflight_core::{FlightLimiter, SlotPool, SlotState, SubmittedSlot};

#[test]
fn test_one_release_wakes_exactly_one_waiter() {
    let limiter = Arc::new(FlightLimiter::new(1).unwrap());
    limiter.acquire();

    let admitted = Arc::new(AtomicUsize::new(0));
    let waiters: Vec<_> = (0..2)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            let admitted = Arc::clone(&admitted);
            thread::spawn(move || {
                limiter.acquire();
                admitted.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(30));
    assert_eq!(admitted.load(Ordering::SeqCst), 0);

    limiter.release();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(admitted.load(Ordering::SeqCst), 1);
    assert_eq!(limiter.available(), 0);

    limiter.release();
    for waiter in waiters {
        waiter.join().unwrap();
    }
    assert_eq!(admitted.load(Ordering::SeqCst), 2);
}

#[test]
fn test_producer_consumer_stress() {
    const FRAMES: usize = 3;
    const ROUNDS: u32 = 2_000;

    let limiter = Arc::new(FlightLimiter::new(FRAMES).unwrap());
    let pool = SlotPool::new(FRAMES, 8).unwrap();
    let (sender, receiver) = crossbeam_channel::unbounded::<SubmittedSlot>();

    let consumer = {
        let limiter = Arc::clone(&limiter);
        let pool = pool.clone();
        thread::spawn(move || {
            let mut expected = 0u32;
            for submitted in receiver {
                let value = u32::from_le_bytes(submitted.read()[..4].try_into().unwrap());
                assert_eq!(value, expected);
                expected += 1;

                assert!(pool.outstanding() <= FRAMES);
                pool.release(submitted.index());
                limiter.release();
            }
            expected
        })
    };

    let mut cursor = FRAMES - 1;
    for round in 0..ROUNDS {
        limiter.acquire();
        cursor = (cursor + 1) % FRAMES;
        pool.wait_until_free(cursor);

        let mut writer = pool.acquire(cursor);
        writer[..4].copy_from_slice(&round.to_le_bytes());
        sender.send(writer.submit()).unwrap();
    }
    drop(sender);

    assert_eq!(consumer.join().unwrap(), ROUNDS);
    limiter.wait_idle();
    assert!((0..FRAMES).all(|i| pool.state(i) == SlotState::Free));
}
