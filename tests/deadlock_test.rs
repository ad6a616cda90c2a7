use async_trait::async_trait;
use dining_host::chopstick::ring;
use dining_host::error::DiningError;
use dining_host::host::{Admission, HostActor, HostClient, Slot};
use dining_host::philosopher::{seat_ring, Philosopher};
use dining_host::reporter::{MealPhase, RecordingReporter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;
use tokio::time::timeout;

/// Wraps the real host and counts seats on its own, independent of the
/// host's bookkeeping.
struct CountingAdmission {
    inner: HostClient,
    seated: AtomicUsize,
    peak: AtomicUsize,
    grants: AtomicUsize,
}

impl CountingAdmission {
    fn new(inner: HostClient) -> Self {
        Self {
            inner,
            seated: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            grants: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Admission for CountingAdmission {
    async fn request_slot(&self, philosopher: usize) -> Result<Slot, DiningError> {
        let slot = self.inner.request_slot(philosopher).await?;
        let now = self.seated.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.grants.fetch_add(1, Ordering::SeqCst);
        Ok(slot)
    }

    async fn release_slot(&self, slot: Slot) -> Result<(), DiningError> {
        // Count down before the host can hand the seat to someone else.
        self.seated.fetch_sub(1, Ordering::SeqCst);
        self.inner.release_slot(slot).await
    }
}

/// Drives a ring by hand: `rounds` tasks per philosopher, no coordinator.
async fn run_ring(
    philosophers: Vec<Philosopher>,
    admission: Arc<CountingAdmission>,
    recorder: RecordingReporter,
    rounds: usize,
) {
    let philosophers: Vec<_> = philosophers.into_iter().map(Arc::new).collect();
    let mut handles = Vec::new();
    for _ in 0..rounds {
        for p in &philosophers {
            let p = p.clone();
            let admission = admission.clone();
            let recorder = recorder.clone();
            handles.push(tokio::spawn(async move {
                p.dine_once(admission.as_ref(), &recorder).await
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
}

/// Slot grants never exceed capacity, counted outside the host.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_instrumented_admission_never_exceeds_capacity() {
    for capacity in 1..=4 {
        let (actor, client) = HostActor::new(32, capacity);
        let host_handle = tokio::spawn(actor.run());
        let admission = Arc::new(CountingAdmission::new(client.clone()));
        let recorder = RecordingReporter::new(5).with_capacity(capacity);

        let sticks = ring(5);
        let philosophers = seat_ring(&sticks)
            .into_iter()
            .map(|p| p.with_meal_duration(Duration::from_millis(2)))
            .collect();

        timeout(
            Duration::from_secs(10),
            run_ring(philosophers, admission.clone(), recorder.clone(), 3),
        )
        .await
        .unwrap_or_else(|_| panic!("capacity {capacity} hung"));

        let peak = admission.peak.load(Ordering::SeqCst);
        assert!(peak <= capacity, "capacity {capacity}: {peak} seated at once");
        assert_eq!(admission.grants.load(Ordering::SeqCst), 15);
        assert_eq!(admission.seated.load(Ordering::SeqCst), 0);
        assert!(recorder.violations().is_empty(), "{:?}", recorder.violations());
        assert_eq!(recorder.total(MealPhase::Finishing), 15);

        drop(admission);
        drop(client);
        host_handle.await.unwrap();
    }
}

/// With every seat open, all five grabbing their left chopstick first
/// deadlocks. The barrier forces that interleaving.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_host_seating_whole_ring_can_deadlock() {
    let n = 5;
    let (actor, host) = HostActor::new(32, n);
    tokio::spawn(actor.run());

    let sticks = ring(n);
    let philosophers: Vec<_> = seat_ring(&sticks).into_iter().map(Arc::new).collect();
    let everyone_holds_left = Arc::new(Barrier::new(n));

    let mut handles = Vec::new();
    for p in &philosophers {
        let p = p.clone();
        let host = host.clone();
        let barrier = everyone_holds_left.clone();
        handles.push(tokio::spawn(async move {
            let slot = host.request_slot(p.id()).await?;
            let left = p.left().pick_up(p.id()).await;
            barrier.wait().await;
            let right = p.right().pick_up(p.id()).await;
            right.put_down();
            left.put_down();
            host.release_slot(slot).await
        }));
    }

    let all = async {
        for handle in &mut handles {
            let _ = handle.await;
        }
    };
    let outcome = timeout(Duration::from_millis(300), all).await;
    assert!(outcome.is_err(), "five seated philosophers should deadlock");

    // Everybody is stuck holding their left chopstick.
    for p in &philosophers {
        assert_eq!(p.left().holder(), Some(p.id()));
    }
    assert_eq!(host.stats().await.unwrap().seated, n);

    for handle in handles {
        handle.abort();
    }
}

/// Same left-first grab with a pause between chopsticks, but one seat short
/// of the ring: someone always has a free right chopstick.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_one_seat_short_survives_slow_grabs() {
    let n = 5;
    let (actor, host) = HostActor::new(32, n - 1);
    tokio::spawn(actor.run());

    let sticks = ring(n);
    let philosophers: Vec<_> = seat_ring(&sticks).into_iter().map(Arc::new).collect();

    let mut handles = Vec::new();
    for _ in 0..3 {
        for p in &philosophers {
            let p = p.clone();
            let host = host.clone();
            handles.push(tokio::spawn(async move {
                let slot = host.request_slot(p.id()).await?;
                let left = p.left().pick_up(p.id()).await;
                tokio::time::sleep(Duration::from_millis(5)).await;
                let right = p.right().pick_up(p.id()).await;
                right.put_down();
                left.put_down();
                host.release_slot(slot).await
            }));
        }
    }

    let all = async {
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
    };
    timeout(Duration::from_secs(10), all)
        .await
        .expect("capacity n-1 must not deadlock");

    let stats = host.stats().await.unwrap();
    assert_eq!(stats.granted, 15);
    assert!(stats.peak_seated <= n - 1);
    assert!(sticks.iter().all(|c| c.holder().is_none()));
}
