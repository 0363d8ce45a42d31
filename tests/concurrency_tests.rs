//! Concurrent access to one coordinator from many ingress threads.

mod common;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread;

use common::{rig, RecordingServo};
use embedded_hal::delay::DelayNs;
use pitilt::{
    AppState, Axis, AxisDriver, Coordinator, LimitUpdate, Location, MemoryStateStore, Seconds,
};

const WRITERS: usize = 50;

fn seeded_state() -> AppState {
    let mut state = AppState::default();
    state.position.pan.sleep = Seconds(0.0);
    state.position.tilt.sleep = Seconds(0.0);
    for i in (0..WRITERS).filter(|i| i % 3 == 1) {
        state
            .locations
            .insert(&format!("old_{i}"), Location::new(i as i32, 10))
            .unwrap();
    }
    state
}

#[test]
fn test_concurrent_writers_lose_no_updates() {
    let r = rig(seeded_state(), RecordingServo::at(100), RecordingServo::at(30));
    let head = &r.head;

    thread::scope(|s| {
        for i in 0..WRITERS {
            s.spawn(move || match i % 3 {
                0 => {
                    head.save_location(&format!("new_{i}")).unwrap();
                }
                1 => {
                    assert!(head.delete_location(&format!("old_{i}")).unwrap().is_found());
                }
                _ => {
                    head.set_limit(Axis::Tilt, LimitUpdate::Step(5)).unwrap();
                }
            });
        }
    });

    let locations = head.list_locations();
    let mut names: Vec<&str> = locations.names().collect();
    names.sort_unstable();

    let mut expected: Vec<String> = (0..WRITERS)
        .filter(|i| i % 3 == 0)
        .map(|i| format!("new_{i}"))
        .collect();
    expected.push("home".to_string());
    expected.sort_unstable();

    assert_eq!(names, expected);
    assert_eq!(head.limits(Axis::Tilt).step, 5);
    assert!(locations.iter().all(|(name, loc)| name == "home" || *loc == Location::new(100, 30)));

    // What was persisted last is what is in memory.
    assert_eq!(r.store.saved().unwrap(), head.state());
}

#[test]
fn test_moves_and_mutations_interleave_safely() {
    let r = rig(seeded_state(), RecordingServo::at(100), RecordingServo::at(30));
    let head = &r.head;

    thread::scope(|s| {
        for i in 0..WRITERS {
            s.spawn(move || match i % 4 {
                0 => {
                    head.move_axis(Axis::Pan, (i as i32) * 5, false).unwrap();
                }
                1 => {
                    head.move_up().unwrap();
                }
                2 => {
                    head.save_location(&format!("spot_{i}")).unwrap();
                }
                _ => {
                    head.set_limit(Axis::Pan, LimitUpdate::Max(Some(200))).unwrap();
                }
            });
        }
    });

    let pan = head.current_angle(Axis::Pan).unwrap();
    let tilt = head.current_angle(Axis::Tilt).unwrap();
    assert!((0..=270).contains(&pan));
    assert!((0..=135).contains(&tilt));
    assert_eq!(head.limits(Axis::Pan).max, 200);

    // Every saved spot holds angles the servos actually passed through.
    let pan_writes = r.pan.writes();
    for (name, loc) in head.list_locations().iter() {
        if name.starts_with("spot_") && loc.pan != 100 {
            assert!(pan_writes.contains(&loc.pan), "{name}: {loc:?}");
        }
    }

    assert_eq!(head.list_locations().names().filter(|n| n.starts_with("spot_")).count(), 12);
}

#[test]
fn test_moves_on_one_axis_do_not_interleave() {
    let r = rig(seeded_state(), RecordingServo::at(0), RecordingServo::at(30));
    let head = &r.head;
    let targets = [40, 80, 120, 160];

    thread::scope(|s| {
        for target in targets {
            s.spawn(move || head.move_axis(Axis::Pan, target, false).unwrap());
        }
    });

    // Serialized moves each start where the previous one ended, so the
    // combined trace never jumps by more than one step.
    let writes = r.pan.writes();
    assert_eq!(writes.first(), Some(&0));
    for pair in writes.windows(2) {
        assert!((pair[1] - pair[0]).abs() <= 2, "{pair:?}");
    }
    assert!(targets.contains(&head.current_angle(Axis::Pan).unwrap()));
}

/// Delay that reports each pause and holds it until released.
///
/// Once the release side is dropped, pauses return immediately.
struct GateDelay {
    paused: Option<Sender<()>>,
    release: Option<Mutex<Receiver<()>>>,
}

impl GateDelay {
    fn gated() -> (Self, Receiver<()>, Sender<()>) {
        let (paused_tx, paused_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let delay = Self {
            paused: Some(paused_tx),
            release: Some(Mutex::new(release_rx)),
        };
        (delay, paused_rx, release_tx)
    }

    fn open() -> Self {
        Self {
            paused: None,
            release: None,
        }
    }
}

impl DelayNs for GateDelay {
    fn delay_ns(&mut self, _ns: u32) {
        if let Some(paused) = &self.paused {
            let _ = paused.send(());
        }
        if let Some(release) = &self.release {
            let _ = release.lock().unwrap().recv();
        }
    }
}

#[test]
fn test_angle_readable_during_move() {
    let mut state = AppState::default();
    state.position.pan.sleep = Seconds(0.001);
    let (delay, paused, release) = GateDelay::gated();
    let pan = RecordingServo::at(0);
    let head = Coordinator::new(
        state,
        Box::new(MemoryStateStore::new()),
        AxisDriver::new(Axis::Pan, pan.clone(), delay),
        AxisDriver::new(Axis::Tilt, RecordingServo::at(30), GateDelay::open()),
    );

    thread::scope(|s| {
        let mover = s.spawn(|| head.move_axis(Axis::Pan, 10, false).unwrap());

        // The move is parked after its first write.
        paused.recv().unwrap();
        assert_eq!(head.current_angle(Axis::Pan).unwrap(), 0);

        release.send(()).unwrap();
        paused.recv().unwrap();
        assert_eq!(head.current_angle(Axis::Pan).unwrap(), 2);
        assert_eq!(head.current_angle(Axis::Tilt).unwrap(), 30);

        drop(release);
        assert_eq!(mover.join().unwrap(), 10);
    });

    assert_eq!(head.current_angle(Axis::Pan).unwrap(), 10);
    assert_eq!(pan.writes(), vec![0, 2, 4, 6, 8, 10]);
}
