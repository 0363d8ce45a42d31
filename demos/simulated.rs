//! Simulated pan/tilt head.
//!
//! Drives the coordinator against in-memory PWM channels: homes the servos,
//! moves, saves a location, and feeds it MQTT payloads, with re-registration
//! running on a background worker.
//!
//! Run with `cargo run --example simulated`. Set `PITILT_CONFIG_FILE` to use a
//! real configuration and `PITILT_STATE_FILE` to keep state between runs.

use std::sync::{Arc, Mutex, Weak};

use pitilt::config::{config_file_path, load_config, state_file_path, STATE_FILE_ENV};
use pitilt::coordinator::{reregister_channel, DEFAULT_DEBOUNCE};
use pitilt::{
    Axis, AxisDriver, Command, Coordinator, JsonStateStore, LimitUpdate, Nudge, PwmServo, Seconds,
    StdDelay,
};

/// PWM channel that remembers the last duty cycle written.
#[derive(Clone, Default)]
struct SimChannel {
    duty: Arc<Mutex<u16>>,
}

impl embedded_hal::pwm::ErrorType for SimChannel {
    type Error = core::convert::Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for SimChannel {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        *self.duty.lock().unwrap() = duty;
        Ok(())
    }
}

type Head = Coordinator<PwmServo<SimChannel>, StdDelay>;

fn main() {
    println!("=== Simulated Pan/Tilt Example ===\n");

    let config = match load_config(config_file_path()) {
        Ok(config) => Some(config),
        Err(e) => {
            println!("No usable configuration ({e}), running without MQTT\n");
            None
        }
    };
    pitilt::logging::init(config.as_ref().map_or(true, |c| c.pitilt.debug));

    // Keep demo state out of /var/lib unless asked.
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let state_path = if std::env::var_os(STATE_FILE_ENV).is_some() {
        state_file_path()
    } else {
        scratch.path().join("state.json")
    };
    println!("State file: {}", state_path.display());

    // Create simulated hardware
    let pan_channel = SimChannel::default();
    let tilt_channel = SimChannel::default();
    let pan = AxisDriver::new(Axis::Pan, PwmServo::new(Axis::Pan, pan_channel.clone()), StdDelay);
    let tilt = AxisDriver::new(
        Axis::Tilt,
        PwmServo::new(Axis::Tilt, tilt_channel.clone()),
        StdDelay,
    );

    let (signal, listener) = reregister_channel();
    let head: Arc<Head> = Arc::new(
        Coordinator::open(Box::new(JsonStateStore::new(&state_path)), pan, tilt)
            .expect("Failed to open state")
            .with_reregister_signal(signal),
    );

    // Announce one button per nudge and per location on every change.
    let weak: Weak<Head> = Arc::downgrade(&head);
    let topic = config
        .as_ref()
        .filter(|c| c.mqtt.enabled)
        .map(|c| c.mqtt.command_topic())
        .unwrap_or_else(|| "pitilt/demo/command".into());
    let worker = listener
        .spawn(DEFAULT_DEBOUNCE, move || {
            let Some(head) = weak.upgrade() else {
                return Ok(());
            };
            let mut buttons: Vec<Command> = Nudge::ALL.into_iter().map(Command::Nudge).collect();
            buttons.extend(
                head.list_locations()
                    .names()
                    .map(|name| Command::Location(name.to_string())),
            );
            for button in buttons {
                println!("  discovery: {topic} <- {}", button.to_payload());
            }
            Ok(())
        })
        .expect("Failed to spawn re-registration worker");

    // Speed things up for the demo.
    for axis in Axis::ALL {
        head.set_limit(axis, LimitUpdate::Sleep(Seconds(0.005)))
            .expect("Failed to set sleep");
    }

    head.home_servos().expect("Homing failed");
    println!(
        "Homed at pan={} tilt={} (pan duty {})",
        head.current_angle(Axis::Pan).unwrap(),
        head.current_angle(Axis::Tilt).unwrap(),
        pan_channel.duty.lock().unwrap()
    );

    let reached = head.move_axis(Axis::Pan, 120, false).expect("Move failed");
    println!("Pan moved to {reached}");
    head.move_axis(Axis::Tilt, 20, true).expect("Move failed");
    let door = head.save_location("door").expect("Save failed");
    println!("Saved 'door' at pan={} tilt={}", door.pan, door.tilt);

    head.handle_message(br#"{"command": "location", "argument": "home"}"#);
    head.handle_message(Command::Nudge(Nudge::Left).to_payload().as_bytes());
    head.handle_message(b"garbage");
    println!(
        "After MQTT commands: pan={} tilt={} (tilt duty {})",
        head.current_angle(Axis::Pan).unwrap(),
        head.current_angle(Axis::Tilt).unwrap(),
        tilt_channel.duty.lock().unwrap()
    );

    let status = head.move_to_location("door").expect("Move failed");
    println!("Go to 'door': {}", status.as_str());
    let status = head.delete_location("attic").expect("Delete failed");
    println!("Delete 'attic': {}", status.as_str());

    std::thread::sleep(DEFAULT_DEBOUNCE * 2);
    drop(head);
    worker.join().expect("Worker panicked");

    println!("\n=== Example Complete ===");
}
