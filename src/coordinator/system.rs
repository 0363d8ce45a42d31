//! Coordinator: the single entry point for HTTP and MQTT ingress.
//!
//! Lock discipline:
//! - `shared` (state + store) is held for every read-modify-persist, so no
//!   partial update is ever observed or written.
//! - Each axis driver has its own lock; a second move on the same axis waits
//!   for the first to finish. Different axes move independently.
//! - `shared` is never held while acquiring an axis lock. An axis lock may be
//!   held while briefly taking `shared` to read limits.
//! - Angle reads take no lock; they see the last angle written, even in the
//!   middle of a move.

use std::sync::{Mutex, MutexGuard, PoisonError};

use embedded_hal::delay::DelayNs;
use tracing::{debug, error, info, warn};

use crate::config::{AppState, AxisLimits, LimitUpdate};
use crate::error::{Error, ErrorKind, LocationError, Result, ServoError, StateError};
use crate::location::{Location, LocationRegistry, HOME};
use crate::motion::AxisDriver;
use crate::servo::{Axis, AxisReadout, ServoAxis};
use crate::store::StateStore;

use super::command::{Command, Nudge};
use super::notify::ReregisterSignal;

/// Outcome of an operation addressed to a named location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationStatus {
    /// The location existed and the operation ran.
    Found,
    /// No such location; nothing happened.
    NotFound,
}

impl LocationStatus {
    /// Whether the location existed.
    #[inline]
    pub fn is_found(self) -> bool {
        self == LocationStatus::Found
    }

    /// Error kind to report for this status, if any.
    pub fn error_kind(self) -> Option<ErrorKind> {
        match self {
            LocationStatus::Found => None,
            LocationStatus::NotFound => Some(ErrorKind::LocationNotFound),
        }
    }

    /// Wire value, `"ok"` or `"not found"`.
    pub fn as_str(self) -> &'static str {
        match self {
            LocationStatus::Found => "ok",
            LocationStatus::NotFound => "not found",
        }
    }
}

/// State plus the store it is persisted to.
struct Shared {
    state: AppState,
    store: Box<dyn StateStore>,
}

/// Serializes motion and state mutation for a pan/tilt head.
///
/// Generic over:
/// - `S`: servo type for both axes (must implement [`ServoAxis`])
/// - `D`: delay provider pacing steps (must implement [`DelayNs`])
///
/// Share between threads with `Arc<Coordinator<S, D>>`.
pub struct Coordinator<S, D> {
    shared: Mutex<Shared>,
    pan: Mutex<AxisDriver<S, D>>,
    tilt: Mutex<AxisDriver<S, D>>,
    pan_readout: AxisReadout,
    tilt_readout: AxisReadout,
    reregister: Option<ReregisterSignal>,
}

impl<S, D> Coordinator<S, D>
where
    S: ServoAxis,
    D: DelayNs,
{
    /// Create a coordinator over an already loaded state.
    pub fn new(
        state: AppState,
        store: Box<dyn StateStore>,
        pan: AxisDriver<S, D>,
        tilt: AxisDriver<S, D>,
    ) -> Self {
        Self {
            shared: Mutex::new(Shared { state, store }),
            pan_readout: pan.readout(),
            tilt_readout: tilt.readout(),
            pan: Mutex::new(pan),
            tilt: Mutex::new(tilt),
            reregister: None,
        }
    }

    /// Load state from `store` and create a coordinator.
    ///
    /// When the store is empty the default state is saved and used.
    ///
    /// # Errors
    ///
    /// Returns an error if saved state is invalid or defaults cannot be saved.
    pub fn open(
        store: Box<dyn StateStore>,
        pan: AxisDriver<S, D>,
        tilt: AxisDriver<S, D>,
    ) -> Result<Self> {
        let state = match store.load()? {
            Some(state) => state,
            None => {
                let state = AppState::default();
                store.save(&state)?;
                state
            }
        };
        debug!(locations = state.locations.len(), "state ready");
        Ok(Self::new(state, store, pan, tilt))
    }

    /// Raise `signal` after every persisted mutation.
    pub fn with_reregister_signal(mut self, signal: ReregisterSignal) -> Self {
        self.reregister = Some(signal);
        self
    }

    // ------------------------------------------------------------------
    // Motion
    // ------------------------------------------------------------------

    /// Move one axis, absolutely or relative to its current angle.
    ///
    /// Returns the angle moved to after clamping.
    ///
    /// # Errors
    ///
    /// Returns an error if the current angle is unknown or the servo fails.
    pub fn move_axis(&self, axis: Axis, amount: i32, relative: bool) -> Result<i32> {
        let mut driver = self.lock_axis(axis);
        let target = if relative {
            amount.saturating_add(driver.current_angle()?)
        } else {
            amount
        };
        let limits = self.limits(axis);
        debug!(%axis, amount, relative, target, "move axis");
        driver.move_to(target, &limits)
    }

    /// Move pan then tilt to a saved location.
    ///
    /// Each coordinate is clamped against the limits in force now, not those
    /// at save time.
    ///
    /// # Errors
    ///
    /// Returns an error if a servo fails. An unknown name is not an error.
    pub fn move_to_location(&self, name: &str) -> Result<LocationStatus> {
        let Some(location) = self.lock_shared().state.locations.get(name).copied() else {
            debug!(name, "requested invalid location");
            return Ok(LocationStatus::NotFound);
        };

        info!(name, pan = location.pan, tilt = location.tilt, "move to location");
        self.move_axis(Axis::Pan, location.pan, false)?;
        self.move_axis(Axis::Tilt, location.tilt, false)?;
        Ok(LocationStatus::Found)
    }

    /// Apply a fixed relative move. Returns the new angle of the moved axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the current angle is unknown or the servo fails.
    pub fn nudge(&self, nudge: Nudge) -> Result<i32> {
        self.move_axis(nudge.axis(), nudge.delta(), true)
    }

    /// Tilt down by two degrees.
    ///
    /// # Errors
    ///
    /// See [`Coordinator::nudge`].
    pub fn move_down(&self) -> Result<i32> {
        self.nudge(Nudge::Down)
    }

    /// Tilt up by two degrees.
    ///
    /// # Errors
    ///
    /// See [`Coordinator::nudge`].
    pub fn move_up(&self) -> Result<i32> {
        self.nudge(Nudge::Up)
    }

    /// Pan left by two degrees.
    ///
    /// # Errors
    ///
    /// See [`Coordinator::nudge`].
    pub fn move_left(&self) -> Result<i32> {
        self.nudge(Nudge::Left)
    }

    /// Pan right by two degrees.
    ///
    /// # Errors
    ///
    /// See [`Coordinator::nudge`].
    pub fn move_right(&self) -> Result<i32> {
        self.nudge(Nudge::Right)
    }

    /// Bring both servos to the `home` location at startup.
    ///
    /// Sets each servo's actuation range to its axis maximum. A servo with no
    /// known angle (after power loss) is first set straight to the home
    /// coordinate without stepping.
    ///
    /// # Errors
    ///
    /// Returns an error if `home` is missing or a servo fails.
    pub fn home_servos(&self) -> Result<()> {
        let (home, limits) = {
            let shared = self.lock_shared();
            let home = shared.state.home().ok_or(StateError::HomeMissing)?;
            (home, shared.state.position)
        };

        for axis in Axis::ALL {
            let mut driver = self.lock_axis(axis);
            driver.set_actuation_range(limits.get(axis).max);
            if !driver.has_angle() {
                driver.set_initial_angle(coordinate(&home, axis))?;
            }
        }

        self.move_to_location(HOME)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Current angle of `axis` in whole degrees.
    ///
    /// Does not wait for an in-flight move; returns the last angle written.
    ///
    /// # Errors
    ///
    /// Returns an error if the angle is unknown.
    pub fn current_angle(&self, axis: Axis) -> Result<i32> {
        self.readout(axis)
            .angle()
            .ok_or_else(|| ServoError::AngleUnknown(axis).into())
    }

    /// Actuation range configured on the servo of `axis`, once homed.
    pub fn actuation_range(&self, axis: Axis) -> Option<i32> {
        self.readout(axis).actuation_range()
    }

    /// Snapshot of the saved locations.
    pub fn list_locations(&self) -> LocationRegistry {
        self.lock_shared().state.locations.clone()
    }

    /// Current limits of `axis`.
    pub fn limits(&self, axis: Axis) -> AxisLimits {
        *self.lock_shared().state.limits(axis)
    }

    /// Snapshot of the whole managed state.
    pub fn state(&self) -> AppState {
        self.lock_shared().state.clone()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Save the current pan/tilt angles under `name`, replacing any previous
    /// location of that name.
    ///
    /// # Errors
    ///
    /// Returns an error if an angle is unknown, the name is invalid, the
    /// registry is full, or persisting fails.
    pub fn save_location(&self, name: &str) -> Result<Location> {
        let location = Location::new(
            self.current_angle(Axis::Pan)?,
            self.current_angle(Axis::Tilt)?,
        );

        self.mutate(|state| {
            state.locations.insert(name, location)?;
            Ok(())
        })?;

        info!(name, pan = location.pan, tilt = location.tilt, "saved location");
        Ok(location)
    }

    /// Delete a saved location.
    ///
    /// # Errors
    ///
    /// Returns an error for the reserved `home` location or if persisting
    /// fails. An unknown name is not an error.
    pub fn delete_location(&self, name: &str) -> Result<LocationStatus> {
        if name == HOME {
            return Err(LocationError::Reserved(HOME).into());
        }

        let removed = self.mutate(|state| Ok(state.locations.remove(name)))?;
        match removed {
            Some(_) => {
                info!(name, "deleted location");
                Ok(LocationStatus::Found)
            }
            None => {
                debug!(name, "delete of unknown location");
                Ok(LocationStatus::NotFound)
            }
        }
    }

    /// Change one limit of `axis`.
    ///
    /// A min/max update without a value captures the axis's current angle.
    /// Returns the new limits.
    ///
    /// The servo's actuation range is only set by [`Coordinator::home_servos`].
    /// A `max` raised beyond it is accepted with a warning; moves past the
    /// old range then fail part way until the next homing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLimits`] if the result would have `min > max`,
    /// `step == 0` or a negative sleep; the stored limits are left unchanged.
    /// Also fails if a needed angle is unknown or persisting fails.
    pub fn set_limit(&self, axis: Axis, update: LimitUpdate) -> Result<AxisLimits> {
        let current = if update.captures_position() {
            Some(self.current_angle(axis)?)
        } else {
            None
        };

        let limits = self.mutate(|state| {
            let next = state.limits(axis).with_update(update, current);
            if !next.is_valid() {
                return Err(Error::InvalidLimits {
                    axis,
                    min: next.min,
                    max: next.max,
                    step: next.step,
                    sleep: next.sleep.value(),
                });
            }
            *state.position.get_mut(axis) = next;
            Ok(next)
        })?;

        info!(%axis, ?update, ?limits, "limits changed");
        if let Some(range) = self.actuation_range(axis).filter(|&r| limits.max > r) {
            warn!(
                %axis,
                max = limits.max,
                actuation_range = range,
                "max beyond servo actuation range until next homing"
            );
        }
        Ok(limits)
    }

    // ------------------------------------------------------------------
    // MQTT boundary
    // ------------------------------------------------------------------

    /// Execute a decoded command.
    ///
    /// # Errors
    ///
    /// Returns an error if the move fails.
    pub fn dispatch(&self, command: &Command) -> Result<()> {
        match command {
            Command::Nudge(nudge) => {
                self.nudge(*nudge)?;
            }
            Command::Location(name) => {
                if !self.move_to_location(name)?.is_found() {
                    warn!(name = name.as_str(), "command for unknown location ignored");
                }
            }
        }
        Ok(())
    }

    /// Decode and execute a raw MQTT payload.
    ///
    /// Pub/sub has no negative acknowledgement, so failures are logged and
    /// the message is dropped.
    pub fn handle_message(&self, payload: &[u8]) {
        let result = Command::decode(payload).and_then(|command| {
            debug!(?command, "mqtt command");
            self.dispatch(&command)
        });

        if let Err(e) = result {
            error!(
                error = %e,
                kind = e.kind().as_str(),
                payload = %String::from_utf8_lossy(payload),
                "dropping mqtt message"
            );
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Apply `f` to a copy of the state, persist it, then publish it.
    ///
    /// The whole sequence runs under the state lock. If `f` or the save
    /// fails, the in-memory state is untouched and no signal is raised. A
    /// change that leaves the state equal is neither saved nor signalled.
    fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut AppState) -> Result<T>,
    {
        let (out, changed) = {
            let mut shared = self.lock_shared();
            let mut next = shared.state.clone();
            let out = f(&mut next)?;
            let changed = next != shared.state;
            if changed {
                shared.store.save(&next)?;
                shared.state = next;
            }
            (out, changed)
        };

        if changed {
            if let Some(signal) = &self.reregister {
                signal.signal();
            }
        }
        Ok(out)
    }

    fn lock_shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn readout(&self, axis: Axis) -> &AxisReadout {
        match axis {
            Axis::Pan => &self.pan_readout,
            Axis::Tilt => &self.tilt_readout,
        }
    }

    fn lock_axis(&self, axis: Axis) -> MutexGuard<'_, AxisDriver<S, D>> {
        let driver = match axis {
            Axis::Pan => &self.pan,
            Axis::Tilt => &self.tilt,
        };
        driver.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn coordinate(location: &Location, axis: Axis) -> i32 {
    match axis {
        Axis::Pan => location.pan,
        Axis::Tilt => location.tilt,
    }
}
