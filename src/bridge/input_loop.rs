//! # Input Loop Module
//!
//! Polls the controller and turns its state into throttled robot commands.
//!
//! ## States
//!
//! | State | Meaning |
//! |-------|---------|
//! | Idle | No device bound yet |
//! | Active | Polling the bound device |
//! | Terminated | Quit requested or device lost |
//!
//! Binding fails with [`BridgeError::NoController`] when the provider lists
//! no device; the loop then never polls.
//!
//! ## Tick
//!
//! 1. Drain lifecycle events; quit or loss of the bound device terminates.
//! 2. Capture a [`ControllerSnapshot`](crate::controller::ControllerSnapshot).
//! 3. Send the stick direction if it changed, then cool down.
//! 4. Send the action of every held button, cooling down after each.
//! 5. Store the gait selected on the d-pad, then settle.
//!
//! Every Robot Link call is bounded by the link timeout. A failed or timed
//! out call is logged and the loop carries on; the cool-down still applies.
//!
//! A quit signal only interrupts polling and settle pauses. A send in flight
//! and its cool-down always run to completion, and [`InputLoop::shutdown`]
//! waits out any pending cool-down before releasing the link.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::throttle::DispatchThrottle;
use crate::config::Config;
use crate::controller::gait::select_gait;
use crate::controller::{ActionCommand, CommandDebouncer, ControllerState, Direction};
use crate::error::{BridgeError, Result};
use crate::input::{capture_snapshot, DeviceHandle, InputProvider, LifecycleEvent};
use crate::link::RobotLink;

/// Lifecycle state of the input loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Active(DeviceHandle),
    Terminated,
}

/// Timing parameters of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    /// Pause after every dispatch
    pub dispatch_cooldown: Duration,
    /// Bound on each Robot Link call
    pub link_timeout: Duration,
    /// Pause after a gait selection
    pub gait_settle: Duration,
    /// Pause between polls; zero only yields
    pub poll_interval: Duration,
}

impl From<&Config> for LoopSettings {
    fn from(config: &Config) -> Self {
        Self {
            dispatch_cooldown: config.dispatch_cooldown(),
            link_timeout: config.link_timeout(),
            gait_settle: config.gait_settle(),
            poll_interval: config.poll_interval(),
        }
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub ticks: u64,
    pub directions: u64,
    pub actions: u64,
    pub failures: u64,
}

/// Orchestrates provider polling, classification and dispatch
pub struct InputLoop<P: InputProvider, L: RobotLink> {
    provider: P,
    link: L,
    debouncer: CommandDebouncer,
    throttle: DispatchThrottle,
    settings: LoopSettings,
    state: LoopState,
    stats: DispatchStats,
}

impl<P: InputProvider, L: RobotLink> std::fmt::Debug for InputLoop<P, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputLoop")
            .field("state", &self.state)
            .field("controller", self.debouncer.state())
            .field("settings", &self.settings)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<P: InputProvider, L: RobotLink> InputLoop<P, L> {
    /// Creates an idle loop
    pub fn new(provider: P, link: L, settings: LoopSettings) -> Self {
        Self {
            provider,
            link,
            debouncer: CommandDebouncer::new(),
            throttle: DispatchThrottle::new(settings.dispatch_cooldown),
            settings,
            state: LoopState::Idle,
            stats: DispatchStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Direction and gait currently persisted
    pub fn controller_state(&self) -> &ControllerState {
        self.debouncer.state()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Binds the first available device (Idle → Active)
    ///
    /// # Errors
    ///
    /// - `NoController`: the provider lists no device; the loop stays idle
    /// - `Controller`: the loop has already terminated
    pub fn activate(&mut self) -> Result<DeviceHandle> {
        match self.state {
            LoopState::Active(handle) => return Ok(handle),
            LoopState::Terminated => {
                return Err(BridgeError::Controller("input loop already terminated".to_string()))
            }
            LoopState::Idle => {}
        }

        let handle = self
            .provider
            .list_devices()
            .into_iter()
            .next()
            .ok_or(BridgeError::NoController)?;

        info!(
            "Controller bound: {} ({} axes, {} buttons, {} pads)",
            self.provider.device_name(handle).unwrap_or_else(|| "unnamed".to_string()),
            self.provider.axis_count(handle),
            self.provider.button_count(handle),
            self.provider.pad_count(handle)
        );
        self.state = LoopState::Active(handle);
        Ok(handle)
    }

    /// Runs until the provider reports quit or device loss
    ///
    /// # Errors
    ///
    /// Returns `NoController` when no device can be bound. Transport and
    /// mapping failures never end the loop.
    pub async fn run(&mut self) -> Result<()> {
        let (_quit_tx, quit) = watch::channel(false);
        self.run_until(quit).await
    }

    /// Runs until quit, device loss, or `true` on the `quit` channel
    ///
    /// # Errors
    ///
    /// Same as [`InputLoop::run`].
    pub async fn run_until(&mut self, mut quit: watch::Receiver<bool>) -> Result<()> {
        let handle = self.activate()?;

        while self.state == LoopState::Active(handle) {
            if *quit.borrow() {
                info!("Shutdown requested");
                self.state = LoopState::Terminated;
                break;
            }
            self.tick(handle, &mut quit).await;
        }

        info!(
            "Input loop stopped after {} ticks ({} directions, {} actions, {} failed sends)",
            self.stats.ticks, self.stats.directions, self.stats.actions, self.stats.failures
        );
        Ok(())
    }

    /// Releases the robot link, logging and swallowing failures
    ///
    /// The link's parting command obeys the same cool-down as any dispatch.
    pub async fn shutdown(&mut self) {
        self.state = LoopState::Terminated;
        self.throttle.wait_ready().await;
        let result = match timeout(self.settings.link_timeout, self.link.shutdown()).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::LinkTimeout(self.settings.link_timeout)),
        };
        if let Err(e) = result {
            warn!("Robot link shutdown failed: {}", e);
        }
    }

    async fn tick(&mut self, handle: DeviceHandle, quit: &mut watch::Receiver<bool>) {
        for event in self.provider.poll_lifecycle_events() {
            match event {
                LifecycleEvent::Quit => {
                    info!("Quit requested");
                    self.state = LoopState::Terminated;
                }
                LifecycleEvent::DeviceRemoved(removed) if removed == handle => {
                    warn!("Controller disconnected");
                    self.state = LoopState::Terminated;
                }
                LifecycleEvent::DeviceRemoved(other) => {
                    debug!("Ignoring removal of unbound device {:?}", other);
                }
            }
        }
        if self.state == LoopState::Terminated {
            return;
        }

        self.stats.ticks += 1;
        let snapshot = capture_snapshot(&self.provider, handle);

        let (x, y) = snapshot.stick();
        if let Some(direction) = self.debouncer.update(x, y) {
            self.dispatch_direction(direction).await;
        }

        for index in snapshot.pressed_buttons() {
            if *quit.borrow() {
                return;
            }
            match ActionCommand::from_button(index) {
                Ok(action) => self.dispatch_action(action).await,
                Err(e) => debug!("{}", e),
            }
        }

        for &pad in snapshot.pads() {
            if let Some(gait) = select_gait(pad) {
                if self.debouncer.set_gait(gait) {
                    info!("New gait selected: {}", gait);
                } else {
                    debug!("Gait {} reselected", gait);
                }
                if !self.settings.gait_settle.is_zero() {
                    pause(self.settings.gait_settle, quit).await;
                }
            }
        }

        if self.settings.poll_interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            pause(self.settings.poll_interval, quit).await;
        }
    }

    async fn dispatch_direction(&mut self, direction: Direction) {
        self.throttle.wait_ready().await;
        self.throttle.record_dispatch();
        let gait = self.debouncer.state().gait;
        let result = timeout(self.settings.link_timeout, self.link.send_direction(direction, gait)).await;

        match self.flatten(result) {
            Ok(()) => {
                self.stats.directions += 1;
                info!("Direction: {} sent (gait {})", direction, gait);
            }
            Err(e) => {
                self.stats.failures += 1;
                warn!("Direction {} not sent: {}", direction, e);
            }
        }
        self.throttle.cool_down().await;
    }

    async fn dispatch_action(&mut self, action: ActionCommand) {
        self.throttle.wait_ready().await;
        self.throttle.record_dispatch();
        let result = timeout(self.settings.link_timeout, self.link.send_action(action)).await;

        match self.flatten(result) {
            Ok(()) => {
                self.stats.actions += 1;
                info!("Action: {} sent", action);
            }
            Err(e) => {
                self.stats.failures += 1;
                warn!("Action {} not sent: {}", action, e);
            }
        }
        self.throttle.cool_down().await;
    }

    fn flatten(&self, result: std::result::Result<Result<()>, tokio::time::error::Elapsed>) -> Result<()> {
        result.unwrap_or(Err(BridgeError::LinkTimeout(self.settings.link_timeout)))
    }
}

/// Sleeps for `duration` unless quit is signalled first
async fn pause(duration: Duration, quit: &mut watch::Receiver<bool>) {
    tokio::select! {
        _ = sleep(duration) => {}
        Ok(()) = quit.changed() => {}
    }
}
