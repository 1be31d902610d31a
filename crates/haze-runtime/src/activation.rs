//! Activation state machine - decides whether the effect runs.
//!
//! Two producers feed the same reducer: host callbacks (screen activation,
//! player start/stop, overlays) and the polling fallback. Every mutation goes
//! through [`ActivationMachine::apply_signal`] (or a batch of writes followed
//! by one reconcile), which recomputes [`should_run`] and starts or stops the
//! driver only when the decision disagrees with the driver's state.

use crate::event::HostEvent;
use crate::event_bus::EventBus;
use crate::poll::{HostProbe, Poller};
use crate::screen::{ScreenDescriptor, ScreenRules};
use crate::signals::{ActivationSignals, Signal};
use crate::system::EffectDriver;
use haze_core::{SimulationConfig, Viewport};
use std::time::Instant;

/// Pure run/stop decision over the current signals and config.
pub fn should_run(signals: &ActivationSignals, config: &SimulationConfig) -> bool {
    config.enabled
        && !config.reduced_motion
        && signals.on_allowed_screen
        && !signals.overlay_open
        && !signals.in_player
        && (!signals.in_details_context || config.in_card_visible)
}

/// Driver transitions performed by the machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transitions {
    pub starts: u32,
    pub stops: u32,
    /// `start` was requested but the driver stayed stopped
    pub failed_starts: u32,
}

/// Owns the driver and the signals; the only writer of either.
pub struct ActivationMachine<D: EffectDriver> {
    driver: D,
    signals: ActivationSignals,
    config: SimulationConfig,
    rules: ScreenRules,
    poller: Poller,
    transitions: Transitions,
}

impl<D: EffectDriver> ActivationMachine<D> {
    /// Wrap a (stopped) driver. Nothing starts until the host reports an
    /// allowed screen.
    pub fn new(mut driver: D, config: SimulationConfig) -> Self {
        driver.update(&config);
        Self {
            driver,
            signals: ActivationSignals::default(),
            config,
            rules: ScreenRules::default(),
            poller: Poller::default(),
            transitions: Transitions::default(),
        }
    }

    pub fn with_rules(mut self, rules: ScreenRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_poller(mut self, poller: Poller) -> Self {
        self.poller = poller;
        self
    }

    pub fn signals(&self) -> &ActivationSignals {
        &self.signals
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn transitions(&self) -> Transitions {
        self.transitions
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Access for the host's frame callbacks. Signal and config changes must
    /// still go through the machine.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn should_run(&self) -> bool {
        should_run(&self.signals, &self.config)
    }

    /// Record one observation and re-decide. Returns true if the value changed.
    pub fn apply_signal(&mut self, signal: Signal, value: bool) -> bool {
        let changed = self.write_signal(signal, value);
        if changed {
            self.reconcile();
        }
        changed
    }

    /// A screen became active on the host.
    pub fn on_screen(&mut self, screen: &ScreenDescriptor) {
        let class = self.rules.classify(screen);
        let (allowed, details) = class.signals();
        log::debug!("screen '{}' classified as {class:?}", screen.component);

        // Both signals land before deciding, so moving between screen kinds
        // never produces a transient start/stop pair.
        let a = self.write_signal(Signal::OnAllowedScreen, allowed);
        let b = self.write_signal(Signal::InDetailsContext, details);
        if a || b {
            self.reconcile();
        }
    }

    pub fn on_player_start(&mut self) {
        self.apply_signal(Signal::InPlayer, true);
    }

    pub fn on_player_stop(&mut self) {
        self.apply_signal(Signal::InPlayer, false);
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ScreenActivated(screen) => self.on_screen(&screen),
            HostEvent::PlayerStarted => self.on_player_start(),
            HostEvent::PlayerStopped => self.on_player_stop(),
            HostEvent::OverlayChanged(open) => {
                self.apply_signal(Signal::OverlayOpen, open);
            }
            HostEvent::ViewportResized(viewport) => self.resize(viewport),
            HostEvent::SettingsChanged(config) => self.set_config(config),
        }
    }

    /// Apply every queued host event in arrival order.
    pub fn pump(&mut self, bus: &mut EventBus) {
        for event in bus.drain() {
            self.handle_event(event);
        }
    }

    /// Polling fallback. Rate-limited by the machine's [`Poller`]; returns
    /// true if a poll actually ran. Only values that differ from the cached
    /// signals are written.
    pub fn poll(&mut self, now: Instant, probe: &mut dyn HostProbe) -> bool {
        if !self.poller.due(now) {
            return false;
        }

        let in_player = probe.player_active().unwrap_or(false);
        let overlay = probe.overlay_open().unwrap_or(false);

        let a = self.write_signal(Signal::InPlayer, in_player);
        let b = self.write_signal(Signal::OverlayOpen, overlay);
        if a || b {
            log::debug!("poll corrected signals: in_player={in_player} overlay_open={overlay}");
            self.reconcile();
        }
        true
    }

    /// Install a freshly resolved config. The driver applies it in place;
    /// then the run decision is recomputed (enabled / reduced-motion /
    /// in-card visibility may have changed).
    pub fn set_config(&mut self, config: SimulationConfig) {
        if config == self.config {
            return;
        }
        self.driver.update(&config);
        self.config = config;
        self.reconcile();
    }

    /// Forward a viewport change. A driver that stops itself on an empty
    /// viewport counts as a stop; a usable viewport re-decides.
    pub fn resize(&mut self, viewport: Viewport) {
        let was_running = self.driver.is_running();
        self.driver.resize(viewport);
        if was_running && !self.driver.is_running() {
            self.transitions.stops += 1;
            log::info!("{} stopped: viewport unavailable", self.driver.name());
        } else if !viewport.is_empty() {
            self.reconcile();
        }
    }

    /// Stop the driver regardless of signals, e.g. when the host unloads us.
    pub fn shutdown(&mut self) {
        if self.driver.is_running() {
            self.driver.stop();
            self.transitions.stops += 1;
        }
    }

    fn write_signal(&mut self, signal: Signal, value: bool) -> bool {
        let changed = self.signals.set(signal, value);
        if changed {
            log::debug!("signal {signal} -> {value}");
        }
        changed
    }

    fn reconcile(&mut self) {
        let want = self.should_run();
        let running = self.driver.is_running();

        if want && !running {
            self.driver.start();
            if self.driver.is_running() {
                self.transitions.starts += 1;
                log::info!("{} started", self.driver.name());
            } else {
                self.transitions.failed_starts += 1;
            }
        } else if !want && running {
            self.driver.stop();
            self.transitions.stops += 1;
            log::info!("{} stopped", self.driver.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::StaticProbe;
    use haze_core::{resolve, PlatformTier, SettingsStore};
    use std::time::Duration;

    /// Driver double that records calls
    #[derive(Default)]
    struct MockDriver {
        running: bool,
        fail_start: bool,
        start_calls: u32,
        stop_calls: u32,
        updates: Vec<SimulationConfig>,
        resizes: Vec<Viewport>,
    }

    impl EffectDriver for MockDriver {
        fn start(&mut self) {
            self.start_calls += 1;
            if !self.fail_start {
                self.running = true;
            }
        }

        fn stop(&mut self) {
            self.stop_calls += 1;
            self.running = false;
        }

        fn update(&mut self, config: &SimulationConfig) {
            self.updates.push(config.clone());
        }

        fn resize(&mut self, viewport: Viewport) {
            self.resizes.push(viewport);
        }

        fn is_running(&self) -> bool {
            self.running
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn config() -> SimulationConfig {
        resolve(&SettingsStore::new(), PlatformTier::Desktop, false)
    }

    fn machine() -> ActivationMachine<MockDriver> {
        ActivationMachine::new(MockDriver::default(), config())
    }

    #[test]
    fn should_run_truth_table() {
        for bits in 0..16u8 {
            let signals = ActivationSignals {
                on_allowed_screen: bits & 1 != 0,
                in_player: bits & 2 != 0,
                overlay_open: bits & 4 != 0,
                in_details_context: bits & 8 != 0,
            };
            for enabled in [false, true] {
                for reduced_motion in [false, true] {
                    for in_card_visible in [false, true] {
                        let cfg = SimulationConfig {
                            enabled,
                            reduced_motion,
                            in_card_visible,
                            ..config()
                        };
                        let expected = enabled
                            && !reduced_motion
                            && signals.on_allowed_screen
                            && !signals.in_player
                            && !signals.overlay_open
                            && (in_card_visible || !signals.in_details_context);
                        assert_eq!(
                            should_run(&signals, &cfg),
                            expected,
                            "{signals:?} enabled={enabled} reduced={reduced_motion} card={in_card_visible}"
                        );
                        // deterministic
                        assert_eq!(should_run(&signals, &cfg), should_run(&signals, &cfg));
                    }
                }
            }
        }
    }

    #[test]
    fn does_not_start_before_a_screen() {
        let m = machine();
        assert!(!m.driver().running);
        assert_eq!(m.driver().start_calls, 0);
        assert_eq!(m.driver().updates.len(), 1);
    }

    #[test]
    fn player_start_stops_exactly_once() {
        let mut m = machine();
        m.on_screen(&ScreenDescriptor::new("main"));
        assert!(m.should_run());
        assert!(m.driver().running);

        m.on_player_start();
        assert!(!m.should_run());
        assert!(!m.driver().running);
        assert_eq!(m.driver().stop_calls, 1);

        // Repeated player-start events are no-ops
        m.on_player_start();
        assert_eq!(m.driver().stop_calls, 1);
        assert_eq!(m.transitions(), Transitions { starts: 1, stops: 1, failed_starts: 0 });

        m.on_player_stop();
        assert!(m.driver().running);
        assert_eq!(m.driver().start_calls, 2);
    }

    #[test]
    fn screen_change_never_flickers() {
        let mut m = machine();
        m.on_screen(&ScreenDescriptor::new("settings"));
        // Other -> Details with in-card visibility off: both signals flip,
        // but the driver must not start in between.
        m.on_screen(&ScreenDescriptor::new("full"));
        assert_eq!(m.driver().start_calls, 0);
        assert_eq!(m.driver().stop_calls, 0);
    }

    #[test]
    fn details_screen_respects_in_card_visibility() {
        let mut m = machine();
        m.on_screen(&ScreenDescriptor::new("full"));
        assert!(!m.driver().running);

        m.set_config(SimulationConfig {
            in_card_visible: true,
            ..config()
        });
        assert!(m.driver().running);

        m.on_screen(&ScreenDescriptor::new("settings"));
        assert!(!m.driver().running);
    }

    #[test]
    fn overlay_event_stops_and_restarts() {
        let mut m = machine();
        m.handle_event(HostEvent::ScreenActivated(ScreenDescriptor::new("main")));
        m.handle_event(HostEvent::OverlayChanged(true));
        assert!(!m.driver().running);
        m.handle_event(HostEvent::OverlayChanged(false));
        assert!(m.driver().running);
        assert_eq!(m.transitions().starts, 2);
        assert_eq!(m.transitions().stops, 1);
    }

    #[test]
    fn pump_applies_in_order() {
        let mut m = machine();
        let mut bus = EventBus::new();
        bus.push(HostEvent::ScreenActivated(ScreenDescriptor::new("main")));
        bus.push(HostEvent::PlayerStarted);
        bus.push(HostEvent::ViewportResized(Viewport::new(800.0, 600.0)));
        m.pump(&mut bus);

        assert!(bus.is_empty());
        assert!(!m.driver().running);
        assert!(m.signals().in_player);
        assert_eq!(m.driver().resizes, vec![Viewport::new(800.0, 600.0)]);
    }

    #[test]
    fn settings_event_installs_config() {
        let mut m = machine();
        m.on_screen(&ScreenDescriptor::new("main"));
        m.handle_event(HostEvent::SettingsChanged(SimulationConfig {
            enabled: false,
            ..config()
        }));
        assert!(!m.config().enabled);
        assert!(!m.driver().running);
        assert_eq!(m.transitions().stops, 1);
    }

    #[test]
    fn poll_corrects_missed_events() {
        let mut m = machine();
        m.on_screen(&ScreenDescriptor::new("main"));
        assert!(m.driver().running);

        // The host never sent PlayerStarted, but the probe sees the player
        let mut probe = StaticProbe {
            player: Some(true),
            overlay: Some(false),
        };
        let t0 = Instant::now();
        assert!(m.poll(t0, &mut probe));
        assert!(!m.driver().running);
        assert_eq!(m.driver().stop_calls, 1);

        // Same answer again: nothing written, no churn
        assert!(m.poll(t0 + Duration::from_secs(1), &mut probe));
        assert_eq!(m.driver().stop_calls, 1);
        assert_eq!(m.driver().start_calls, 1);
    }

    #[test]
    fn poll_is_rate_limited() {
        let mut m = machine();
        let mut probe = StaticProbe::default();
        let t0 = Instant::now();
        assert!(m.poll(t0, &mut probe));
        assert!(!m.poll(t0 + Duration::from_millis(200), &mut probe));
    }

    #[test]
    fn ambiguous_probe_falls_back_to_false() {
        let mut m = machine();
        m.on_screen(&ScreenDescriptor::new("main"));
        m.on_player_start();
        assert!(!m.driver().running);

        let mut probe = StaticProbe {
            player: None,
            overlay: None,
        };
        m.poll(Instant::now(), &mut probe);
        assert!(!m.signals().in_player);
        assert!(m.driver().running);
    }

    #[test]
    fn config_changes_reach_the_driver() {
        let mut m = machine();
        m.on_screen(&ScreenDescriptor::new("main"));

        // Identical config: not forwarded
        m.set_config(config());
        assert_eq!(m.driver().updates.len(), 1);

        m.set_config(SimulationConfig {
            enabled: false,
            ..config()
        });
        assert_eq!(m.driver().updates.len(), 2);
        assert!(!m.driver().running);

        m.set_config(SimulationConfig {
            reduced_motion: true,
            ..config()
        });
        assert!(!m.driver().running);

        m.set_config(config());
        assert!(m.driver().running);
    }

    #[test]
    fn failed_start_is_counted_not_retried_in_loop() {
        let driver = MockDriver {
            fail_start: true,
            ..Default::default()
        };
        let mut m = ActivationMachine::new(driver, config());
        m.on_screen(&ScreenDescriptor::new("main"));
        assert!(!m.driver().running);
        assert_eq!(m.driver().start_calls, 1);
        assert_eq!(m.transitions().failed_starts, 1);
        assert_eq!(m.transitions().starts, 0);
    }

    #[test]
    fn resize_retries_failed_start() {
        let driver = MockDriver {
            fail_start: true,
            ..Default::default()
        };
        let mut m = ActivationMachine::new(driver, config());
        m.on_screen(&ScreenDescriptor::new("main"));
        m.driver_mut().fail_start = false;

        m.resize(Viewport::new(0.0, 0.0));
        assert_eq!(m.driver().start_calls, 1);

        m.resize(Viewport::new(800.0, 600.0));
        assert!(m.driver().running);
        assert_eq!(m.transitions().starts, 1);
        assert_eq!(m.transitions().failed_starts, 1);
    }

    #[test]
    fn shutdown_stops_running_driver() {
        let mut m = machine();
        m.on_screen(&ScreenDescriptor::new("main"));
        m.shutdown();
        assert!(!m.driver().running);
        m.shutdown();
        assert_eq!(m.driver().stop_calls, 1);
    }
}
