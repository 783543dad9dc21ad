//! Scroll-to-time synchronization state machine.
//!
//! `TimelineController` owns every piece of mutable timeline state: the
//! measured scale, the displayed time, the interaction and lock state and the
//! set of armed timers. Inputs from the view (measurements, scroll and
//! pointer activity, lock toggles, visibility, timer firings) go through
//! [`TimelineController::handle`], which returns the commands the host has to
//! execute in order. The controller never touches timers or the DOM itself.

use crate::clock::Clock;
use crate::config::TimelineConfig;
use crate::scale::TimelineScale;
use crate::time_of_day::TimeOfDay;
use log::{debug, warn};

/// Scroll positions within this distance of a commanded offset count as arrived.
const SCROLL_ARRIVAL_TOLERANCE_PX: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One-shot quiet-period timer restarted by every scroll event.
    Settle,
    /// One-shot timer that fires on the next minute boundary.
    ClockAlign,
    /// Repeating timer started once the clock is aligned.
    ClockInterval,
}

impl TimerKind {
    pub const ALL: [TimerKind; 3] = [TimerKind::Settle, TimerKind::ClockAlign, TimerKind::ClockInterval];

    pub fn is_repeating(self) -> bool {
        matches!(self, TimerKind::ClockInterval)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Side effects requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ScrollTo { offset: f64, behavior: ScrollBehavior },
    /// Start `timer`. `ClockInterval` repeats every `delay_ms`, the others fire once.
    StartTimer { timer: TimerKind, delay_ms: u32 },
    CancelTimer(TimerKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Fresh layout readings: container height and per-hour rendered heights.
    Measured { viewport_height: f64, hour_heights: Vec<f64> },
    Scrolled { offset: f64 },
    /// Touch or pointer pressed on the timeline.
    PointerDown,
    /// Touch or pointer released or cancelled.
    PointerUp,
    Wheel,
    LockChanged(bool),
    VisibilityChanged { visible: bool },
    TimerFired(TimerKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A touch or pointer is held down.
    Interacting,
    /// Input stopped; the settle timer is running.
    Settling,
}

/// What the view needs to render the indicator, header and lock button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineStatus {
    pub display_time: TimeOfDay,
    pub interaction: InteractionState,
    pub locked: bool,
}

impl TimelineStatus {
    pub fn is_idle(&self) -> bool {
        self.interaction == InteractionState::Idle
    }

    /// The "now" glanceable only shows while the view follows the clock undisturbed.
    pub fn shows_now_card(&self) -> bool {
        !self.locked && self.is_idle()
    }

    /// The indicator grows into a time chip while the user moves the timeline.
    pub fn indicator_expanded(&self) -> bool {
        !self.is_idle()
    }

    /// Title and date fade in while the user moves the timeline.
    pub fn header_visible(&self) -> bool {
        !self.is_idle()
    }

    pub fn lock_button_label(&self) -> &'static str {
        if self.locked { "Return to Now" } else { "Lock Timeline" }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ArmedTimers {
    settle: bool,
    clock_align: bool,
    clock_interval: bool,
}

impl ArmedTimers {
    fn slot(&mut self, timer: TimerKind) -> &mut bool {
        match timer {
            TimerKind::Settle => &mut self.settle,
            TimerKind::ClockAlign => &mut self.clock_align,
            TimerKind::ClockInterval => &mut self.clock_interval,
        }
    }

    fn is_armed(&self, timer: TimerKind) -> bool {
        match timer {
            TimerKind::Settle => self.settle,
            TimerKind::ClockAlign => self.clock_align,
            TimerKind::ClockInterval => self.clock_interval,
        }
    }
}

pub struct TimelineController<C: Clock> {
    config: TimelineConfig,
    clock: C,
    scale: TimelineScale,
    display_time: TimeOfDay,
    interaction: InteractionState,
    locked: bool,
    running: bool,
    visible: bool,
    armed: ArmedTimers,
    /// Offset of the last recentre that has not been observed yet.
    pending_recenter: Option<f64>,
    /// Scroll offset the host last reported.
    last_scroll_offset: f64,
}

impl<C: Clock> TimelineController<C> {
    pub fn new(config: TimelineConfig, clock: C) -> Self {
        let display_time = clock.now().time_of_day();
        Self {
            scale: TimelineScale::unmeasured(&config),
            config,
            clock,
            display_time,
            interaction: InteractionState::Idle,
            locked: false,
            running: false,
            visible: true,
            armed: ArmedTimers::default(),
            pending_recenter: None,
            last_scroll_offset: 0.0,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn scale(&self) -> &TimelineScale {
        &self.scale
    }

    pub fn display_time(&self) -> TimeOfDay {
        self.display_time
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_timer_armed(&self, timer: TimerKind) -> bool {
        self.armed.is_armed(timer)
    }

    pub fn status(&self) -> TimelineStatus {
        TimelineStatus {
            display_time: self.display_time,
            interaction: self.interaction,
            locked: self.locked,
        }
    }

    /// Activate the view: show "now" (or the pinned time when locked), align
    /// the clock driver to the next minute boundary and jump there if the
    /// layout is already measured.
    pub fn start(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.running {
            return commands;
        }
        debug!("timeline controller started");
        self.running = true;
        self.visible = true;
        self.last_scroll_offset = 0.0;
        self.interaction = InteractionState::Idle;
        if !self.locked {
            self.display_time = self.clock.now().time_of_day();
        }
        self.arm_clock_alignment(&mut commands);
        self.scroll_to_display_time(ScrollBehavior::Instant, &mut commands);
        commands
    }

    /// Tear down: every timer is cancelled, armed or not.
    pub fn stop(&mut self) -> Vec<Command> {
        if !self.running {
            return Vec::new();
        }
        debug!("timeline controller stopped");
        self.running = false;
        self.interaction = InteractionState::Idle;
        self.pending_recenter = None;
        self.armed = ArmedTimers::default();
        TimerKind::ALL.into_iter().map(Command::CancelTimer).collect()
    }

    pub fn handle(&mut self, input: Input) -> Vec<Command> {
        let mut commands = Vec::new();
        if !self.running {
            match input {
                Input::Measured { viewport_height, hour_heights } => {
                    self.scale = TimelineScale::measure(&self.config, viewport_height, &hour_heights);
                }
                Input::LockChanged(locked) => self.locked = locked,
                _ => {}
            }
            return commands;
        }

        match input {
            Input::Measured { viewport_height, hour_heights } => {
                self.on_measured(viewport_height, &hour_heights, &mut commands)
            }
            Input::Scrolled { offset } => self.on_scrolled(offset, &mut commands),
            Input::PointerDown => self.on_pointer_down(&mut commands),
            Input::PointerUp => self.on_pointer_up(&mut commands),
            Input::Wheel => self.on_wheel(&mut commands),
            Input::LockChanged(locked) => self.on_lock_changed(locked, &mut commands),
            Input::VisibilityChanged { visible } => self.on_visibility_changed(visible, &mut commands),
            Input::TimerFired(timer) => self.on_timer_fired(timer, &mut commands),
        }
        commands
    }

    fn on_measured(&mut self, viewport_height: f64, hour_heights: &[f64], commands: &mut Vec<Command>) {
        self.scale = TimelineScale::measure(&self.config, viewport_height, hour_heights);
        debug!(
            "timeline measured: viewport {}px, total {}px",
            self.scale.viewport_height(),
            self.scale.total_height()
        );
        if self.interaction != InteractionState::Idle {
            return;
        }
        if !self.locked {
            self.display_time = self.clock.now().time_of_day();
        }
        self.scroll_to_display_time(ScrollBehavior::Instant, commands);
    }

    /// Scrolls of our own recentre approach its target monotonically. An
    /// event that arrives, or one that keeps closing in, is an echo; anything
    /// else is the user.
    fn on_scrolled(&mut self, offset: f64, commands: &mut Vec<Command>) {
        let previous = std::mem::replace(&mut self.last_scroll_offset, offset);
        if self.interaction == InteractionState::Idle {
            if let Some(target) = self.pending_recenter {
                let distance = (offset - target).abs();
                if distance <= SCROLL_ARRIVAL_TOLERANCE_PX {
                    self.pending_recenter = None;
                    return;
                }
                if distance < (previous - target).abs() {
                    return;
                }
                debug!("scroll to {offset} moves away from recentre target {target}");
            }
        }
        self.pending_recenter = None;

        if self.scale.is_measured() {
            self.display_time = self.scale.scroll_offset_to_time(offset);
        }
        if self.interaction != InteractionState::Interacting {
            self.interaction = InteractionState::Settling;
            self.arm_settle(commands);
        }
    }

    fn on_pointer_down(&mut self, commands: &mut Vec<Command>) {
        self.pending_recenter = None;
        self.cancel(TimerKind::Settle, commands);
        self.interaction = InteractionState::Interacting;
    }

    fn on_pointer_up(&mut self, commands: &mut Vec<Command>) {
        if self.interaction == InteractionState::Idle {
            return;
        }
        self.interaction = InteractionState::Settling;
        self.arm_settle(commands);
    }

    fn on_wheel(&mut self, commands: &mut Vec<Command>) {
        self.pending_recenter = None;
        if self.interaction != InteractionState::Interacting {
            self.interaction = InteractionState::Settling;
            self.arm_settle(commands);
        }
    }

    fn on_lock_changed(&mut self, locked: bool, commands: &mut Vec<Command>) {
        if locked == self.locked {
            return;
        }
        self.locked = locked;
        self.cancel(TimerKind::Settle, commands);
        if locked {
            debug!("timeline locked at {}", self.display_time);
            if self.interaction == InteractionState::Settling {
                self.interaction = InteractionState::Idle;
            }
        } else {
            debug!("timeline unlocked, returning to now");
            self.interaction = InteractionState::Idle;
            self.resync_to_now(ScrollBehavior::Smooth, commands);
        }
    }

    fn on_visibility_changed(&mut self, visible: bool, commands: &mut Vec<Command>) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.arm_clock_alignment(commands);
            if !self.locked && self.interaction == InteractionState::Idle {
                self.resync_to_now(ScrollBehavior::Instant, commands);
            }
        } else {
            self.cancel(TimerKind::ClockAlign, commands);
            self.cancel(TimerKind::ClockInterval, commands);
        }
    }

    fn on_timer_fired(&mut self, timer: TimerKind, commands: &mut Vec<Command>) {
        if !self.armed.is_armed(timer) {
            warn!("ignoring {timer:?} timer that is not armed");
            return;
        }
        match timer {
            TimerKind::Settle => {
                *self.armed.slot(TimerKind::Settle) = false;
                self.interaction = InteractionState::Idle;
                if !self.locked {
                    self.resync_to_now(ScrollBehavior::Smooth, commands);
                }
            }
            TimerKind::ClockAlign => {
                *self.armed.slot(TimerKind::ClockAlign) = false;
                let period = self.config.clock_interval_ms;
                self.arm(TimerKind::ClockInterval, period, commands);
                self.on_clock_tick(commands);
            }
            TimerKind::ClockInterval => self.on_clock_tick(commands),
        }
    }

    fn on_clock_tick(&mut self, commands: &mut Vec<Command>) {
        if self.locked {
            debug!("clock tick ignored: timeline locked");
            return;
        }
        if self.interaction != InteractionState::Idle {
            debug!("clock tick deferred: {:?}", self.interaction);
            return;
        }
        self.resync_to_now(ScrollBehavior::Smooth, commands);
    }

    fn resync_to_now(&mut self, behavior: ScrollBehavior, commands: &mut Vec<Command>) {
        self.display_time = self.clock.now().time_of_day();
        self.scroll_to_display_time(behavior, commands);
    }

    /// The browser fires no `scroll` event for a target it is already at or
    /// cannot go past, so only a real move leaves an echo pending.
    fn scroll_to_display_time(&mut self, behavior: ScrollBehavior, commands: &mut Vec<Command>) {
        match self.scale.time_to_scroll_offset(self.display_time) {
            Some(offset) => {
                let offset = offset.min(self.scale.max_scroll_offset());
                let moves = (offset - self.last_scroll_offset).abs() > SCROLL_ARRIVAL_TOLERANCE_PX;
                self.pending_recenter = moves.then_some(offset);
                commands.push(Command::ScrollTo { offset, behavior });
            }
            None => debug!("scroll to {} skipped: layout not measured", self.display_time),
        }
    }

    fn arm_settle(&mut self, commands: &mut Vec<Command>) {
        let delay = self.config.settle_delay_ms(self.locked);
        self.arm(TimerKind::Settle, delay, commands);
    }

    fn arm_clock_alignment(&mut self, commands: &mut Vec<Command>) {
        self.cancel(TimerKind::ClockInterval, commands);
        let delay = self.clock.now().ms_until_next_minute();
        self.arm(TimerKind::ClockAlign, delay, commands);
    }

    fn arm(&mut self, timer: TimerKind, delay_ms: u32, commands: &mut Vec<Command>) {
        self.cancel(timer, commands);
        *self.armed.slot(timer) = true;
        commands.push(Command::StartTimer { timer, delay_ms });
    }

    fn cancel(&mut self, timer: TimerKind, commands: &mut Vec<Command>) {
        let slot = self.armed.slot(timer);
        if *slot {
            *slot = false;
            commands.push(Command::CancelTimer(timer));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::collections::HashMap;

    /// Executes controller commands against simulated time.
    struct Harness {
        controller: TimelineController<ManualClock>,
        clock: ManualClock,
        now_ms: u64,
        timers: HashMap<TimerKind, (u64, u32)>,
        scrolls: Vec<(f64, ScrollBehavior)>,
        log: Vec<Command>,
    }

    impl Harness {
        fn new(hour: u8, minute: u8, second: u8, millisecond: u16) -> Self {
            Self::with_config(TimelineConfig::default(), hour, minute, second, millisecond)
        }

        fn with_config(config: TimelineConfig, hour: u8, minute: u8, second: u8, millisecond: u16) -> Self {
            let clock = ManualClock::at(hour, minute, second, millisecond);
            Self {
                controller: TimelineController::new(config, clock.clone()),
                clock,
                now_ms: 0,
                timers: HashMap::new(),
                scrolls: Vec::new(),
                log: Vec::new(),
            }
        }

        /// Started and measured with 24 blocks of 120 px in an 800 px viewport.
        fn running() -> Self {
            let mut harness = Self::new(10, 15, 42, 250);
            harness.start();
            harness.send(measured(&[120.0; 24]));
            harness
        }

        fn start(&mut self) {
            let commands = self.controller.start();
            self.apply(commands);
        }

        fn stop(&mut self) {
            let commands = self.controller.stop();
            self.apply(commands);
        }

        fn send(&mut self, input: Input) -> Vec<Command> {
            let commands = self.controller.handle(input);
            self.apply(commands.clone());
            commands
        }

        fn apply(&mut self, commands: Vec<Command>) {
            for command in commands {
                match &command {
                    Command::ScrollTo { offset, behavior } => self.scrolls.push((*offset, *behavior)),
                    Command::StartTimer { timer, delay_ms } => {
                        let replaced = self
                            .timers
                            .insert(*timer, (self.now_ms + u64::from(*delay_ms), *delay_ms));
                        assert!(replaced.is_none(), "{timer:?} started twice without cancel");
                    }
                    Command::CancelTimer(timer) => {
                        self.timers.remove(timer);
                    }
                }
                self.log.push(command);
            }
        }

        fn advance(&mut self, millis: u64) {
            let target = self.now_ms + millis;
            loop {
                let next = self
                    .timers
                    .iter()
                    .filter(|(_, (due, _))| *due <= target)
                    .min_by_key(|(_, (due, _))| *due)
                    .map(|(timer, (due, period))| (*timer, *due, *period));
                let Some((timer, due, period)) = next else { break };

                self.clock.advance_ms(due - self.now_ms);
                self.now_ms = due;
                self.timers.remove(&timer);
                if timer.is_repeating() {
                    self.timers.insert(timer, (due + u64::from(period), period));
                }
                let commands = self.controller.handle(Input::TimerFired(timer));
                self.apply(commands);
            }
            self.clock.advance_ms(target - self.now_ms);
            self.now_ms = target;
        }

        fn offset_of(&self, hour: u8, minute: u8) -> f64 {
            self.controller
                .scale()
                .time_to_scroll_offset(time(hour, minute))
                .unwrap()
        }

        fn last_scroll(&self) -> Option<(f64, ScrollBehavior)> {
            self.scrolls.last().copied()
        }

        /// User drags the timeline to `hour:minute` and lets go.
        fn drag_to(&mut self, hour: u8, minute: u8) {
            let offset = self.offset_of(hour, minute);
            self.send(Input::PointerDown);
            self.send(Input::Scrolled { offset });
            self.send(Input::PointerUp);
        }
    }

    fn time(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn measured(heights: &[f64]) -> Input {
        Input::Measured { viewport_height: 800.0, hour_heights: heights.to_vec() }
    }

    #[test]
    fn start_aligns_clock_and_waits_for_layout() {
        let mut harness = Harness::new(10, 15, 42, 250);
        harness.start();

        assert_eq!(
            harness.log,
            vec![Command::StartTimer { timer: TimerKind::ClockAlign, delay_ms: 17_750 }]
        );
        assert!(harness.scrolls.is_empty());
        assert_eq!(harness.controller.display_time(), time(10, 15));

        harness.send(measured(&[120.0; 24]));
        assert_eq!(harness.last_scroll(), Some((harness.offset_of(10, 15), ScrollBehavior::Instant)));
    }

    #[test]
    fn concrete_layout_scrolls_nine_thirty_to_1284() {
        let mut harness = Harness::new(9, 30, 0, 0);
        harness.start();
        harness.send(measured(&[120.0; 24]));
        assert_eq!(harness.last_scroll(), Some((1284.0, ScrollBehavior::Instant)));
    }

    #[test]
    fn settling_without_input_resyncs_to_now() {
        let mut harness = Harness::running();
        harness.drag_to(14, 0);

        assert_eq!(harness.controller.display_time(), time(14, 0));
        assert_eq!(harness.controller.interaction(), InteractionState::Settling);

        let scrolls_before = harness.scrolls.len();
        harness.advance(2_999);
        assert_eq!(harness.scrolls.len(), scrolls_before);
        assert_eq!(harness.controller.display_time(), time(14, 0));

        harness.advance(1);
        assert_eq!(harness.controller.interaction(), InteractionState::Idle);
        assert_eq!(harness.controller.display_time(), time(10, 15));
        assert_eq!(harness.last_scroll(), Some((harness.offset_of(10, 15), ScrollBehavior::Smooth)));
    }

    #[test]
    fn every_scroll_restarts_the_quiet_period() {
        let mut harness = Harness::running();
        harness.send(Input::Wheel);
        harness.send(Input::Scrolled { offset: 3_000.0 });
        harness.advance(2_000);
        harness.send(Input::Scrolled { offset: 3_100.0 });
        harness.advance(2_999);
        assert_eq!(harness.controller.interaction(), InteractionState::Settling);

        harness.advance(1);
        assert_eq!(harness.controller.interaction(), InteractionState::Idle);
        assert_eq!(harness.controller.display_time(), time(10, 15));
    }

    #[test]
    fn held_pointer_never_settles() {
        let mut harness = Harness::running();
        harness.send(Input::PointerDown);
        harness.send(Input::Scrolled { offset: 2_000.0 });
        harness.advance(10_000);

        assert_eq!(harness.controller.interaction(), InteractionState::Interacting);
        assert!(!harness.controller.is_timer_armed(TimerKind::Settle));
    }

    #[test]
    fn locked_view_is_never_recentred() {
        let mut harness = Harness::running();
        harness.send(Input::LockChanged(true));
        let scrolls_before = harness.scrolls.len();

        let offset = harness.offset_of(18, 45);
        harness.send(Input::Wheel);
        harness.send(Input::Scrolled { offset });
        assert_eq!(harness.controller.display_time(), time(18, 45));

        harness.advance(300);
        assert_eq!(harness.controller.interaction(), InteractionState::Idle);

        // Past the unlocked settle delay and across two minute boundaries.
        harness.advance(3_000);
        harness.advance(120_000);
        assert_eq!(harness.scrolls.len(), scrolls_before);
        assert_eq!(harness.controller.display_time(), time(18, 45));
    }

    #[test]
    fn locked_settle_uses_short_delay() {
        let mut harness = Harness::running();
        harness.send(Input::LockChanged(true));
        let commands = harness.send(Input::Wheel);
        assert_eq!(
            commands,
            vec![Command::StartTimer { timer: TimerKind::Settle, delay_ms: 300 }]
        );
    }

    #[test]
    fn unlocking_snaps_back_to_now_immediately() {
        let mut harness = Harness::running();
        harness.send(Input::LockChanged(true));
        harness.drag_to(20, 0);
        assert!(harness.controller.is_timer_armed(TimerKind::Settle));

        let commands = harness.send(Input::LockChanged(false));
        let now_offset = harness.offset_of(10, 15);
        assert_eq!(
            commands,
            vec![
                Command::CancelTimer(TimerKind::Settle),
                Command::ScrollTo { offset: now_offset, behavior: ScrollBehavior::Smooth },
            ]
        );
        assert_eq!(harness.controller.display_time(), time(10, 15));
        assert_eq!(harness.controller.interaction(), InteractionState::Idle);
    }

    #[test]
    fn locking_cancels_a_pending_resync() {
        let mut harness = Harness::running();
        harness.drag_to(20, 0);
        harness.send(Input::LockChanged(true));
        assert!(!harness.controller.is_timer_armed(TimerKind::Settle));

        let scrolls_before = harness.scrolls.len();
        harness.advance(5_000);
        assert_eq!(harness.scrolls.len(), scrolls_before);
        assert_eq!(harness.controller.display_time(), time(20, 0));
    }

    #[test]
    fn repeated_lock_value_is_a_no_op() {
        let mut harness = Harness::running();
        assert!(harness.send(Input::LockChanged(false)).is_empty());
    }

    #[test]
    fn clock_ticks_on_minute_boundaries() {
        let mut harness = Harness::running();

        harness.advance(17_749);
        assert_eq!(harness.controller.display_time(), time(10, 15));

        harness.advance(1);
        assert_eq!(harness.controller.display_time(), time(10, 16));
        assert_eq!(harness.last_scroll(), Some((harness.offset_of(10, 16), ScrollBehavior::Smooth)));
        assert!(harness.controller.is_timer_armed(TimerKind::ClockInterval));
        assert!(!harness.controller.is_timer_armed(TimerKind::ClockAlign));

        harness.advance(60_000);
        assert_eq!(harness.controller.display_time(), time(10, 17));
        assert_eq!(harness.last_scroll(), Some((harness.offset_of(10, 17), ScrollBehavior::Smooth)));
    }

    #[test]
    fn clock_tick_is_dropped_mid_gesture() {
        let mut harness = Harness::running();
        harness.send(Input::PointerDown);
        harness.send(Input::Scrolled { offset: harness.offset_of(7, 0) });
        let scrolls_before = harness.scrolls.len();

        harness.advance(20_000);
        assert_eq!(harness.scrolls.len(), scrolls_before);
        assert_eq!(harness.controller.display_time(), time(7, 0));

        // Released after the tick: the settle timer catches up.
        harness.send(Input::PointerUp);
        harness.advance(3_000);
        assert_eq!(harness.controller.display_time(), time(10, 16));
    }

    #[test]
    fn hidden_view_stops_the_clock_and_realigns_on_return() {
        let mut harness = Harness::running();
        harness.advance(17_750);
        assert!(harness.controller.is_timer_armed(TimerKind::ClockInterval));

        let commands = harness.send(Input::VisibilityChanged { visible: false });
        assert_eq!(commands, vec![Command::CancelTimer(TimerKind::ClockInterval)]);
        assert!(harness.timers.is_empty());

        let scrolls_before = harness.scrolls.len();
        harness.advance(300_500);
        assert_eq!(harness.scrolls.len(), scrolls_before);

        // 10:16:00.000 + 300.5 s = 10:21:00.500
        let commands = harness.send(Input::VisibilityChanged { visible: true });
        assert_eq!(
            commands[0],
            Command::StartTimer { timer: TimerKind::ClockAlign, delay_ms: 59_500 }
        );
        assert_eq!(harness.controller.display_time(), time(10, 21));
        assert_eq!(harness.last_scroll(), Some((harness.offset_of(10, 21), ScrollBehavior::Instant)));
    }

    #[test]
    fn stop_cancels_every_timer() {
        let mut harness = Harness::running();
        harness.drag_to(12, 0);
        assert!(!harness.timers.is_empty());

        harness.stop();
        assert!(harness.timers.is_empty());
        assert!(!harness.controller.is_running());
        for timer in TimerKind::ALL {
            assert!(harness.log.contains(&Command::CancelTimer(timer)));
            assert!(!harness.controller.is_timer_armed(timer));
        }

        assert!(harness.send(Input::Wheel).is_empty());
        assert!(harness.send(Input::TimerFired(TimerKind::Settle)).is_empty());
    }

    #[test]
    fn input_after_teardown_is_inert() {
        let mut harness = Harness::running();
        harness.send(Input::PointerDown);
        harness.stop();
        harness.log.clear();

        assert!(harness.send(Input::PointerUp).is_empty());
        assert!(harness.send(Input::Scrolled { offset: 900.0 }).is_empty());
        assert_eq!(harness.controller.interaction(), InteractionState::Idle);
        assert_eq!(harness.controller.display_time(), time(10, 15));

        harness.start();
        harness.drag_to(12, 0);
        let settle_starts = harness
            .log
            .iter()
            .filter(|command| matches!(command, Command::StartTimer { timer: TimerKind::Settle, .. }))
            .count();
        assert_eq!(settle_starts, 1);
    }

    #[test]
    fn restart_after_stop_realigns() {
        let mut harness = Harness::running();
        harness.stop();
        harness.advance(5_000);
        harness.log.clear();

        harness.start();
        assert!(harness.log.contains(&Command::StartTimer {
            timer: TimerKind::ClockAlign,
            delay_ms: 12_750,
        }));
        assert_eq!(harness.last_scroll(), Some((harness.offset_of(10, 15), ScrollBehavior::Instant)));
    }

    #[test]
    fn stray_timer_firing_is_ignored() {
        let mut harness = Harness::running();
        assert!(harness.send(Input::TimerFired(TimerKind::Settle)).is_empty());
        assert_eq!(harness.controller.interaction(), InteractionState::Idle);
    }

    #[test]
    fn own_recentre_scroll_is_not_user_input() {
        let mut harness = Harness::running();
        let target = harness.offset_of(10, 15);

        // Smooth scrolling reports intermediate offsets before arriving.
        harness.send(Input::Scrolled { offset: target - 400.0 });
        harness.send(Input::Scrolled { offset: target - 0.5 });
        assert_eq!(harness.controller.interaction(), InteractionState::Idle);
        assert_eq!(harness.controller.display_time(), time(10, 15));
        assert!(!harness.controller.is_timer_armed(TimerKind::Settle));

        // Once arrived, further scrolling is the user's.
        harness.send(Input::Scrolled { offset: target + 500.0 });
        assert_eq!(harness.controller.interaction(), InteractionState::Settling);
        assert_ne!(harness.controller.display_time(), time(10, 15));
    }

    #[test]
    fn recentre_onto_current_position_does_not_swallow_later_scrolls() {
        let mut harness = Harness::running();
        let now_offset = harness.offset_of(10, 15);
        harness.send(Input::Scrolled { offset: now_offset });

        // Same mapping at a new viewport height: the recentre targets where we already are.
        harness.send(Input::Measured { viewport_height: 700.0, hour_heights: vec![120.0; 24] });
        assert_eq!(harness.last_scroll(), Some((now_offset, ScrollBehavior::Instant)));

        // Keyboard scrolling: no press or wheel before it.
        let offset = harness.offset_of(15, 0);
        harness.send(Input::Scrolled { offset });
        harness.send(Input::Scrolled { offset });
        assert_eq!(harness.controller.display_time(), time(15, 0));
        assert_eq!(harness.controller.interaction(), InteractionState::Settling);
        assert!(harness.controller.is_timer_armed(TimerKind::Settle));
    }

    #[test]
    fn scroll_away_from_unfinished_recentre_is_user_input() {
        let mut harness = Harness::running();
        let target = harness.offset_of(10, 15);

        // The recentre stalls short of its target.
        harness.send(Input::Scrolled { offset: target - 400.0 });
        assert_eq!(harness.controller.interaction(), InteractionState::Idle);

        let offset = harness.offset_of(3, 0);
        harness.send(Input::Scrolled { offset });
        assert_eq!(harness.controller.display_time(), time(3, 0));
        assert_eq!(harness.controller.interaction(), InteractionState::Settling);

        harness.advance(3_000);
        assert_eq!(harness.controller.display_time(), time(10, 15));
        assert_eq!(harness.last_scroll(), Some((target, ScrollBehavior::Smooth)));
    }

    #[test]
    fn resize_while_idle_repins_now_on_fresh_scale() {
        let mut harness = Harness::running();
        let mut heights = [120.0; 24];
        heights[2] = 300.0;
        harness.send(measured(&heights));

        let expected = 10.0 * 136.0 + 180.0 + 15.0 / 60.0 * 120.0;
        assert_eq!(harness.last_scroll(), Some((expected, ScrollBehavior::Instant)));
        assert_eq!(harness.offset_of(10, 15), expected);
    }

    #[test]
    fn resize_while_locked_keeps_pinned_time() {
        let mut harness = Harness::running();
        harness.send(Input::LockChanged(true));
        harness.drag_to(18, 30);
        harness.advance(300);

        harness.send(Input::Measured { viewport_height: 600.0, hour_heights: vec![150.0; 24] });
        assert_eq!(harness.controller.display_time(), time(18, 30));
        assert_eq!(harness.last_scroll(), Some((harness.offset_of(18, 30), ScrollBehavior::Instant)));
        assert_eq!(harness.controller.scale().viewport_height(), 600.0);
    }

    #[test]
    fn resize_mid_gesture_only_replaces_the_scale() {
        let mut harness = Harness::running();
        harness.send(Input::PointerDown);
        let scrolls_before = harness.scrolls.len();
        harness.send(measured(&[200.0; 24]));

        assert_eq!(harness.scrolls.len(), scrolls_before);
        assert_eq!(harness.controller.scale().hour_height(0), 200.0);
    }

    #[test]
    fn unmeasured_layout_updates_time_without_scrolling() {
        let mut harness = Harness::new(10, 15, 42, 250);
        harness.start();
        harness.advance(17_750);

        assert_eq!(harness.controller.display_time(), time(10, 16));
        assert!(harness.scrolls.is_empty());
    }

    #[test]
    fn status_projection() {
        let mut harness = Harness::running();
        let status = harness.controller.status();
        assert!(status.shows_now_card());
        assert!(!status.indicator_expanded());
        assert!(!status.header_visible());
        assert_eq!(status.lock_button_label(), "Lock Timeline");

        harness.send(Input::PointerDown);
        let status = harness.controller.status();
        assert!(!status.shows_now_card());
        assert!(status.indicator_expanded());
        assert!(status.header_visible());

        harness.send(Input::LockChanged(true));
        let status = harness.controller.status();
        assert_eq!(status.lock_button_label(), "Return to Now");
        assert!(!status.shows_now_card());
    }
}
