//! Shared test infrastructure for debounced-buttons integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use debounced_buttons::{
    ButtonConfig, ButtonId, Buttons, DebounceTimer, EdgeTrigger, GpioDriver, Pull, TimeDuration,
};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

// ============================================================================
// Mock GPIO
// ============================================================================

/// Number of lines the mock controller exposes (0..LINE_COUNT are valid)
pub const LINE_COUNT: usize = 16;

#[derive(Debug, Default, Clone, Copy)]
pub struct LineState {
    pub high: bool,
    pub input: bool,
    pub pull: Option<Pull>,
    pub edge: Option<EdgeTrigger>,
    pub handler: Option<ButtonId>,
    pub interrupt_enabled: bool,
    pub resets: u32,
}

#[derive(Debug, Default)]
pub struct GpioState {
    pub lines: [LineState; LINE_COUNT],
    pub isr_installed: bool,
    pub fail_install: bool,
    pub fail_configure: bool,
    pub fail_release: bool,
    pub fail_read: bool,
    pub reads: u32,
}

/// Mock GPIO driver. Clones share state, so a test keeps one clone to drive
/// line levels and inspect configuration while `Buttons` owns the other.
#[derive(Debug, Clone, Default)]
pub struct MockGpio {
    state: Arc<Mutex<GpioState>>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_high(&self, line: u8, high: bool) {
        self.state.lock().unwrap().lines[line as usize].high = high;
    }

    pub fn line(&self, line: u8) -> LineState {
        self.state.lock().unwrap().lines[line as usize]
    }

    pub fn isr_installed(&self) -> bool {
        self.state.lock().unwrap().isr_installed
    }

    pub fn reads(&self) -> u32 {
        self.state.lock().unwrap().reads
    }

    pub fn fail_install(&self, fail: bool) {
        self.state.lock().unwrap().fail_install = fail;
    }

    pub fn fail_configure(&self, fail: bool) {
        self.state.lock().unwrap().fail_configure = fail;
    }

    pub fn fail_release(&self, fail: bool) {
        self.state.lock().unwrap().fail_release = fail;
    }

    pub fn fail_read(&self, fail: bool) {
        self.state.lock().unwrap().fail_read = fail;
    }
}

impl GpioDriver for MockGpio {
    type Line = u8;
    type Error = ();

    fn is_valid_line(&self, line: u8) -> bool {
        (line as usize) < LINE_COUNT
    }

    fn install_interrupt_service(&mut self) -> Result<(), ()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_install {
            return Err(());
        }
        state.isr_installed = true;
        Ok(())
    }

    fn reset_line(&mut self, line: u8) -> Result<(), ()> {
        let mut state = self.state.lock().unwrap();
        let fail = state.fail_release;
        let l = &mut state.lines[line as usize];
        if fail && l.interrupt_enabled {
            return Err(());
        }
        let high = l.high;
        let resets = l.resets + 1;
        *l = LineState {
            high,
            resets,
            ..LineState::default()
        };
        Ok(())
    }

    fn configure_input(&mut self, line: u8, pull: Pull) -> Result<(), ()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_configure {
            return Err(());
        }
        let l = &mut state.lines[line as usize];
        l.input = true;
        l.pull = Some(pull);
        Ok(())
    }

    fn set_edge_trigger(&mut self, line: u8, edge: EdgeTrigger) -> Result<(), ()> {
        let mut state = self.state.lock().unwrap();
        let l = &mut state.lines[line as usize];
        l.edge = Some(edge);
        l.interrupt_enabled = true;
        Ok(())
    }

    fn attach_edge_handler(&mut self, line: u8, id: ButtonId) -> Result<(), ()> {
        let mut state = self.state.lock().unwrap();
        if !state.isr_installed {
            return Err(());
        }
        state.lines[line as usize].handler = Some(id);
        Ok(())
    }

    fn detach_edge_handler(&mut self, line: u8) -> Result<(), ()> {
        self.state.lock().unwrap().lines[line as usize].handler = None;
        Ok(())
    }

    fn disable_interrupt(&mut self, line: u8) -> Result<(), ()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_release {
            return Err(());
        }
        state.lines[line as usize].interrupt_enabled = false;
        Ok(())
    }

    fn is_high(&mut self, line: u8) -> Result<bool, ()> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        if state.fail_read {
            return Err(());
        }
        Ok(state.lines[line as usize].high)
    }
}

// ============================================================================
// Mock Timer Service
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct TimerSlot {
    pub id: ButtonId,
    pub period: TestDuration,
    pub active: bool,
    pub starts: u32,
}

#[derive(Debug, Default)]
pub struct TimerState {
    pub timers: Vec<TimerSlot>,
    pub capacity: Option<usize>,
    pub fail_start: bool,
}

/// Mock one-shot timer service. Timers never expire on their own; tests call
/// [`fire`] to simulate an expiry.
#[derive(Debug, Clone, Default)]
pub struct MockTimers {
    state: Arc<Mutex<TimerState>>,
}

impl MockTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits how many timers can be created
    pub fn with_capacity(capacity: usize) -> Self {
        let timers = Self::default();
        timers.state.lock().unwrap().capacity = Some(capacity);
        timers
    }

    fn slot(&self, id: ButtonId) -> Option<TimerSlot> {
        let state = self.state.lock().unwrap();
        state.timers.iter().copied().find(|t| t.id == id)
    }

    pub fn created(&self) -> usize {
        self.state.lock().unwrap().timers.len()
    }

    pub fn period(&self, id: ButtonId) -> Option<TestDuration> {
        self.slot(id).map(|t| t.period)
    }

    pub fn is_running(&self, id: ButtonId) -> bool {
        self.slot(id).map(|t| t.active).unwrap_or(false)
    }

    pub fn starts(&self, id: ButtonId) -> u32 {
        self.slot(id).map(|t| t.starts).unwrap_or(0)
    }

    /// Marks the timer as expired. Returns false if it was not running.
    pub fn expire(&self, id: ButtonId) -> bool {
        let mut state = self.state.lock().unwrap();
        match state.timers.iter_mut().find(|t| t.id == id) {
            Some(slot) if slot.active => {
                slot.active = false;
                true
            }
            _ => false,
        }
    }

    pub fn fail_start(&self, fail: bool) {
        self.state.lock().unwrap().fail_start = fail;
    }
}

impl DebounceTimer for MockTimers {
    type Handle = usize;
    type Duration = TestDuration;
    type Error = ();

    fn create(&mut self, id: ButtonId, period: TestDuration) -> Result<usize, ()> {
        let mut state = self.state.lock().unwrap();
        if let Some(capacity) = state.capacity {
            if state.timers.len() >= capacity {
                return Err(());
            }
        }
        state.timers.push(TimerSlot {
            id,
            period,
            active: false,
            starts: 0,
        });
        Ok(state.timers.len() - 1)
    }

    fn start(&mut self, handle: usize) -> Result<(), ()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_start {
            return Err(());
        }
        let slot = &mut state.timers[handle];
        slot.active = true;
        slot.starts += 1;
        Ok(())
    }

    fn is_active(&self, handle: usize) -> bool {
        self.state.lock().unwrap().timers[handle].active
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub type TestButtons<const N: usize> = Buttons<MockGpio, MockTimers, N>;

pub const DEBOUNCE: TestDuration = TestDuration(50);

/// Active-high button on `line` with a 50ms debounce window
pub fn cfg(id: u8, line: u8) -> ButtonConfig<u8, TestDuration> {
    ButtonConfig::new(ButtonId(id), line, Pull::Down, EdgeTrigger::Rising, DEBOUNCE)
}

/// Builds a button module over fresh mocks, returning handles to the mocks
pub fn setup<const N: usize>(
    configs: [ButtonConfig<u8, TestDuration>; N],
) -> (TestButtons<N>, MockGpio, MockTimers) {
    let gpio = MockGpio::new();
    let timers = MockTimers::new();
    let buttons = Buttons::new(gpio.clone(), timers.clone(), configs);
    (buttons, gpio, timers)
}

/// Builds a module and initializes it together with every button
pub fn setup_ready<const N: usize>(
    configs: [ButtonConfig<u8, TestDuration>; N],
) -> (TestButtons<N>, MockGpio, MockTimers) {
    let (buttons, gpio, timers) = setup(configs);
    buttons.init_module().unwrap();
    for id in 0..N {
        buttons.init_button(ButtonId(id as u8)).unwrap();
    }
    (buttons, gpio, timers)
}

/// Simulates the debounce timer for `id` expiring
pub fn fire<const N: usize>(buttons: &TestButtons<N>, timers: &MockTimers, id: ButtonId) {
    assert!(timers.expire(id), "timer for {:?} was not running", id);
    buttons.on_debounce_timeout(id);
}

/// Simulates a bouncing press: the line goes high and `edges` interrupts arrive
pub fn bounce<const N: usize>(
    buttons: &TestButtons<N>,
    gpio: &MockGpio,
    line: u8,
    id: ButtonId,
    edges: usize,
) {
    gpio.set_high(line, true);
    for i in 0..edges {
        // Contacts chatter while the edges arrive
        gpio.set_high(line, i % 2 == 0);
        buttons.on_edge(id);
    }
    gpio.set_high(line, true);
}
