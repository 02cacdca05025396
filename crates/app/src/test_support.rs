//! In-memory port fakes shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::broadcast;

use mediacenter_domain::amplifier::{AmplifierEvent, BeamMode, DspProgram, Input, Volume};
use mediacenter_domain::error::{AmplifierError, HardwareIoError, MediaCenterError};
use mediacenter_domain::relay::{Level, Pin};

use crate::ports::home_assistant::{EntityDescriptor, EntityKey};
use crate::ports::{AmplifierDriver, Clock, DigitalOutput, HomeAssistantPublisher, Shell};

#[derive(Default)]
pub struct FakeOutput {
    levels: Mutex<HashMap<Pin, Level>>,
    writes: Mutex<Vec<(Pin, Level)>>,
    failing: AtomicBool,
}

impl FakeOutput {
    /// Set a level without recording a write, as if left by a previous run.
    pub fn force(&self, pin: Pin, level: Level) {
        self.levels.lock().unwrap().insert(pin, level);
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_high(&self, pin: Pin) -> bool {
        self.levels
            .lock()
            .unwrap()
            .get(&pin)
            .is_some_and(|level| level.is_high())
    }

    pub fn writes(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn high_writes(&self, pin: Pin) -> usize {
        self.count(pin, Level::High)
    }

    pub fn low_writes(&self, pin: Pin) -> usize {
        self.count(pin, Level::Low)
    }

    fn count(&self, pin: Pin, level: Level) -> usize {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, l)| *p == pin && *l == level)
            .count()
    }

    fn check(&self, pin: Pin) -> Result<(), HardwareIoError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HardwareIoError::new(pin, "pin unavailable"));
        }
        Ok(())
    }
}

impl DigitalOutput for FakeOutput {
    fn read(&self, pin: Pin) -> Result<Level, HardwareIoError> {
        self.check(pin)?;
        Ok(self
            .levels
            .lock()
            .unwrap()
            .get(&pin)
            .copied()
            .unwrap_or(Level::Low))
    }

    fn write(&self, pin: Pin, level: Level) -> Result<(), HardwareIoError> {
        self.check(pin)?;
        self.levels.lock().unwrap().insert(pin, level);
        self.writes.lock().unwrap().push((pin, level));
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AmpState {
    pub powered: bool,
    pub input: Option<Input>,
    pub beam: Option<BeamMode>,
    pub dsp: Option<DspProgram>,
    pub volume: Option<Volume>,
}

pub struct FakeAmplifier {
    state: Mutex<AmpState>,
    calls: Mutex<Vec<&'static str>>,
    fail_power_off: AtomicBool,
    fail_all: AtomicBool,
    closed: AtomicBool,
    events: broadcast::Sender<AmplifierEvent>,
}

impl Default for FakeAmplifier {
    fn default() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(AmpState::default()),
            calls: Mutex::new(Vec::new()),
            fail_power_off: AtomicBool::new(false),
            fail_all: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            events,
        }
    }
}

impl FakeAmplifier {
    pub fn state(&self) -> AmpState {
        self.state.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_power_off(&self, failing: bool) {
        self.fail_power_off.store(failing, Ordering::SeqCst);
    }

    pub fn fail_all(&self, failing: bool) {
        self.fail_all.store(failing, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Push an event as the device's read loop would.
    pub fn emit(&self, event: AmplifierEvent) {
        let _ = self.events.send(event);
    }

    fn record(
        &self,
        command: &'static str,
        apply: impl FnOnce(&mut AmpState),
    ) -> Result<(), AmplifierError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(AmplifierError::new(command, "serial port closed"));
        }
        self.calls.lock().unwrap().push(command);
        apply(&mut self.state.lock().unwrap());
        Ok(())
    }
}

impl AmplifierDriver for FakeAmplifier {
    fn power_on(&self) -> Result<(), AmplifierError> {
        self.record("power_on", |s| s.powered = true)
    }

    fn power_off(&self) -> Result<(), AmplifierError> {
        if self.fail_power_off.load(Ordering::SeqCst) {
            return Err(AmplifierError::new("power_off", "no answer"));
        }
        self.record("power_off", |s| {
            s.powered = false;
            s.input = None;
        })
    }

    fn set_input(&self, input: Input) -> Result<(), AmplifierError> {
        self.record("set_input", |s| s.input = Some(input))
    }

    fn set_beam_mode(&self, mode: BeamMode) -> Result<(), AmplifierError> {
        self.record("set_beam_mode", |s| s.beam = Some(mode))
    }

    fn set_dsp(&self, program: DspProgram) -> Result<(), AmplifierError> {
        self.record("set_dsp", |s| s.dsp = Some(program))
    }

    fn volume_up(&self) -> Result<(), AmplifierError> {
        self.record("volume_up", |_| {})
    }

    fn volume_down(&self) -> Result<(), AmplifierError> {
        self.record("volume_down", |_| {})
    }

    fn set_volume(&self, volume: Volume) -> Result<(), AmplifierError> {
        self.record("set_volume", |s| s.volume = Some(volume))
    }

    fn subscribe(&self) -> broadcast::Receiver<AmplifierEvent> {
        self.events.subscribe()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Clock that returns immediately and remembers every requested wait.
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for RecordingClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.sleeps.lock().unwrap().push(duration);
        async {}
    }
}

#[derive(Default)]
pub struct RecordingShell {
    commands: Mutex<Vec<String>>,
}

impl RecordingShell {
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl Shell for RecordingShell {
    fn run(&self, command: &str) {
        self.commands.lock().unwrap().push(command.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    Discovery(EntityKey),
    Switch(EntityKey, bool),
    Number(EntityKey, u8),
}

#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<Published>>,
}

impl RecordingPublisher {
    pub fn messages(&self) -> Vec<Published> {
        self.messages.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<Published> {
        std::mem::take(&mut *self.messages.lock().unwrap())
    }
}

impl HomeAssistantPublisher for RecordingPublisher {
    fn publish_discovery(
        &self,
        entity: &EntityDescriptor,
    ) -> impl Future<Output = Result<(), MediaCenterError>> + Send {
        self.messages
            .lock()
            .unwrap()
            .push(Published::Discovery(entity.key));
        async { Ok(()) }
    }

    fn publish_switch(
        &self,
        key: EntityKey,
        on: bool,
    ) -> impl Future<Output = Result<(), MediaCenterError>> + Send {
        self.messages
            .lock()
            .unwrap()
            .push(Published::Switch(key, on));
        async { Ok(()) }
    }

    fn publish_number(
        &self,
        key: EntityKey,
        value: Volume,
    ) -> impl Future<Output = Result<(), MediaCenterError>> + Send {
        self.messages
            .lock()
            .unwrap()
            .push(Published::Number(key, value.get()));
        async { Ok(()) }
    }
}
