//! Simulated soundbar.
//!
//! Commands update an in-memory session and, like the real device, the
//! soundbar reports volume changes back on its own notification stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use mediacenter_app::ports::AmplifierDriver;
use mediacenter_domain::amplifier::{AmplifierEvent, BeamMode, DspProgram, Input, Volume};
use mediacenter_domain::error::AmplifierError;

const EVENT_CAPACITY: usize = 32;

/// Session state of the simulated soundbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmplifierSnapshot {
    pub powered: bool,
    pub input: Option<Input>,
    pub beam: Option<BeamMode>,
    pub dsp: Option<DspProgram>,
    pub volume: Volume,
}

pub struct VirtualAmplifier {
    session: Mutex<AmplifierSnapshot>,
    events: broadcast::Sender<AmplifierEvent>,
    closed: AtomicBool,
}

impl Default for VirtualAmplifier {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: Mutex::new(AmplifierSnapshot::default()),
            events,
            closed: AtomicBool::new(false),
        }
    }
}

impl VirtualAmplifier {
    #[must_use]
    pub fn snapshot(&self) -> AmplifierSnapshot {
        *self.lock()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Simulate the volume knob on the front panel.
    pub fn turn_knob(&self, volume: Volume) {
        self.lock().volume = volume;
        self.emit(AmplifierEvent::Volume(volume));
    }

    fn lock(&self) -> MutexGuard<'_, AmplifierSnapshot> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: AmplifierEvent) {
        // no receiver is not an error
        let _ = self.events.send(event);
    }

    fn command(
        &self,
        name: &'static str,
        apply: impl FnOnce(&mut AmplifierSnapshot) -> Option<AmplifierEvent>,
    ) -> Result<(), AmplifierError> {
        if self.is_closed() {
            return Err(AmplifierError::new(name, "amplifier connection closed"));
        }
        tracing::debug!(command = name, "virtual amplifier command");
        let event = apply(&mut self.lock());
        if let Some(event) = event {
            self.emit(event);
        }
        Ok(())
    }

    fn step(&self, name: &'static str, up: bool) -> Result<(), AmplifierError> {
        self.command(name, |session| {
            let current = session.volume.get();
            let next = if up {
                current.saturating_add(1)
            } else {
                current.saturating_sub(1)
            };
            session.volume = Volume::saturating(next);
            Some(AmplifierEvent::Volume(session.volume))
        })
    }
}

impl AmplifierDriver for VirtualAmplifier {
    fn power_on(&self) -> Result<(), AmplifierError> {
        self.command("power_on", |session| {
            session.powered = true;
            Some(AmplifierEvent::Power(true))
        })
    }

    fn power_off(&self) -> Result<(), AmplifierError> {
        self.command("power_off", |session| {
            session.powered = false;
            session.input = None;
            Some(AmplifierEvent::Power(false))
        })
    }

    fn set_input(&self, input: Input) -> Result<(), AmplifierError> {
        self.command("set_input", |session| {
            session.input = Some(input);
            None
        })
    }

    fn set_beam_mode(&self, mode: BeamMode) -> Result<(), AmplifierError> {
        self.command("set_beam_mode", |session| {
            session.beam = Some(mode);
            None
        })
    }

    fn set_dsp(&self, program: DspProgram) -> Result<(), AmplifierError> {
        self.command("set_dsp", |session| {
            session.dsp = Some(program);
            None
        })
    }

    fn volume_up(&self) -> Result<(), AmplifierError> {
        self.step("volume_up", true)
    }

    fn volume_down(&self) -> Result<(), AmplifierError> {
        self.step("volume_down", false)
    }

    fn set_volume(&self, volume: Volume) -> Result<(), AmplifierError> {
        self.command("set_volume", |session| {
            session.volume = volume;
            Some(AmplifierEvent::Volume(volume))
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<AmplifierEvent> {
        self.events.subscribe()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        tracing::debug!("virtual amplifier closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_track_session_state() {
        let amp = VirtualAmplifier::default();
        amp.power_on().unwrap();
        amp.set_input(Input::Aux1).unwrap();
        amp.set_beam_mode(BeamMode::Stereo).unwrap();
        amp.set_dsp(DspProgram::Off).unwrap();

        let snapshot = amp.snapshot();
        assert!(snapshot.powered);
        assert_eq!(snapshot.input, Some(Input::Aux1));
        assert_eq!(snapshot.beam, Some(BeamMode::Stereo));
        assert_eq!(snapshot.dsp, Some(DspProgram::Off));
    }

    #[test]
    fn should_clear_input_on_power_off() {
        let amp = VirtualAmplifier::default();
        amp.power_on().unwrap();
        amp.set_input(Input::Tv).unwrap();

        amp.power_off().unwrap();

        assert!(!amp.snapshot().powered);
        assert_eq!(amp.snapshot().input, None);
    }

    #[tokio::test]
    async fn should_report_volume_changes() {
        let amp = VirtualAmplifier::default();
        let mut rx = amp.subscribe();

        amp.set_volume(Volume::new(42).unwrap()).unwrap();
        amp.volume_up().unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            AmplifierEvent::Volume(Volume::new(42).unwrap())
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            AmplifierEvent::Volume(Volume::new(43).unwrap())
        );
    }

    #[test]
    fn should_clamp_volume_steps() {
        let amp = VirtualAmplifier::default();
        amp.volume_down().unwrap();
        assert_eq!(amp.snapshot().volume, Volume::MIN);

        amp.set_volume(Volume::MAX).unwrap();
        amp.volume_up().unwrap();
        assert_eq!(amp.snapshot().volume, Volume::MAX);
    }

    #[tokio::test]
    async fn should_report_front_panel_changes() {
        let amp = VirtualAmplifier::default();
        let mut rx = amp.subscribe();

        amp.turn_knob(Volume::new(12).unwrap());

        assert_eq!(
            rx.recv().await.unwrap(),
            AmplifierEvent::Volume(Volume::new(12).unwrap())
        );
    }

    #[test]
    fn should_reject_commands_after_close() {
        let amp = VirtualAmplifier::default();
        amp.close();

        assert!(amp.is_closed());
        let err = amp.power_on().unwrap_err();
        assert_eq!(err.command, "power_on");
    }
}
