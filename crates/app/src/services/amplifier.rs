//! Amplifier facade — the one handle every audio device shares.
//!
//! Wraps an [`AmplifierDriver`] with the settle delay required after a soft
//! power-off and a volume cache fed by the driver's push notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::sync::broadcast;

use mediacenter_domain::amplifier::{AmplifierEvent, BeamMode, DspProgram, Input, Volume};
use mediacenter_domain::error::AmplifierError;

use crate::observer::{ObserverId, ObserverList, ObserverResult, Subscription};
use crate::ports::{AmplifierDriver, Clock};

/// Time the amplifier needs after a soft power-off before its supply may be cut.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

pub struct AmplifierFacade<A, C> {
    driver: A,
    clock: C,
    settle_delay: Duration,
    volume: AtomicU8,
    observers: Arc<ObserverList<Volume>>,
}

impl<A: AmplifierDriver, C: Clock> AmplifierFacade<A, C> {
    pub fn new(driver: A, clock: C) -> Self {
        Self {
            driver,
            clock,
            settle_delay: DEFAULT_SETTLE_DELAY,
            volume: AtomicU8::new(Volume::MIN.get()),
            observers: Arc::new(ObserverList::default()),
        }
    }

    #[must_use]
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn power_on(&self) -> Result<(), AmplifierError> {
        tracing::debug!("amplifier power on");
        self.driver.power_on()
    }

    /// Soft power-off, then wait for the device to settle.
    ///
    /// Only once this returns `Ok` may the amplifier's supply relay be cut.
    /// On error no wait happens.
    ///
    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    #[tracing::instrument(skip(self))]
    pub async fn power_off(&self) -> Result<(), AmplifierError> {
        self.driver.power_off()?;
        self.clock.sleep(self.settle_delay).await;
        tracing::debug!("amplifier settled");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn set_input_tv(&self) -> Result<(), AmplifierError> {
        self.driver.set_input(Input::Tv)
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn set_input_aux1(&self) -> Result<(), AmplifierError> {
        self.driver.set_input(Input::Aux1)
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn set_five_beam(&self) -> Result<(), AmplifierError> {
        self.driver.set_beam_mode(BeamMode::FiveBeam)
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn set_stereo(&self) -> Result<(), AmplifierError> {
        self.driver.set_beam_mode(BeamMode::Stereo)
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn set_dsp_cinema(&self) -> Result<(), AmplifierError> {
        self.driver.set_dsp(DspProgram::Cinema)
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn set_dsp_off(&self) -> Result<(), AmplifierError> {
        self.driver.set_dsp(DspProgram::Off)
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn volume_up(&self) -> Result<(), AmplifierError> {
        self.driver.volume_up()
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn volume_down(&self) -> Result<(), AmplifierError> {
        self.driver.volume_down()
    }

    /// Request an absolute volume. The cache only changes once the device
    /// reports the new value.
    ///
    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn set_volume(&self, volume: Volume) -> Result<(), AmplifierError> {
        self.driver.set_volume(volume)
    }

    /// Last volume the device reported; `0` before any report.
    #[must_use]
    pub fn volume(&self) -> Volume {
        Volume::saturating(self.volume.load(Ordering::Acquire))
    }

    /// Register a volume observer until [`remove_volume_observer`](Self::remove_volume_observer).
    pub fn on_volume_changed<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(Volume) -> ObserverResult + Send + Sync + 'static,
    {
        self.observers.add(observer)
    }

    /// Register a volume observer for the lifetime of the returned guard.
    pub fn subscribe_volume<F>(&self, observer: F) -> Subscription<Volume>
    where
        F: Fn(Volume) -> ObserverResult + Send + Sync + 'static,
    {
        Subscription::new(&self.observers, observer)
    }

    pub fn remove_volume_observer(&self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Receiver for the driver's push notifications, to feed [`listen`](Self::listen).
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<AmplifierEvent> {
        self.driver.subscribe()
    }

    /// Apply one pushed notification.
    pub fn handle_event(&self, event: AmplifierEvent) {
        match event {
            AmplifierEvent::Volume(volume) => {
                self.volume.store(volume.get(), Ordering::Release);
                tracing::debug!(volume = %volume, "amplifier volume changed");
                self.observers.notify(volume);
            }
            AmplifierEvent::Power(on) => {
                tracing::debug!(on, "amplifier reported power state");
            }
        }
    }

    /// Pump notifications from `events` until the driver closes the stream.
    pub async fn listen(&self, mut events: broadcast::Receiver<AmplifierEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "amplifier notifications lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("amplifier notification stream closed");
                    break;
                }
            }
        }
    }

    /// Tear the driver down. Called once at process exit.
    pub fn close(&self) {
        tracing::info!("closing amplifier");
        self.driver.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeAmplifier, RecordingClock};
    use std::sync::Mutex;

    type Facade = AmplifierFacade<Arc<FakeAmplifier>, Arc<RecordingClock>>;

    fn make_facade() -> (Arc<FakeAmplifier>, Arc<RecordingClock>, Facade) {
        let driver = Arc::new(FakeAmplifier::default());
        let clock = Arc::new(RecordingClock::default());
        let facade = AmplifierFacade::new(Arc::clone(&driver), Arc::clone(&clock));
        (driver, clock, facade)
    }

    fn volume(v: i64) -> Volume {
        Volume::new(v).unwrap()
    }

    #[test]
    fn should_report_zero_before_any_notification() {
        let (_, _, facade) = make_facade();
        assert_eq!(facade.volume(), Volume::MIN);
    }

    #[test]
    fn should_cache_notified_volume() {
        let (_, _, facade) = make_facade();
        facade.handle_event(AmplifierEvent::Volume(volume(42)));
        assert_eq!(facade.volume().get(), 42);
    }

    #[test]
    fn should_not_touch_cache_on_set_volume() {
        let (driver, _, facade) = make_facade();
        facade.set_volume(volume(30)).unwrap();
        assert_eq!(driver.state().volume, Some(volume(30)));
        assert_eq!(facade.volume(), Volume::MIN);
    }

    #[tokio::test]
    async fn should_settle_after_power_off() {
        let (driver, clock, facade) = make_facade();
        facade.power_on().unwrap();

        facade.power_off().await.unwrap();

        assert!(!driver.state().powered);
        assert_eq!(clock.sleeps(), vec![DEFAULT_SETTLE_DELAY]);
    }

    #[tokio::test]
    async fn should_use_configured_settle_delay() {
        let (_, clock, facade) = make_facade();
        let facade = facade.with_settle_delay(Duration::from_millis(250));

        facade.power_off().await.unwrap();

        assert_eq!(clock.sleeps(), vec![Duration::from_millis(250)]);
    }

    #[tokio::test]
    async fn should_not_settle_when_power_off_fails() {
        let (driver, clock, facade) = make_facade();
        driver.fail_power_off(true);

        let err = facade.power_off().await.unwrap_err();

        assert_eq!(err.command, "power_off");
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn should_forward_mode_commands() {
        let (driver, _, facade) = make_facade();
        facade.set_input_aux1().unwrap();
        facade.set_stereo().unwrap();
        facade.set_dsp_cinema().unwrap();

        let state = driver.state();
        assert_eq!(state.input, Some(Input::Aux1));
        assert_eq!(state.beam, Some(BeamMode::Stereo));
        assert_eq!(state.dsp, Some(DspProgram::Cinema));
    }

    #[test]
    fn should_notify_remaining_observers_when_one_fails() {
        let (_, _, facade) = make_facade();
        let seen = Arc::new(Mutex::new(Vec::new()));

        facade.on_volume_changed(|_| Err("display offline".into()));
        let sink = Arc::clone(&seen);
        facade.on_volume_changed(move |v| {
            sink.lock().unwrap().push(v.get());
            Ok(())
        });

        facade.handle_event(AmplifierEvent::Volume(volume(17)));
        assert_eq!(*seen.lock().unwrap(), vec![17]);
    }

    #[test]
    fn should_stop_notifying_removed_observer() {
        let (_, _, facade) = make_facade();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = facade.on_volume_changed(move |v| {
            sink.lock().unwrap().push(v.get());
            Ok(())
        });

        facade.handle_event(AmplifierEvent::Volume(volume(1)));
        assert!(facade.remove_volume_observer(id));
        facade.handle_event(AmplifierEvent::Volume(volume(2)));

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(facade.volume().get(), 2);
    }

    #[tokio::test]
    async fn should_pump_notifications_until_stream_closes() {
        let (_, _, facade) = make_facade();
        let (tx, rx) = broadcast::channel(8);
        tx.send(AmplifierEvent::Power(true)).unwrap();
        tx.send(AmplifierEvent::Volume(volume(42))).unwrap();
        drop(tx);

        facade.listen(rx).await;

        assert_eq!(facade.volume().get(), 42);
    }

    #[tokio::test]
    async fn should_receive_driver_events() {
        let (driver, _, facade) = make_facade();
        let mut rx = facade.events();
        driver.emit(AmplifierEvent::Volume(volume(5)));

        facade.handle_event(rx.recv().await.unwrap());
        assert_eq!(facade.volume().get(), 5);
    }

    #[test]
    fn should_close_driver() {
        let (driver, _, facade) = make_facade();
        facade.close();
        assert!(driver.is_closed());
    }
}
