//! Async pomodoro session.
//!
//! A session is one tokio task that owns a [`PomodoroEngine`], its
//! [`TickScheduler`] and an [`AlarmPlayer`]. Commands arrive over a channel
//! and ticks come from the scheduler; both are handled in the same loop, so
//! the engine has exactly one writer and needs no locking.
//!
//! The presentation side holds a [`SessionHandle`]: it sends commands and
//! reads the latest [`TimerSnapshot`] from a watch channel. Every event the
//! engine produces is also forwarded on an unbounded channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::alarm::{AlarmOutcome, AlarmPlayer};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::settings::PomodoroSettings;
use crate::timer::{PomodoroEngine, TickScheduler, TimerSnapshot};

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Start,
    Pause,
    Reset,
    Skip,
    /// Ring the alarm once at the current volume without touching the timer.
    PlayAlarm,
    ApplySettings(PomodoroSettings),
    Shutdown,
}

enum Step {
    Command(Option<SessionCommand>),
    Tick,
}

pub struct PomodoroSession {
    engine: PomodoroEngine,
    ticker: TickScheduler,
    alarm: Arc<AlarmPlayer>,
    commands: mpsc::Receiver<SessionCommand>,
    snapshots: watch::Sender<TimerSnapshot>,
    events: mpsc::UnboundedSender<Event>,
}

impl PomodoroSession {
    /// Spawn the session loop on the current tokio runtime.
    ///
    /// The join handle yields the engine's final state after shutdown.
    pub fn spawn(
        engine: PomodoroEngine,
        alarm: Arc<AlarmPlayer>,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<Event>, JoinHandle<PomodoroEngine>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let session = Self {
            engine,
            ticker: TickScheduler::default(),
            alarm,
            commands: command_rx,
            snapshots: snapshot_tx,
            events: event_tx,
        };
        let join = tokio::spawn(session.run());

        let handle = SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (handle, event_rx, join)
    }

    async fn run(mut self) -> PomodoroEngine {
        tracing::debug!("Pomodoro session started");
        loop {
            self.ticker.sync(self.engine.is_counting());

            let step = tokio::select! {
                biased;
                cmd = self.commands.recv() => Step::Command(cmd),
                _ = self.ticker.next_tick() => Step::Tick,
            };

            let ring = match step {
                Step::Command(None) | Step::Command(Some(SessionCommand::Shutdown)) => break,
                Step::Command(Some(cmd)) => self.handle(cmd),
                Step::Tick => self.on_tick(),
            };
            // Publish first: the new state never waits on the audio device.
            self.snapshots.send_replace(self.engine.snapshot());
            if ring {
                self.ring();
            }
        }
        self.ticker.deactivate();
        tracing::debug!("Pomodoro session stopped");
        self.engine
    }

    /// Returns true if the alarm should ring.
    fn handle(&mut self, cmd: SessionCommand) -> bool {
        let event = match cmd {
            SessionCommand::Start => self.engine.start(),
            SessionCommand::Pause => self.engine.pause(),
            SessionCommand::Reset => Some(self.engine.reset()),
            SessionCommand::Skip => Some(self.engine.skip()),
            SessionCommand::PlayAlarm => return true,
            SessionCommand::ApplySettings(settings) => Some(self.engine.apply_settings(settings)),
            SessionCommand::Shutdown => None,
        };
        if let Some(event) = event {
            self.emit(event);
        }
        false
    }

    /// Returns true on the zero-crossing, after the engine has advanced.
    fn on_tick(&mut self) -> bool {
        let Some(event) = self.engine.tick() else {
            return false;
        };
        self.ticker.deactivate();
        self.emit(event);
        true
    }

    /// Notifiers wait for the output device to open, so they run on the
    /// blocking pool and the loop moves on immediately.
    fn ring(&self) {
        let alarm = Arc::clone(&self.alarm);
        let volume = self.engine.settings().alarm_volume;
        tokio::task::spawn_blocking(move || {
            if alarm.play(volume) == AlarmOutcome::Silent {
                tracing::debug!("No alarm notifier could play");
            }
        });
    }

    fn emit(&self, event: Event) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}

/// Presentation-side handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<TimerSnapshot>,
}

impl SessionHandle {
    pub async fn send(&self, cmd: SessionCommand) -> Result<()> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| CoreError::SessionClosed)
    }

    pub async fn start(&self) -> Result<()> {
        self.send(SessionCommand::Start).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(SessionCommand::Pause).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.send(SessionCommand::Reset).await
    }

    pub async fn skip(&self) -> Result<()> {
        self.send(SessionCommand::Skip).await
    }

    pub async fn play_alarm(&self) -> Result<()> {
        self.send(SessionCommand::PlayAlarm).await
    }

    pub async fn apply_settings(&self, settings: PomodoroSettings) -> Result<()> {
        self.send(SessionCommand::ApplySettings(settings)).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(SessionCommand::Shutdown).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified on every state publish.
    pub fn watch(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.clone()
    }
}
