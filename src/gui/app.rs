//! Iced control panel for a running tracking session.

use std::time::Duration;

use iced::widget::{
    button, column, container, horizontal_rule, horizontal_space, row, scrollable, text,
    text_input, vertical_space, Column,
};
use iced::keyboard::{self, key, Key, Modifiers};
use iced::{Element, Length, Subscription, Task, Theme};

use crate::calibration::{Axis, Offset};
use crate::tracking::{LoopHandle, SharedKey, TrackingMode};

use super::logger::Logger;

/// Offset change per button press, in metres.
pub const DEFAULT_STEP: f64 = 0.01;

/// How often the panel polls the loop.
const REFRESH_INTERVAL: Duration = Duration::from_millis(200);

/// Messages for the Iced application.
#[derive(Debug, Clone)]
pub enum Message {
    /// Move the offset one step along an axis; the sign picks the direction.
    Nudge(Axis, f64),
    StepChanged(String),
    Resume,
    Rebind,
    Refresh,
    /// Idle key pressed (`true`) or released.
    TriggerKey(bool),
}

/// Holding Space freezes the markers when the key trigger is configured.
fn is_trigger_key(pressed: &Key) -> bool {
    matches!(pressed, Key::Named(key::Named::Space))
}

fn trigger_pressed(pressed: Key, _modifiers: Modifiers) -> Option<Message> {
    is_trigger_key(&pressed).then_some(Message::TriggerKey(true))
}

fn trigger_released(released: Key, _modifiers: Modifiers) -> Option<Message> {
    is_trigger_key(&released).then_some(Message::TriggerKey(false))
}

/// Main application struct.
pub struct PoleOverlayApp {
    handle: LoopHandle,
    trigger_key: SharedKey,
    step: f64,
    step_input: String,
    mode: TrackingMode,
    offset: Offset,
    bound: Option<String>,
    running: bool,
    logger: Logger,
    status: String,
}

impl PoleOverlayApp {
    /// Panel controlling the loop behind `handle`.
    ///
    /// `trigger_key` must be the key source the session was built with.
    pub fn new(handle: LoopHandle, trigger_key: SharedKey) -> Self {
        Self::with_logger(handle, trigger_key, Logger::new())
    }

    pub fn with_logger(handle: LoopHandle, trigger_key: SharedKey, mut logger: Logger) -> Self {
        logger.info("Pole Overlay started");

        let calibration = handle.calibration();
        let bound = handle.binding().map(|device| device.serial);
        match &bound {
            Some(serial) => logger.success(format!("Bound to {}", serial)),
            None => logger.warning("No device bound, press Rebind once it is connected"),
        }

        Self {
            mode: handle.mode(),
            offset: calibration.offset(),
            running: true,
            bound,
            handle,
            trigger_key,
            step: DEFAULT_STEP,
            step_input: DEFAULT_STEP.to_string(),
            logger,
            status: "Ready".to_string(),
        }
    }

    pub fn title(&self) -> String {
        "Pole Overlay".to_string()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(REFRESH_INTERVAL).map(|_| Message::Refresh),
            keyboard::on_key_press(trigger_pressed),
            keyboard::on_key_release(trigger_released),
        ])
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Nudge(axis, sign) => {
                let delta = sign * self.step;
                match self.handle.nudge(axis, delta) {
                    Ok(()) => self.status = format!("{} {:+.4}", axis, delta),
                    Err(e) => self.logger.error(format!("Offset update failed: {}", e)),
                }
            }
            Message::StepChanged(value) => {
                if let Ok(step) = value.parse::<f64>() {
                    if step > 0.0 && step.is_finite() {
                        self.step = step;
                    }
                }
                self.step_input = value;
            }
            Message::Resume => {
                self.handle.resume();
                self.mode = self.handle.mode();
                self.logger.success("Tracking resumed");
            }
            Message::Rebind => match self.handle.rebind() {
                Ok(()) => self.logger.info("Rebinding..."),
                Err(e) => self.logger.error(format!("Rebind failed: {}", e)),
            },
            Message::Refresh => self.refresh(),
            Message::TriggerKey(held) => self.trigger_key.set_held(held),
        }
        Task::none()
    }

    fn refresh(&mut self) {
        let mode = self.handle.mode();
        if mode != self.mode {
            match mode {
                TrackingMode::Idle => self.logger.warning("Markers frozen"),
                TrackingMode::Tracking => self.logger.info("Tracking"),
            }
            self.mode = mode;
        }

        let bound = self.handle.binding().map(|device| device.serial);
        if bound != self.bound {
            match &bound {
                Some(serial) => self.logger.success(format!("Bound to {}", serial)),
                None => self.logger.warning("No device bound"),
            }
            self.bound = bound;
        }

        let offset = self.handle.calibration().offset();
        if offset != self.offset {
            self.logger.info(format!(
                "Offset set: x={:.4} y={:.4} z={:.4}",
                offset.x, offset.y, offset.z
            ));
            self.offset = offset;
        }

        let running = self.handle.is_running();
        if self.running && !running {
            self.logger.error("Tracking loop stopped");
            self.status = "Stopped".to_string();
        }
        self.running = running;
    }

    pub fn view(&self) -> Element<'_, Message> {
        let title = text("Pole Overlay").size(28);

        let axes = Column::with_children(Axis::ALL.iter().map(|axis| self.view_axis(*axis)))
            .spacing(10);

        let step = row![
            text("Step (m)").width(120),
            text_input("0.01", &self.step_input)
                .on_input(Message::StepChanged)
                .width(120),
        ]
        .spacing(10);

        let resume_btn = button(text("Resume").size(16))
            .on_press_maybe((self.mode == TrackingMode::Idle).then_some(Message::Resume))
            .style(button::success)
            .padding([10, 20]);

        let rebind_btn = button(text("Rebind").size(16))
            .on_press(Message::Rebind)
            .style(button::secondary)
            .padding([10, 20]);

        let log_view = scrollable(text(self.logger.format_all()).size(13)).height(Length::Fill);
        let log_container = container(log_view)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(10)
            .style(container::bordered_box);

        column![
            title,
            vertical_space().height(10),
            axes,
            step,
            row![resume_btn, rebind_btn].spacing(10),
            horizontal_rule(1),
            log_container,
            self.view_status_bar(),
        ]
        .spacing(10)
        .padding(20)
        .into()
    }

    fn view_axis(&self, axis: Axis) -> Element<'_, Message> {
        row![
            text(axis.to_string().to_uppercase()).width(40),
            button(text("-")).on_press(Message::Nudge(axis, -1.0)),
            text(format!("{:.4}", self.offset.get(axis))).width(100),
            button(text("+")).on_press(Message::Nudge(axis, 1.0)),
        ]
        .spacing(10)
        .into()
    }

    fn view_status_bar(&self) -> Element<'_, Message> {
        let mode_text = match (self.running, self.mode) {
            (false, _) => "Stopped",
            (true, TrackingMode::Tracking) => "Tracking",
            (true, TrackingMode::Idle) => "Idle",
        };
        let device = self
            .bound
            .as_deref()
            .map(|serial| format!("Device: {}", serial))
            .unwrap_or_else(|| "Device: none".to_string());

        row![
            text(mode_text).size(14),
            horizontal_space(),
            text(device).size(14),
            horizontal_space(),
            text(&self.status).size(14),
        ]
        .padding(10)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TrackerConfig, TriggerConfig};
    use crate::tracking::{KeySource, TickOutcome, TrackingSession};
    use crate::{CalibrationStore, RecordingOverlay, SimulatedRuntime};
    use std::sync::Arc;

    #[test]
    fn test_space_maps_to_trigger_messages() {
        let space = Key::Named(key::Named::Space);
        assert!(matches!(
            trigger_pressed(space.clone(), Modifiers::default()),
            Some(Message::TriggerKey(true))
        ));
        assert!(matches!(
            trigger_released(space, Modifiers::default()),
            Some(Message::TriggerKey(false))
        ));
        assert!(trigger_pressed(Key::Character("a".into()), Modifiers::default()).is_none());
    }

    #[test]
    fn test_trigger_key_freezes_session() {
        let dir = tempfile::tempdir().unwrap();
        let key = SharedKey::new();
        let config = TrackerConfig::default().with_trigger(TriggerConfig::Key);
        let mut session = TrackingSession::new(
            SimulatedRuntime::demo_room(),
            RecordingOverlay::new(),
            CalibrationStore::new(dir.path().join("config.json")),
            &config,
        )
        .unwrap()
        .with_key_source(Arc::new(key.clone()));
        let mut app =
            PoleOverlayApp::with_logger(session.handle(), key.clone(), Logger::with_file(None));

        let _ = app.update(Message::TriggerKey(true));
        assert!(key.is_held());
        assert_eq!(session.tick().unwrap(), TickOutcome::EnteredIdle);

        let _ = app.update(Message::TriggerKey(false));
        assert!(!key.is_held());
        let _ = app.update(Message::Resume);
        assert_eq!(session.tick().unwrap(), TickOutcome::Updated);
    }

    #[test]
    fn test_refresh_reports_offset_as_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = TrackingSession::new(
            SimulatedRuntime::demo_room(),
            RecordingOverlay::new(),
            CalibrationStore::new(dir.path().join("config.json")),
            &TrackerConfig::default(),
        )
        .unwrap();
        let mut app =
            PoleOverlayApp::with_logger(session.handle(), SharedKey::new(), Logger::with_file(None));

        let _ = app.update(Message::Nudge(Axis::Y, 1.0));
        session.tick().unwrap();
        let _ = app.update(Message::Refresh);

        assert!(app
            .logger
            .entries()
            .iter()
            .any(|entry| entry.message.starts_with("Offset set: x=0.0000 y=0.0100")));
        assert!(!app.logger.format_all().contains("saved"));
    }

    #[test]
    fn test_step_rejects_non_finite() {
        let dir = tempfile::tempdir().unwrap();
        let session = TrackingSession::new(
            SimulatedRuntime::demo_room(),
            RecordingOverlay::new(),
            CalibrationStore::new(dir.path().join("config.json")),
            &TrackerConfig::default(),
        )
        .unwrap();
        let mut app =
            PoleOverlayApp::with_logger(session.handle(), SharedKey::new(), Logger::with_file(None));

        let _ = app.update(Message::StepChanged("inf".to_string()));
        assert_eq!(app.step, DEFAULT_STEP);
        let _ = app.update(Message::StepChanged("0.5".to_string()));
        assert_eq!(app.step, 0.5);
    }
}
