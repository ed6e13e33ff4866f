//! Short-lived footer notices.
//!
//! Showing a notice replaces the current one and schedules its expiry. Each
//! show bumps a generation; an expiry only clears the notice it was
//! scheduled for.

use std::time::Duration;

use neon_core::command::Command;
use neon_core::component::Component;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme_toggle::Palette;

const DEFAULT_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub level: Level,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: Level::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: Level::Success,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: Level::Warning,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Show(Notice),
    Dismiss,
    Expire(u64),
}

/// Footer line holding at most one notice.
pub struct Notices {
    current: Option<Notice>,
    generation: u64,
    duration: Duration,
    palette: Palette,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

impl Notices {
    pub fn new() -> Self {
        Self {
            current: None,
            generation: 0,
            duration: DEFAULT_DURATION,
            palette: Palette::DARK,
        }
    }

    /// How long a notice stays up. Zero falls back to 3 s.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = if duration.is_zero() {
            DEFAULT_DURATION
        } else {
            duration
        };
        self
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn show(&mut self, notice: Notice) -> Command<Message> {
        tracing::info!(level = ?notice.level, text = %notice.text, "notice");
        self.generation += 1;
        self.current = Some(notice);
        Command::after(self.duration, Message::Expire(self.generation))
    }

    fn level_style(&self, level: Level) -> Style {
        let color = match level {
            Level::Info => self.palette.accent,
            Level::Success => self.palette.success,
            Level::Warning => self.palette.warning,
        };
        Style::default().fg(color)
    }
}

impl Component for Notices {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Show(notice) => self.show(notice),
            Message::Dismiss => {
                self.current = None;
                Command::none()
            }
            Message::Expire(generation) => {
                if generation == self.generation {
                    self.current = None;
                }
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let Some(notice) = &self.current else {
            return;
        };
        let marker = match notice.level {
            Level::Info => "i",
            Level::Success => "+",
            Level::Warning => "!",
        };
        let style = self.level_style(notice.level);
        let line = Line::from(vec![
            Span::styled(format!(" {marker} "), style.add_modifier(Modifier::REVERSED)),
            Span::raw(" "),
            Span::styled(notice.text.as_str(), style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_schedules_expiry() {
        let mut notices = Notices::new().with_duration(Duration::from_millis(1500));
        let cmd = notices.show(Notice::success("Saved"));
        assert_eq!(notices.current().map(|n| n.text.as_str()), Some("Saved"));

        let (delay, msg) = cmd.into_delayed().unwrap();
        assert_eq!(delay, Duration::from_millis(1500));
        notices.update(msg);
        assert!(notices.current().is_none());
    }

    #[test]
    fn stale_expiry_keeps_newer_notice() {
        let mut notices = Notices::new();
        let first = notices.show(Notice::info("one"));
        notices.show(Notice::warning("two"));

        let (_, expire_first) = first.into_delayed().unwrap();
        notices.update(expire_first);
        assert_eq!(notices.current(), Some(&Notice::warning("two")));
    }

    #[test]
    fn zero_duration_uses_default() {
        let mut notices = Notices::new().with_duration(Duration::ZERO);
        let (delay, _) = notices.show(Notice::info("x")).into_delayed().unwrap();
        assert_eq!(delay, Duration::from_secs(3));
    }

    #[test]
    fn dismiss_clears() {
        let mut notices = Notices::new();
        notices.show(Notice::info("x"));
        notices.update(Message::Dismiss);
        assert!(notices.current().is_none());
    }
}
