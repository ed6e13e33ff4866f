//! "Back to top" button shown once the product grid is scrolled far enough.

use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use neon_core::command::Command;
use neon_core::component::Component;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const DEFAULT_THRESHOLD: u16 = 8;
const LABEL: &str = " ^ top ";

#[derive(Debug, Clone)]
pub enum Message {
    /// The watched scroll offset changed.
    Scrolled(u16),
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Emitted when the button is used; the page scrolls to the top.
    Activated,
}

pub struct BackToTop {
    threshold: u16,
    visible: bool,
    style: Style,
    area: Cell<Rect>,
}

impl Default for BackToTop {
    fn default() -> Self {
        Self::new()
    }
}

impl BackToTop {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            visible: false,
            style: Style::default(),
            area: Cell::new(Rect::default()),
        }
    }

    /// Rows scrolled past before the button appears.
    pub fn with_threshold(mut self, rows: u16) -> Self {
        self.threshold = rows;
        self
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn activate(&self) -> Command<Message> {
        if self.visible {
            tracing::debug!("back to top");
            Command::message(Message::Activated)
        } else {
            Command::none()
        }
    }
}

impl Component for BackToTop {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Scrolled(offset) => {
                self.visible = offset > self.threshold;
                Command::none()
            }
            Message::Key(key) if key.code == KeyCode::Home => self.activate(),
            Message::Mouse(event) if event.kind == MouseEventKind::Down(MouseButton::Left) => {
                if self.area.get().contains(Position::new(event.column, event.row)) {
                    self.activate()
                } else {
                    Command::none()
                }
            }
            _ => Command::none(),
        }
    }

    /// Draws in the bottom-right corner of `area` while visible.
    fn view(&self, frame: &mut Frame, area: Rect) {
        if !self.visible || area.is_empty() {
            self.area.set(Rect::default());
            return;
        }
        let width = (LABEL.len() as u16).min(area.width);
        let button = Rect::new(area.right() - width, area.bottom() - 1, width, 1);
        self.area.set(button);
        frame.render_widget(Paragraph::new(Span::styled(LABEL, self.style)), button);
    }
}
