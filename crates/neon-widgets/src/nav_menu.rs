//! Top navigation: inline links on wide layouts, a hamburger menu on narrow
//! ones.
//!
//! Links come from the `nav-list` section. A link may carry a category; the
//! page filters the product grid when such a link is followed.

use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use neon_core::command::Command;
use neon_core::component::Component;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::error::MountError;
use crate::markup::Markup;
use crate::theme_toggle::Palette;

/// Section id holding the navigation links.
pub const NAV_ID: &str = "nav-list";
/// Panel class that marks a navigation link.
pub const NAV_LINK_CLASS: &str = "nav-link";

const HAMBURGER: &str = "[=] Menu";
const HIGHLIGHT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Toggle,
    Close,
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Emitted when the link at this index is followed.
    Navigate(usize),
}

#[derive(Debug, Clone)]
pub struct NavStyle {
    pub link: Style,
    pub active: Style,
    pub highlighted: Style,
    pub hamburger: Style,
}

impl Default for NavStyle {
    fn default() -> Self {
        Self::from_palette(&Palette::DARK)
    }
}

impl NavStyle {
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            link: Style::default().fg(palette.text),
            active: palette.accent().add_modifier(Modifier::UNDERLINED),
            highlighted: Style::default().fg(palette.background).bg(palette.accent),
            hamburger: palette.accent(),
        }
    }
}

pub struct NavMenu {
    links: Vec<NavLink>,
    compact: bool,
    open: bool,
    highlighted: usize,
    active: Option<usize>,
    style: NavStyle,
    area: Cell<Rect>,
}

impl NavMenu {
    /// Mount from the `nav-list` section.
    pub fn mount(markup: &Markup) -> Result<Self, MountError> {
        let Some(section) = markup.section(NAV_ID) else {
            tracing::error!(container = NAV_ID, "navigation list not found");
            return Err(MountError::ContainerNotFound(NAV_ID.to_string()));
        };
        let links: Vec<NavLink> = section
            .panels_with_class(NAV_LINK_CLASS)
            .map(|panel| NavLink {
                label: panel.title.clone(),
                category: panel.category.clone(),
            })
            .collect();
        tracing::info!(links = links.len(), "navigation initialized");

        Ok(Self {
            links,
            compact: false,
            open: false,
            highlighted: 0,
            active: None,
            style: NavStyle::default(),
            area: Cell::new(Rect::default()),
        })
    }

    pub fn set_style(&mut self, style: NavStyle) {
        self.style = style;
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn link(&self, index: usize) -> Option<&NavLink> {
        self.links.get(index)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Switch between the hamburger (compact) and inline layouts. Leaving
    /// compact mode closes the menu.
    pub fn set_compact(&mut self, compact: bool) {
        self.compact = compact;
        if !compact {
            self.open = false;
        }
    }

    /// Mark the link carrying `category` as active, or none.
    pub fn set_active_category(&mut self, category: &str) {
        self.active = self
            .links
            .iter()
            .position(|link| link.category.as_deref() == Some(category));
    }

    /// Rows the menu needs at the current state.
    pub fn height(&self) -> u16 {
        if self.compact && self.open {
            1 + self.links.len() as u16
        } else {
            1
        }
    }

    fn toggle(&mut self) {
        if !self.compact {
            return;
        }
        self.open = !self.open;
        if self.open {
            self.highlighted = self.active.unwrap_or(0);
        }
        tracing::debug!(open = self.open, "menu toggled");
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn follow(&mut self, index: usize) -> Command<Message> {
        if index >= self.links.len() {
            return Command::none();
        }
        if self.open {
            self.open = false;
            tracing::debug!("menu closed after link click");
        }
        self.active = Some(index);
        Command::message(Message::Navigate(index))
    }

    fn hamburger_box(&self, area: Rect) -> Rect {
        if !self.compact || area.is_empty() {
            return Rect::default();
        }
        Rect::new(area.x, area.y, (HAMBURGER.width() as u16).min(area.width), 1)
    }

    /// Hit boxes of the links that are currently on screen.
    fn link_boxes(&self, area: Rect) -> Vec<Rect> {
        if self.compact {
            if !self.open {
                return Vec::new();
            }
            return (0..self.links.len() as u16)
                .map(|i| Rect::new(area.x, area.y + 1 + i, area.width, 1))
                .filter(|r| r.y < area.bottom())
                .collect();
        }

        let mut boxes = Vec::with_capacity(self.links.len());
        let mut x = area.x;
        for link in &self.links {
            let width = link.label.width() as u16 + 2;
            if x + width > area.right() {
                break;
            }
            boxes.push(Rect::new(x, area.y, width, 1));
            x += width + 1;
        }
        boxes
    }

    fn link_style(&self, index: usize) -> Style {
        if self.compact && self.open && index == self.highlighted {
            self.style.highlighted
        } else if self.active == Some(index) {
            self.style.active
        } else {
            self.style.link
        }
    }
}

impl Component for NavMenu {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Toggle => {
                self.toggle();
                Command::none()
            }
            Message::Close => {
                self.close();
                Command::none()
            }
            Message::Key(key) => match key.code {
                KeyCode::Char('m') => {
                    self.toggle();
                    Command::none()
                }
                KeyCode::Esc if self.open => {
                    self.close();
                    Command::none()
                }
                KeyCode::Up if self.open => {
                    self.highlighted = self.highlighted.saturating_sub(1);
                    Command::none()
                }
                KeyCode::Down if self.open => {
                    if self.highlighted + 1 < self.links.len() {
                        self.highlighted += 1;
                    }
                    Command::none()
                }
                KeyCode::Enter if self.open => self.follow(self.highlighted),
                _ => Command::none(),
            },
            Message::Mouse(event) if event.kind == MouseEventKind::Down(MouseButton::Left) => {
                let area = self.area.get();
                let position = Position::new(event.column, event.row);
                if self.hamburger_box(area).contains(position) {
                    self.toggle();
                    return Command::none();
                }
                match self
                    .link_boxes(area)
                    .iter()
                    .position(|r| r.contains(position))
                {
                    Some(index) => self.follow(index),
                    None => Command::none(),
                }
            }
            Message::Mouse(_) | Message::Navigate(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        self.area.set(area);
        if area.is_empty() {
            return;
        }

        if self.compact {
            frame.render_widget(
                Paragraph::new(Span::styled(HAMBURGER, self.style.hamburger)),
                self.hamburger_box(area),
            );
        }

        for (i, rect) in self.link_boxes(area).into_iter().enumerate() {
            let label = if self.compact {
                let marker = if i == self.highlighted { HIGHLIGHT } else { "  " };
                format!("{marker}{}", self.links[i].label)
            } else {
                format!(" {} ", self.links[i].label)
            };
            frame.render_widget(
                Paragraph::new(Span::styled(label, self.link_style(i))),
                rect,
            );
        }
    }
}
