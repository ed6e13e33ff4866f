//! Dark/light theme switch and the colors of each theme.

use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use neon_core::command::Command;
use neon_core::component::Component;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Page color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Read a stored theme flag. Only `"light"` selects the light theme.
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim() == "light" {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    /// The flag persisted for this theme.
    pub fn flag(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette::DARK,
            Theme::Light => Palette::LIGHT,
        }
    }
}

/// Colors of one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    /// Neon cyan: titles, the active indicator, the active link.
    pub accent: Color,
    /// Neon magenta: prices and secondary highlights.
    pub accent_alt: Color,
    pub success: Color,
    pub warning: Color,
}

impl Palette {
    pub const DARK: Palette = Palette {
        background: Color::Rgb(10, 10, 18),
        surface: Color::Rgb(22, 22, 36),
        text: Color::Rgb(230, 230, 240),
        muted: Color::Rgb(110, 110, 130),
        accent: Color::Rgb(0, 212, 255),
        accent_alt: Color::Rgb(255, 0, 170),
        success: Color::Rgb(57, 255, 20),
        warning: Color::Rgb(255, 200, 0),
    };

    pub const LIGHT: Palette = Palette {
        background: Color::Rgb(245, 245, 250),
        surface: Color::Rgb(228, 228, 238),
        text: Color::Rgb(20, 20, 30),
        muted: Color::Rgb(120, 120, 135),
        accent: Color::Rgb(0, 130, 170),
        accent_alt: Color::Rgb(190, 0, 120),
        success: Color::Rgb(20, 140, 40),
        warning: Color::Rgb(180, 110, 0),
    };

    /// Base style for the whole page.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

/// Messages for the theme toggle.
#[derive(Debug, Clone)]
pub enum Message {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Toggle,
    /// Emitted after the theme flips.
    Changed(Theme),
}

/// A one-line button that flips between the dark and light theme.
///
/// `t` or a click on the button toggles. The toggle emits
/// [`Message::Changed`]; persisting the choice is up to the page.
pub struct ThemeToggle {
    theme: Theme,
    area: Cell<Rect>,
}

impl ThemeToggle {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            area: Cell::new(Rect::default()),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn palette(&self) -> Palette {
        self.theme.palette()
    }

    /// Flip the theme.
    pub fn toggle(&mut self) -> Command<Message> {
        self.theme = self.theme.toggled();
        tracing::debug!(theme = self.theme.flag(), "theme toggled");
        Command::message(Message::Changed(self.theme))
    }

    fn label(&self) -> &'static str {
        match self.theme {
            Theme::Dark => "[ dark | light ]",
            Theme::Light => "[ light | dark ]",
        }
    }
}

impl Component for ThemeToggle {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Toggle => self.toggle(),
            Message::Key(key) if key.code == KeyCode::Char('t') => self.toggle(),
            Message::Mouse(event) if event.kind == MouseEventKind::Down(MouseButton::Left) => {
                if self.area.get().contains(Position::new(event.column, event.row)) {
                    self.toggle()
                } else {
                    Command::none()
                }
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let width = (self.label().len() as u16).min(area.width);
        let button = Rect::new(area.right().saturating_sub(width), area.y, width, area.height.min(1));
        self.area.set(button);

        let palette = self.palette();
        let line = Line::from(Span::styled(self.label(), palette.accent()));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn click(column: u16, row: u16) -> Message {
        Message::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn render(toggle: &ThemeToggle, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal
            .draw(|frame| toggle.view(frame, frame.area()))
            .unwrap();
        let buf = terminal.backend().buffer().clone();
        (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn only_light_flag_selects_light() {
        assert_eq!(Theme::from_flag("light"), Theme::Light);
        assert_eq!(Theme::from_flag("light\n"), Theme::Light);
        assert_eq!(Theme::from_flag("dark"), Theme::Dark);
        assert_eq!(Theme::from_flag(""), Theme::Dark);
        assert_eq!(Theme::from_flag("LIGHT"), Theme::Dark);
    }

    #[test]
    fn flag_round_trips() {
        for theme in [Theme::Dark, Theme::Light] {
            assert_eq!(Theme::from_flag(theme.flag()), theme);
        }
    }

    #[test]
    fn t_key_toggles_and_emits() {
        let mut toggle = ThemeToggle::new(Theme::Dark);
        let cmd = toggle.update(Message::Key(KeyEvent::from(KeyCode::Char('t'))));
        assert_eq!(toggle.theme(), Theme::Light);
        assert!(matches!(cmd.into_message(), Some(Message::Changed(Theme::Light))));

        let cmd = toggle.update(Message::Key(KeyEvent::from(KeyCode::Char('x'))));
        assert!(cmd.is_none());
        assert_eq!(toggle.theme(), Theme::Light);
    }

    #[test]
    fn click_on_button_toggles() {
        let mut toggle = ThemeToggle::new(Theme::Dark);
        let out = render(&toggle, 30);
        assert!(out.ends_with("[ dark | light ]"));

        let cmd = toggle.update(click(2, 0));
        assert!(cmd.is_none());
        assert_eq!(toggle.theme(), Theme::Dark);

        toggle.update(click(29, 0));
        assert_eq!(toggle.theme(), Theme::Light);
        assert!(render(&toggle, 30).ends_with("[ light | dark ]"));
    }

    #[test]
    fn palettes_differ() {
        assert_ne!(Theme::Dark.palette(), Theme::Light.palette());
        assert_eq!(Theme::Dark.palette().accent, Color::Rgb(0, 212, 255));
    }
}
