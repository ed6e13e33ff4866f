//! Auto-advancing slide carousel with arrows, indicator dots and
//! hover-aware autoplay.
//!
//! The carousel mounts from a markup section (`news-pages`) and turns each
//! `news-page` panel into a slide. Exactly one slide is shown at rest. A
//! navigation hands off between two slides in two delayed steps: the incoming
//! slide settles opaque after [`FADE_IN_DELAY`], the outgoing slide is
//! detached to the overlay layer after the configured transition time.
//!
//! Delayed steps carry the generation of the navigation that scheduled them.
//! A newer navigation bumps the generation, so late steps from an earlier one
//! are dropped instead of disturbing the slides now on screen.

use std::cell::Cell;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use neon_core::command::Command;
use neon_core::component::Component;
use neon_core::subscription::{subscribe, Subscription};
use neon_core::subscriptions::Every;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::error::MountError;
use crate::markup::{Markup, Panel};
use crate::theme_toggle::Palette;

/// Section id the carousel mounts from.
pub const CONTAINER_ID: &str = "news-pages";
/// Panel class that marks a slide.
pub const SLIDE_CLASS: &str = "news-page";
/// Delay before an incoming slide settles fully opaque.
pub const FADE_IN_DELAY: Duration = Duration::from_millis(50);

const AUTOPLAY_TIMER: &str = "carousel-autoplay";
const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);
const DEFAULT_TRANSITION: Duration = Duration::from_millis(500);
const ARROW_WIDTH: u16 = 3;

/// Carousel settings, fixed once mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselConfig {
    /// Start playing as soon as the carousel mounts (default: true).
    pub autoplay: bool,
    /// Time between automatic advances (default: 5 s).
    pub interval: Duration,
    /// Time an outgoing slide takes to fade out and detach (default: 500 ms).
    pub transition: Duration,
    /// Hold autoplay while the pointer is over the carousel (default: true).
    pub pause_on_hover: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            interval: DEFAULT_INTERVAL,
            transition: DEFAULT_TRANSITION,
            pause_on_hover: true,
        }
    }
}

impl CarouselConfig {
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_pause_on_hover(mut self, pause_on_hover: bool) -> Self {
        self.pause_on_hover = pause_on_hover;
        self
    }

    /// Zero durations fall back to the defaults.
    fn normalized(mut self) -> Self {
        if self.interval.is_zero() {
            self.interval = DEFAULT_INTERVAL;
        }
        if self.transition.is_zero() {
            self.transition = DEFAULT_TRANSITION;
        }
        self
    }
}

/// Autoplay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// A reason autoplay is held back without being paused on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// The pointer is over the carousel.
    Hover,
    /// The page is not visible.
    PageHidden,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Holds {
    hover: bool,
    page_hidden: bool,
}

impl Holds {
    fn flag(&mut self, hold: Hold) -> &mut bool {
        match hold {
            Hold::Hover => &mut self.hover,
            Hold::PageHidden => &mut self.page_hidden,
        }
    }

    fn is_empty(&self) -> bool {
        !self.hover && !self.page_hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

/// Whether a slide takes up space in the layout or sits overlaid on the
/// same box without affecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Flow,
    Overlay,
}

/// Visual state of one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideStyle {
    pub visibility: Visibility,
    pub layer: Layer,
    pub placement: Placement,
    /// Fully faded in. A visible slide that is not yet opaque renders dimmed.
    pub opaque: bool,
    /// Carries the "current slide" marker.
    pub active: bool,
}

impl SlideStyle {
    /// The resting style of the current slide.
    pub const SHOWN: SlideStyle = SlideStyle {
        visibility: Visibility::Visible,
        layer: Layer::Foreground,
        placement: Placement::Flow,
        opaque: true,
        active: true,
    };

    /// The resting style of every other slide.
    pub const CONCEALED: SlideStyle = SlideStyle {
        visibility: Visibility::Hidden,
        layer: Layer::Background,
        placement: Placement::Overlay,
        opaque: false,
        active: false,
    };
}

/// One slide of the carousel.
#[derive(Debug, Clone)]
pub struct Slide {
    title: String,
    body: String,
    style: SlideStyle,
}

impl Slide {
    fn from_panel(panel: &Panel) -> Self {
        Self {
            title: panel.title.clone(),
            body: panel.body.clone(),
            style: SlideStyle::CONCEALED,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn style(&self) -> SlideStyle {
        self.style
    }
}

/// The two delayed steps of a slide handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStep {
    /// The incoming slide becomes opaque and active.
    FadeIn,
    /// The outgoing slide leaves the layout flow and drops its active marker.
    Detach,
}

/// An in-flight handoff between two slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub generation: u64,
    pub from: usize,
    pub to: usize,
    pub started: Instant,
    faded_in: bool,
    detached: bool,
}

/// Transition state machine: `Idle -> Transitioning -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Transitioning(Transition),
}

/// Messages for the carousel component.
#[derive(Debug, Clone)]
pub enum Message {
    /// Show the previous slide, wrapping to the last.
    Previous,
    /// Show the next slide, wrapping to the first.
    Next,
    /// Show the slide at this index. Out-of-range indices are ignored.
    GoTo(usize),
    Play,
    Pause,
    /// Pause and return to the first slide.
    Stop,
    /// Pause when playing, play otherwise.
    TogglePlayback,
    /// Hold autoplay for a reason other than an explicit pause.
    Hold(Hold),
    /// Drop a hold; autoplay resumes once no holds remain.
    Release(Hold),
    PointerEnter,
    PointerLeave,
    /// A key press from anywhere on the page.
    Key(KeyEvent),
    /// A mouse event from anywhere on the page; hit-tested against the
    /// carousel's last rendered area.
    Mouse(MouseEvent),
    /// Autoplay timer tick.
    Tick,
    /// A delayed transition step coming due.
    Settle { generation: u64, step: SettleStep },
}

/// Style configuration for the carousel.
#[derive(Debug, Clone)]
pub struct CarouselStyle {
    pub border: Style,
    pub title: Style,
    pub body: Style,
    pub arrow: Style,
    pub active_dot: Style,
    pub inactive_dot: Style,
}

impl Default for CarouselStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            body: Style::default(),
            arrow: Style::default().fg(Color::Cyan),
            active_dot: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            inactive_dot: Style::default().fg(Color::DarkGray),
        }
    }
}

impl CarouselStyle {
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            border: Style::default().fg(palette.muted),
            title: palette.accent(),
            body: Style::default().fg(palette.text),
            arrow: Style::default().fg(palette.accent),
            active_dot: palette.accent(),
            inactive_dot: palette.muted(),
        }
    }
}

/// Where the carousel's parts land inside its area. Shared by rendering and
/// hit-testing so clicks line up with what is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Controls {
    slide: Rect,
    previous: Rect,
    next: Rect,
    indicators: Vec<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Previous,
    Next,
    Indicator(usize),
}

impl Controls {
    fn layout(area: Rect, count: usize) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        if inner.width < ARROW_WIDTH * 2 + 1 || inner.height < 2 {
            return Self {
                slide: inner,
                previous: Rect::default(),
                next: Rect::default(),
                indicators: Vec::new(),
            };
        }

        let content_height = inner.height - 1;
        let arrow_row = inner.y + content_height / 2;
        let previous = Rect::new(inner.x, arrow_row, ARROW_WIDTH, 1);
        let next = Rect::new(inner.right() - ARROW_WIDTH, arrow_row, ARROW_WIDTH, 1);
        let slide = Rect::new(
            inner.x + ARROW_WIDTH,
            inner.y,
            inner.width - ARROW_WIDTH * 2,
            content_height,
        );

        // Dots are one cell wide with one cell between them, centered.
        let dots = u16::try_from(count).ok().and_then(|count| {
            let width = count.checked_mul(2)?.saturating_sub(1);
            (width <= inner.width).then_some((count, width))
        });
        let indicators = match dots {
            Some((count, width)) => {
                let start = inner.x + (inner.width - width) / 2;
                let row = inner.bottom() - 1;
                (0..count)
                    .map(|i| Rect::new(start + i * 2, row, 1, 1))
                    .collect()
            }
            None => Vec::new(),
        };

        Self {
            slide,
            previous,
            next,
            indicators,
        }
    }

    fn target_at(&self, position: Position) -> Option<Target> {
        if self.previous.contains(position) {
            return Some(Target::Previous);
        }
        if self.next.contains(position) {
            return Some(Target::Next);
        }
        self.indicators
            .iter()
            .position(|dot| dot.contains(position))
            .map(Target::Indicator)
    }
}

/// The slide carousel.
///
/// Build one with [`Carousel::mount`]. The page owns it and forwards every
/// key and mouse event to it; the carousel decides what concerns it.
pub struct Carousel {
    slides: Vec<Slide>,
    cursor: usize,
    playback: PlaybackState,
    holds: Holds,
    hovered: bool,
    generation: u64,
    phase: TransitionPhase,
    config: CarouselConfig,
    style: CarouselStyle,
    area: Cell<Rect>,
}

impl Carousel {
    /// Mount from the section `container_id` of `markup`.
    ///
    /// Slide 0 is shown, every other slide is concealed, and autoplay starts
    /// if configured. Fails, after logging a warning, when the container is
    /// missing or holds no slides.
    pub fn mount(
        markup: &Markup,
        container_id: &str,
        config: CarouselConfig,
    ) -> Result<Self, MountError> {
        let Some(section) = markup.section(container_id) else {
            tracing::warn!(container = container_id, "carousel container not found");
            return Err(MountError::ContainerNotFound(container_id.to_string()));
        };

        let slides: Vec<Slide> = section
            .panels_with_class(SLIDE_CLASS)
            .map(Slide::from_panel)
            .collect();
        if slides.is_empty() {
            tracing::warn!(container = container_id, "no carousel slides found");
            return Err(MountError::NoSlides(container_id.to_string()));
        }

        let mut carousel = Self {
            slides,
            cursor: 0,
            playback: PlaybackState::Stopped,
            holds: Holds::default(),
            hovered: false,
            generation: 0,
            phase: TransitionPhase::Idle,
            config: config.normalized(),
            style: CarouselStyle::default(),
            area: Cell::new(Rect::default()),
        };
        carousel.slides[0].style = SlideStyle::SHOWN;

        if carousel.config.autoplay {
            carousel.play();
        }

        tracing::info!(slides = carousel.slides.len(), "carousel initialized");
        Ok(carousel)
    }

    /// Set the carousel style.
    pub fn with_style(mut self, style: CarouselStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the style in place (theme switches).
    pub fn set_style(&mut self, style: CarouselStyle) {
        self.style = style;
    }

    /// Index of the current slide.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false once mounted.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Indicator states in slide order; only the current slide's is active.
    pub fn indicators(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.slides.len()).map(move |i| i == self.cursor)
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Whether autoplay is paused by a hold rather than on purpose.
    pub fn is_held(&self) -> bool {
        self.playback == PlaybackState::Paused && !self.holds.is_empty()
    }

    /// Navigate to slide `index`.
    ///
    /// The cursor and indicators change immediately; the returned command
    /// carries the two delayed settle steps. Out-of-range indices are ignored.
    /// Navigating to the current slide only supersedes any in-flight handoff.
    pub fn go_to_slide(&mut self, index: usize) -> Command<Message> {
        if index >= self.slides.len() {
            tracing::debug!(index, slides = self.slides.len(), "slide index out of range");
            return Command::none();
        }

        self.finish_transition();
        self.generation += 1;

        let from = self.cursor;
        if from == index {
            return Command::none();
        }

        let outgoing = &mut self.slides[from].style;
        outgoing.visibility = Visibility::Hidden;
        outgoing.layer = Layer::Background;
        outgoing.opaque = false;

        let incoming = &mut self.slides[index].style;
        incoming.placement = Placement::Flow;
        incoming.visibility = Visibility::Visible;
        incoming.layer = Layer::Foreground;

        self.cursor = index;
        self.phase = TransitionPhase::Transitioning(Transition {
            generation: self.generation,
            from,
            to: index,
            started: Instant::now(),
            faded_in: false,
            detached: false,
        });
        tracing::debug!(from, to = index, generation = self.generation, "slide transition");

        let generation = self.generation;
        Command::batch([
            Command::after(
                FADE_IN_DELAY,
                Message::Settle {
                    generation,
                    step: SettleStep::FadeIn,
                },
            ),
            Command::after(
                self.config.transition,
                Message::Settle {
                    generation,
                    step: SettleStep::Detach,
                },
            ),
        ])
    }

    /// Advance one slide, wrapping from last to first.
    pub fn next(&mut self) -> Command<Message> {
        let n = self.slides.len();
        self.go_to_slide((self.cursor + 1) % n)
    }

    /// Step back one slide, wrapping from first to last.
    pub fn previous(&mut self) -> Command<Message> {
        let n = self.slides.len();
        self.go_to_slide((self.cursor + n - 1) % n)
    }

    /// Start autoplay. Clears any holds; no-op if already playing.
    pub fn play(&mut self) {
        self.holds = Holds::default();
        if self.playback == PlaybackState::Playing {
            return;
        }
        self.playback = PlaybackState::Playing;
        tracing::debug!("carousel playing");
    }

    /// Pause autoplay on purpose. Clears any holds; no-op unless playing.
    pub fn pause(&mut self) {
        self.holds = Holds::default();
        if self.playback != PlaybackState::Playing {
            return;
        }
        self.playback = PlaybackState::Paused;
        tracing::debug!("carousel paused");
    }

    /// Pause and navigate back to the first slide.
    pub fn stop(&mut self) -> Command<Message> {
        self.pause();
        self.playback = PlaybackState::Stopped;
        tracing::debug!("carousel stopped");
        self.go_to_slide(0)
    }

    /// Hold autoplay for `reason`. Only a playing (or already held) carousel
    /// is affected; a carousel paused on purpose stays as it is.
    pub fn hold(&mut self, reason: Hold) {
        match self.playback {
            PlaybackState::Playing => {
                self.playback = PlaybackState::Paused;
                *self.holds.flag(reason) = true;
                tracing::debug!(?reason, "carousel held");
            }
            PlaybackState::Paused if !self.holds.is_empty() => {
                *self.holds.flag(reason) = true;
            }
            _ => {}
        }
    }

    /// Drop the hold for `reason`; resume once nothing holds autoplay.
    pub fn release(&mut self, reason: Hold) {
        let flag = self.holds.flag(reason);
        if !*flag {
            return;
        }
        *flag = false;
        if self.holds.is_empty() && self.playback == PlaybackState::Paused {
            self.playback = PlaybackState::Playing;
            tracing::debug!(?reason, "carousel released");
        }
    }

    fn pointer_enter(&mut self) {
        if self.hovered {
            return;
        }
        self.hovered = true;
        if self.config.pause_on_hover {
            self.hold(Hold::Hover);
        }
    }

    fn pointer_leave(&mut self) {
        if !self.hovered {
            return;
        }
        self.hovered = false;
        if self.config.pause_on_hover {
            self.release(Hold::Hover);
        }
    }

    fn settle(&mut self, generation: u64, step: SettleStep) {
        let TransitionPhase::Transitioning(mut transition) = self.phase else {
            tracing::trace!(generation, ?step, "settle with no transition in flight");
            return;
        };
        if transition.generation != generation {
            tracing::trace!(generation, current = transition.generation, "stale settle dropped");
            return;
        }

        match step {
            SettleStep::FadeIn => {
                self.apply_fade_in(transition.to);
                transition.faded_in = true;
            }
            SettleStep::Detach => {
                self.apply_detach(transition.from);
                transition.detached = true;
            }
        }

        self.phase = if transition.faded_in && transition.detached {
            TransitionPhase::Idle
        } else {
            TransitionPhase::Transitioning(transition)
        };
    }

    /// Snap an in-flight handoff to its settled state.
    fn finish_transition(&mut self) {
        if let TransitionPhase::Transitioning(transition) = self.phase {
            if !transition.faded_in {
                self.apply_fade_in(transition.to);
            }
            if !transition.detached {
                self.apply_detach(transition.from);
            }
            self.phase = TransitionPhase::Idle;
        }
    }

    fn apply_fade_in(&mut self, index: usize) {
        let style = &mut self.slides[index].style;
        style.opaque = true;
        style.active = true;
    }

    fn apply_detach(&mut self, index: usize) {
        let style = &mut self.slides[index].style;
        style.placement = Placement::Overlay;
        style.active = false;
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Command<Message> {
        let area = self.area.get();
        let position = Position::new(event.column, event.row);
        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                if area.contains(position) {
                    self.pointer_enter();
                } else {
                    self.pointer_leave();
                }
                Command::none()
            }
            MouseEventKind::Down(MouseButton::Left) => {
                match Controls::layout(area, self.slides.len()).target_at(position) {
                    Some(Target::Previous) => self.previous(),
                    Some(Target::Next) => self.next(),
                    Some(Target::Indicator(i)) => self.go_to_slide(i),
                    None => Command::none(),
                }
            }
            _ => Command::none(),
        }
    }

    /// The slide to draw: the visible foreground one, if any.
    fn displayed(&self) -> Option<&Slide> {
        self.slides.iter().find(|slide| {
            slide.style.visibility == Visibility::Visible && slide.style.layer == Layer::Foreground
        })
    }
}

impl Component for Carousel {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Previous => self.previous(),
            Message::Next => self.next(),
            Message::GoTo(index) => self.go_to_slide(index),
            Message::Play => {
                self.play();
                Command::none()
            }
            Message::Pause => {
                self.pause();
                Command::none()
            }
            Message::Stop => self.stop(),
            Message::TogglePlayback => {
                if self.playback == PlaybackState::Playing {
                    self.pause();
                } else {
                    self.play();
                }
                Command::none()
            }
            Message::Hold(reason) => {
                self.hold(reason);
                Command::none()
            }
            Message::Release(reason) => {
                self.release(reason);
                Command::none()
            }
            Message::PointerEnter => {
                self.pointer_enter();
                Command::none()
            }
            Message::PointerLeave => {
                self.pointer_leave();
                Command::none()
            }
            Message::Key(key) => match key.code {
                KeyCode::Left => self.previous(),
                KeyCode::Right => self.next(),
                _ => Command::none(),
            },
            Message::Mouse(event) => self.handle_mouse(event),
            // A tick can already be queued when autoplay stops.
            Message::Tick if self.playback == PlaybackState::Playing => self.next(),
            Message::Tick => Command::none(),
            Message::Settle { generation, step } => {
                self.settle(generation, step);
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        self.area.set(area);
        if area.width == 0 || area.height == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.style.border)
            .title(format!(" News & Offers {}/{} ", self.cursor + 1, self.slides.len()));
        frame.render_widget(block, area);

        let controls = Controls::layout(area, self.slides.len());

        if let Some(slide) = self.displayed() {
            let dim = if slide.style.opaque {
                Style::default()
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            let text = vec![
                Line::from(Span::styled(slide.title.as_str(), self.style.title.patch(dim))),
                Line::raw(""),
                Line::from(Span::styled(slide.body.as_str(), self.style.body.patch(dim))),
            ];
            let paragraph = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, controls.slide);
        }

        if !controls.previous.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" < ", self.style.arrow)),
                controls.previous,
            );
            frame.render_widget(
                Paragraph::new(Span::styled(" > ", self.style.arrow)),
                controls.next,
            );
        }

        for (dot, active) in controls.indicators.iter().zip(self.indicators()) {
            let span = if active {
                Span::styled("●", self.style.active_dot)
            } else {
                Span::styled("○", self.style.inactive_dot)
            };
            frame.render_widget(Paragraph::new(span), *dot);
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if self.playback == PlaybackState::Playing {
            vec![subscribe(Every::new(self.config.interval, AUTOPLAY_TIMER))
                .map(|_: Instant| Message::Tick)]
        } else {
            vec![]
        }
    }
}
