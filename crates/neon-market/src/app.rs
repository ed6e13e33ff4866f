//! The storefront page: mounts every component from the markup and routes
//! page input, timers and component events between them.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use neon_core::{page_events, Command, Component, Model, PageEvent, Subscription};
use neon_widgets::back_to_top::{self, BackToTop};
use neon_widgets::carousel::{self, Carousel, CarouselConfig, CarouselStyle, Hold, CONTAINER_ID};
use neon_widgets::category_filter::{self, CategoryFilter, FilterStyle};
use neon_widgets::nav_menu::{self, NavMenu, NavStyle};
use neon_widgets::notice::{self, Notice, Notices};
use neon_widgets::theme_toggle::{self, Palette, Theme, ThemeToggle};
use neon_widgets::{Markup, MountError};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::theme_store::{ThemeStore, ThemeStoreError};

/// The page bundled with the binary.
pub const BUNDLED_MARKUP: &str = include_str!("../assets/storefront.toml");

const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);
const HELP: &str = "</> slides  p play/pause  s stop  m menu  t theme  Home top  q quit";

/// Layout class of the terminal, by width in columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn classify(width: u16) -> Self {
        match width {
            0..60 => Breakpoint::Mobile,
            60..90 => Breakpoint::Tablet,
            _ => Breakpoint::Desktop,
        }
    }
}

/// Everything the page needs at startup.
pub struct Flags {
    pub markup: Markup,
    pub carousel: CarouselConfig,
    pub back_to_top_rows: u16,
    pub notice_duration: Duration,
    pub theme: Theme,
    /// Where theme changes are persisted; `None` keeps them in memory.
    pub theme_store: Option<ThemeStore>,
    /// Terminal size at startup.
    pub size: (u16, u16),
}

#[derive(Debug)]
pub enum Msg {
    Page(PageEvent),
    ResizeSettled { generation: u64, width: u16 },
    Carousel(carousel::Message),
    Nav(nav_menu::Message),
    Filter(category_filter::Message),
    BackToTop(back_to_top::Message),
    Theme(theme_toggle::Message),
    Notice(notice::Message),
    ThemeSaved(Result<(), ThemeStoreError>),
}

pub struct Storefront {
    carousel: Option<Carousel>,
    nav: Option<NavMenu>,
    filter: Option<CategoryFilter>,
    back_to_top: BackToTop,
    theme: ThemeToggle,
    notices: Notices,
    theme_store: Option<ThemeStore>,
    breakpoint: Breakpoint,
    resize_generation: u64,
}

/// Log how a module mount went and keep the module if it mounted.
fn mounted<T>(module: &str, result: Result<T, MountError>) -> Option<T> {
    match result {
        Ok(component) => {
            tracing::info!(module, "module connected");
            Some(component)
        }
        Err(err) => {
            tracing::warn!(module, %err, "module not mounted");
            None
        }
    }
}

impl Storefront {
    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    pub fn nav(&self) -> Option<&NavMenu> {
        self.nav.as_ref()
    }

    pub fn filter(&self) -> Option<&CategoryFilter> {
        self.filter.as_ref()
    }

    pub fn back_to_top(&self) -> &BackToTop {
        &self.back_to_top
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    fn apply_palette(&mut self) {
        let palette = self.theme.palette();
        if let Some(carousel) = &mut self.carousel {
            carousel.set_style(CarouselStyle::from_palette(&palette));
        }
        if let Some(nav) = &mut self.nav {
            nav.set_style(NavStyle::from_palette(&palette));
        }
        if let Some(filter) = &mut self.filter {
            filter.set_style(FilterStyle::from_palette(&palette));
        }
        self.back_to_top.set_style(palette.accent());
        self.notices.set_palette(palette);
    }

    fn apply_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoint = breakpoint;
        if let Some(nav) = &mut self.nav {
            nav.set_compact(breakpoint == Breakpoint::Mobile);
        }
    }

    fn notify(&mut self, notice: Notice) -> Command<Msg> {
        self.notices.show(notice).map(Msg::Notice)
    }

    fn carousel_update(&mut self, msg: carousel::Message) -> Command<Msg> {
        match &mut self.carousel {
            Some(carousel) => carousel.update(msg).map(Msg::Carousel),
            None => Command::none(),
        }
    }

    fn nav_update(&mut self, msg: nav_menu::Message) -> Command<Msg> {
        match &mut self.nav {
            Some(nav) => nav.update(msg).map(Msg::Nav),
            None => Command::none(),
        }
    }

    fn filter_update(&mut self, msg: category_filter::Message) -> Command<Msg> {
        match &mut self.filter {
            Some(filter) => filter.update(msg).map(Msg::Filter),
            None => Command::none(),
        }
    }

    fn on_page(&mut self, event: PageEvent) -> Command<Msg> {
        match event {
            PageEvent::Key(key) => self.on_key(key),
            PageEvent::Mouse(mouse) => self.on_mouse(mouse),
            PageEvent::Resize(width, height) => {
                tracing::trace!(width, height, "resize");
                self.resize_generation += 1;
                Command::after(
                    RESIZE_DEBOUNCE,
                    Msg::ResizeSettled {
                        generation: self.resize_generation,
                        width,
                    },
                )
            }
            PageEvent::Hidden => {
                tracing::info!("page hidden");
                if let Some(carousel) = &mut self.carousel {
                    carousel.hold(Hold::PageHidden);
                }
                Command::none()
            }
            PageEvent::Visible => {
                tracing::info!("page visible");
                if let Some(carousel) = &mut self.carousel {
                    carousel.release(Hold::PageHidden);
                }
                Command::none()
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Command<Msg> {
        if key.kind != KeyEventKind::Press {
            return Command::none();
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Command::quit();
        }
        // Slide arrows work page-wide, open menu or not.
        if matches!(key.code, KeyCode::Left | KeyCode::Right) {
            return self.carousel_update(carousel::Message::Key(key));
        }
        if self.nav.as_ref().is_some_and(NavMenu::is_open) {
            return self.nav_update(nav_menu::Message::Key(key));
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Command::quit(),
            KeyCode::Char('p') => self.carousel_update(carousel::Message::TogglePlayback),
            KeyCode::Char('s') => self.carousel_update(carousel::Message::Stop),
            KeyCode::Char('m') => self.nav_update(nav_menu::Message::Key(key)),
            KeyCode::Char('t') => self.theme.update(theme_toggle::Message::Key(key)).map(Msg::Theme),
            KeyCode::Home => self
                .back_to_top
                .update(back_to_top::Message::Key(key))
                .map(Msg::BackToTop),
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown => {
                self.filter_update(category_filter::Message::Key(key))
            }
            _ => Command::none(),
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> Command<Msg> {
        let carousel = self.carousel_update(carousel::Message::Mouse(mouse));
        if matches!(mouse.kind, MouseEventKind::Moved) {
            return carousel;
        }
        Command::batch([
            carousel,
            self.nav_update(nav_menu::Message::Mouse(mouse)),
            self.filter_update(category_filter::Message::Mouse(mouse)),
            self.back_to_top
                .update(back_to_top::Message::Mouse(mouse))
                .map(Msg::BackToTop),
            self.theme
                .update(theme_toggle::Message::Mouse(mouse))
                .map(Msg::Theme),
        ])
    }

    fn on_nav(&mut self, msg: nav_menu::Message) -> Command<Msg> {
        if let nav_menu::Message::Navigate(index) = msg {
            let link = self.nav.as_ref().and_then(|nav| nav.link(index)).cloned();
            let Some(link) = link else {
                return Command::none();
            };
            tracing::debug!(link = %link.label, "navigate");
            return match (&mut self.filter, link.category) {
                (Some(filter), Some(category)) => {
                    filter.filter_by_category(&category).map(Msg::Filter)
                }
                _ => Command::none(),
            };
        }
        self.nav_update(msg)
    }

    fn on_filter(&mut self, msg: category_filter::Message) -> Command<Msg> {
        match msg {
            category_filter::Message::Changed {
                category,
                product_count,
            } => {
                if let Some(nav) = &mut self.nav {
                    nav.set_active_category(&category);
                }
                let noun = if product_count == 1 { "product" } else { "products" };
                self.notify(Notice::info(format!(
                    "{product_count} {noun} in {category}"
                )))
            }
            category_filter::Message::Scrolled(offset) => self
                .back_to_top
                .update(back_to_top::Message::Scrolled(offset))
                .map(Msg::BackToTop),
            other => self.filter_update(other),
        }
    }

    fn on_theme(&mut self, msg: theme_toggle::Message) -> Command<Msg> {
        let theme = match msg {
            theme_toggle::Message::Changed(theme) => theme,
            other => return self.theme.update(other).map(Msg::Theme),
        };
        self.apply_palette();
        let label = match theme {
            Theme::Dark => "Dark mode on",
            Theme::Light => "Light mode on",
        };
        let notice = self.notify(Notice::success(label));
        let save = match &self.theme_store {
            Some(store) => {
                let store = store.clone();
                Command::perform(async move { store.save(theme).await }, Msg::ThemeSaved)
            }
            None => Command::none(),
        };
        Command::batch([notice, save])
    }

    fn header(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let title = Line::from(vec![
            Span::styled("NEON", palette.accent()),
            Span::styled(" MARKET", Style::default().fg(palette.accent_alt)),
        ]);
        frame.render_widget(Paragraph::new(title), area);
        self.theme.view(frame, area);
    }
}

impl Model for Storefront {
    type Message = Msg;
    type Flags = Flags;

    fn init(flags: Flags) -> (Self, Command<Msg>) {
        tracing::info!("initializing Neon Market");

        let carousel = mounted(
            "carousel",
            Carousel::mount(&flags.markup, CONTAINER_ID, flags.carousel),
        );
        let nav = mounted("navigation", NavMenu::mount(&flags.markup));
        let filter = mounted("categories", CategoryFilter::mount(&flags.markup));

        tracing::info!(
            carousel = carousel.is_some(),
            navigation = nav.is_some(),
            categories = filter.is_some(),
            "module status"
        );

        let mut page = Storefront {
            carousel,
            nav,
            filter,
            back_to_top: BackToTop::new().with_threshold(flags.back_to_top_rows),
            theme: ThemeToggle::new(flags.theme),
            notices: Notices::new().with_duration(flags.notice_duration),
            theme_store: flags.theme_store,
            breakpoint: Breakpoint::Desktop,
            resize_generation: 0,
        };
        page.apply_palette();
        page.apply_breakpoint(Breakpoint::classify(flags.size.0));
        tracing::info!(breakpoint = ?page.breakpoint, "storefront ready");

        (page, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Page(event) => self.on_page(event),
            Msg::ResizeSettled { generation, width } => {
                if generation == self.resize_generation {
                    let breakpoint = Breakpoint::classify(width);
                    tracing::info!(width, ?breakpoint, "window resized");
                    self.apply_breakpoint(breakpoint);
                }
                Command::none()
            }
            Msg::Carousel(msg) => self.carousel_update(msg),
            Msg::Nav(msg) => self.on_nav(msg),
            Msg::Filter(msg) => self.on_filter(msg),
            Msg::BackToTop(back_to_top::Message::Activated) => {
                self.filter_update(category_filter::Message::ScrollToTop)
            }
            Msg::BackToTop(msg) => self.back_to_top.update(msg).map(Msg::BackToTop),
            Msg::Theme(msg) => self.on_theme(msg),
            Msg::Notice(msg) => self.notices.update(msg).map(Msg::Notice),
            Msg::ThemeSaved(Ok(())) => Command::none(),
            Msg::ThemeSaved(Err(err)) => {
                tracing::error!(%err, "could not persist theme");
                self.notify(Notice::warning("Theme could not be saved"))
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        let palette = self.theme.palette();
        let area = frame.area();
        frame.render_widget(Block::default().style(palette.base()), area);

        let nav_height = self.nav.as_ref().map_or(0, NavMenu::height);
        let carousel_height = match (&self.carousel, self.breakpoint) {
            (None, _) => 0,
            (Some(_), Breakpoint::Mobile) => 7,
            (Some(_), _) => 9,
        };
        let [header, nav, carousel, products, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(nav_height),
            Constraint::Length(carousel_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        self.header(frame, header, &palette);
        if let Some(menu) = &self.nav {
            menu.view(frame, nav);
        }
        if let Some(slides) = &self.carousel {
            slides.view(frame, carousel);
        }
        if let Some(grid) = &self.filter {
            grid.view(frame, products);
        }
        self.back_to_top.view(frame, products);

        if self.notices.current().is_some() {
            self.notices.view(frame, footer);
        } else {
            frame.render_widget(Paragraph::new(Span::styled(HELP, palette.muted())), footer);
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![page_events(|event| Some(Msg::Page(event)))];
        if let Some(carousel) = &self.carousel {
            subs.extend(
                carousel
                    .subscriptions()
                    .into_iter()
                    .map(|sub| sub.map(Msg::Carousel)),
            );
        }
        subs
    }
}
