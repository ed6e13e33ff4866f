//! Product grid with category filtering and scrolling.

use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use neon_core::command::Command;
use neon_core::component::Component;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::error::MountError;
use crate::markup::{Markup, Panel};
use crate::theme_toggle::Palette;

/// Section id holding the products.
pub const PRODUCTS_ID: &str = "products";
/// Panel class that marks a product.
pub const PRODUCT_CLASS: &str = "product";
/// Category name matching every product.
pub const ALL: &str = "all";

const WHEEL_DELTA: u16 = 3;
const NAME_WIDTH: usize = 28;
const CATEGORY_WIDTH: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub price: Option<String>,
    visible: bool,
}

impl Product {
    fn from_panel(panel: &Panel) -> Self {
        Self {
            name: panel.title.clone(),
            description: panel.body.clone(),
            category: panel.category.clone(),
            price: panel.price.clone(),
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn matches(&self, category: &str) -> bool {
        category == ALL || self.category.as_deref() == Some(category)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Show only products of this category (`"all"` shows everything).
    Filter(String),
    ShowAll,
    Key(KeyEvent),
    Mouse(MouseEvent),
    ScrollToTop,
    /// Emitted after every filter.
    Changed { category: String, product_count: usize },
    /// Emitted when the scroll offset changes.
    Scrolled(u16),
}

#[derive(Debug, Clone)]
pub struct FilterStyle {
    pub border: Style,
    pub title: Style,
    pub name: Style,
    pub category: Style,
    pub price: Style,
}

impl Default for FilterStyle {
    fn default() -> Self {
        Self::from_palette(&Palette::DARK)
    }
}

impl FilterStyle {
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            border: Style::default().fg(palette.muted),
            title: palette.accent(),
            name: Style::default().fg(palette.text),
            category: palette.muted(),
            price: Style::default().fg(palette.accent_alt),
        }
    }
}

/// The product grid. Products are fixed at mount; filtering only changes
/// which of them are shown.
pub struct CategoryFilter {
    products: Vec<Product>,
    current: String,
    offset: u16,
    style: FilterStyle,
    /// Updated during each `view()` call.
    visible_height: Cell<u16>,
    area: Cell<Rect>,
}

impl CategoryFilter {
    /// Mount from the `products` section, showing every product.
    pub fn mount(markup: &Markup) -> Result<Self, MountError> {
        tracing::info!("initializing category filter");
        let Some(section) = markup.section(PRODUCTS_ID) else {
            tracing::warn!(container = PRODUCTS_ID, "product container not found");
            return Err(MountError::ContainerNotFound(PRODUCTS_ID.to_string()));
        };

        let products: Vec<Product> = section
            .panels_with_class(PRODUCT_CLASS)
            .map(Product::from_panel)
            .collect();
        tracing::info!(products = products.len(), "category filter ready");

        Ok(Self {
            products,
            current: ALL.to_string(),
            offset: 0,
            style: FilterStyle::default(),
            visible_height: Cell::new(0),
            area: Cell::new(Rect::default()),
        })
    }

    pub fn set_style(&mut self, style: FilterStyle) {
        self.style = style;
    }

    /// Show products of `category` only, or all of them for `"all"`.
    /// Unknown categories simply match nothing.
    pub fn filter_by_category(&mut self, category: &str) -> Command<Message> {
        tracing::info!(category, "filtering products");
        self.current = category.to_string();

        let mut visible = 0;
        for product in &mut self.products {
            product.visible = product.matches(category);
            if product.visible {
                visible += 1;
            }
        }
        tracing::info!(visible, "products visible");

        self.offset = 0;
        Command::batch([
            Command::message(Message::Changed {
                category: category.to_string(),
                product_count: visible,
            }),
            Command::message(Message::Scrolled(0)),
        ])
    }

    pub fn show_all(&mut self) -> Command<Message> {
        self.filter_by_category(ALL)
    }

    pub fn current_category(&self) -> &str {
        &self.current
    }

    /// Number of products in `category`, or in the current category.
    pub fn product_count(&self, category: Option<&str>) -> usize {
        let category = category.unwrap_or(&self.current);
        self.products.iter().filter(|p| p.matches(category)).count()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn visible_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.visible)
    }

    /// Scroll offset in rows.
    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn scroll_to_top(&mut self) -> Command<Message> {
        self.scroll_to(0)
    }

    fn max_offset(&self) -> u16 {
        let rows = self.visible_products().count();
        let rows = u16::try_from(rows).unwrap_or(u16::MAX);
        rows.saturating_sub(self.visible_height.get())
    }

    fn scroll_to(&mut self, offset: u16) -> Command<Message> {
        let offset = offset.min(self.max_offset());
        if offset == self.offset {
            return Command::none();
        }
        self.offset = offset;
        Command::message(Message::Scrolled(offset))
    }

    fn scroll_down(&mut self, rows: u16) -> Command<Message> {
        self.scroll_to(self.offset.saturating_add(rows))
    }

    fn scroll_up(&mut self, rows: u16) -> Command<Message> {
        self.scroll_to(self.offset.saturating_sub(rows))
    }

    fn page(&self) -> u16 {
        self.visible_height.get().max(1)
    }

    fn row<'a>(&'a self, product: &'a Product) -> Line<'a> {
        let category = product.category.as_deref().unwrap_or("");
        Line::from(vec![
            Span::styled(pad(&product.name, NAME_WIDTH), self.style.name),
            Span::styled(pad(category, CATEGORY_WIDTH), self.style.category),
            Span::styled(product.price.as_deref().unwrap_or(""), self.style.price),
        ])
    }
}

/// Left-align `text` in `width` display columns, cutting it if needed.
fn pad(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w >= width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - out.width()));
    out
}

impl Component for CategoryFilter {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Filter(category) => self.filter_by_category(&category),
            Message::ShowAll => self.show_all(),
            Message::ScrollToTop => self.scroll_to_top(),
            Message::Key(key) => match key.code {
                KeyCode::Down => self.scroll_down(1),
                KeyCode::Up => self.scroll_up(1),
                KeyCode::PageDown => self.scroll_down(self.page()),
                KeyCode::PageUp => self.scroll_up(self.page()),
                _ => Command::none(),
            },
            Message::Mouse(event) => {
                if !self.area.get().contains(Position::new(event.column, event.row)) {
                    return Command::none();
                }
                match event.kind {
                    MouseEventKind::ScrollDown => self.scroll_down(WHEEL_DELTA),
                    MouseEventKind::ScrollUp => self.scroll_up(WHEEL_DELTA),
                    _ => Command::none(),
                }
            }
            Message::Changed { .. } | Message::Scrolled(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        self.area.set(area);
        let count = self.visible_products().count();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.style.border)
            .title(Span::styled(
                format!(" Products: {} ({count}) ", self.current),
                self.style.title,
            ));
        let inner = block.inner(area);
        self.visible_height.set(inner.height);
        frame.render_widget(block, area);

        let offset = self.offset.min(self.max_offset());
        let lines: Vec<Line> = self
            .visible_products()
            .skip(usize::from(offset))
            .take(usize::from(inner.height))
            .map(|p| self.row(p))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Section;
    use crossterm::event::KeyModifiers;

    fn markup() -> Markup {
        let panels = [
            ("Neon Cat", "decor"),
            ("Glow Sneakers", "apparel"),
            ("Pixel Lamp", "decor"),
            ("Synth Jacket", "apparel"),
            ("Arcade Stick", "gaming"),
        ]
        .into_iter()
        .map(|(name, category)| Panel::new(PRODUCT_CLASS, name).with_category(category).with_price("$10"))
        .chain([Panel::new("banner", "Free shipping")])
        .collect();
        Markup {
            sections: vec![Section {
                id: PRODUCTS_ID.into(),
                panels,
            }],
        }
    }

    fn long_markup(n: usize) -> Markup {
        let panels = (0..n)
            .map(|i| Panel::new(PRODUCT_CLASS, format!("Item {i}")).with_category("decor"))
            .collect();
        Markup {
            sections: vec![Section {
                id: PRODUCTS_ID.into(),
                panels,
            }],
        }
    }

    fn emitted(cmd: Command<Message>) -> Vec<Message> {
        match cmd.into_batch() {
            Some(cmds) => cmds.into_iter().filter_map(Command::into_message).collect(),
            None => vec![],
        }
    }

    fn render(filter: &CategoryFilter, width: u16, height: u16) -> String {
        use ratatui::backend::TestBackend;
        use ratatui::Terminal;
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| filter.view(f, f.area())).unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn mount_shows_all_products() {
        let filter = CategoryFilter::mount(&markup()).unwrap();
        assert_eq!(filter.current_category(), ALL);
        assert_eq!(filter.products().len(), 5);
        assert!(filter.products().iter().all(Product::is_visible));
    }

    #[test]
    fn mount_without_section_fails() {
        let result = CategoryFilter::mount(&Markup::default());
        assert_eq!(
            result.err(),
            Some(MountError::ContainerNotFound(PRODUCTS_ID.into()))
        );
    }

    #[test]
    fn filter_hides_other_categories() {
        let mut filter = CategoryFilter::mount(&markup()).unwrap();
        let events = emitted(filter.filter_by_category("decor"));

        let names: Vec<_> = filter.visible_products().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Neon Cat", "Pixel Lamp"]);
        assert_eq!(filter.current_category(), "decor");
        assert!(matches!(
            &events[0],
            Message::Changed { category, product_count: 2 } if category == "decor"
        ));
    }

    #[test]
    fn unknown_category_shows_nothing() {
        let mut filter = CategoryFilter::mount(&markup()).unwrap();
        filter.filter_by_category("toys");
        assert_eq!(filter.visible_products().count(), 0);
        assert_eq!(filter.product_count(None), 0);
    }

    #[test]
    fn show_all_restores_everything() {
        let mut filter = CategoryFilter::mount(&markup()).unwrap();
        filter.filter_by_category("gaming");
        filter.show_all();
        assert_eq!(filter.visible_products().count(), 5);
        assert_eq!(filter.current_category(), ALL);
    }

    #[test]
    fn product_count_by_category() {
        let mut filter = CategoryFilter::mount(&markup()).unwrap();
        assert_eq!(filter.product_count(None), 5);
        assert_eq!(filter.product_count(Some("apparel")), 2);
        assert_eq!(filter.product_count(Some(ALL)), 5);
        filter.filter_by_category("gaming");
        assert_eq!(filter.product_count(None), 1);
    }

    #[test]
    fn keys_scroll_within_bounds() {
        let mut filter = CategoryFilter::mount(&long_markup(30)).unwrap();
        render(&filter, 60, 12);

        let cmd = filter.update(Message::Key(KeyEvent::from(KeyCode::Down)));
        assert!(matches!(cmd.into_message(), Some(Message::Scrolled(1))));

        filter.update(Message::Key(KeyEvent::from(KeyCode::PageDown)));
        assert_eq!(filter.offset(), 11);

        for _ in 0..5 {
            filter.update(Message::Key(KeyEvent::from(KeyCode::PageDown)));
        }
        assert_eq!(filter.offset(), 20);

        let cmd = filter.update(Message::Key(KeyEvent::from(KeyCode::PageDown)));
        assert!(cmd.is_none());

        filter.update(Message::ScrollToTop);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn wheel_scrolls_only_inside_grid() {
        let mut filter = CategoryFilter::mount(&long_markup(30)).unwrap();
        render(&filter, 60, 12);
        let wheel = |column, row| {
            Message::Mouse(MouseEvent {
                kind: MouseEventKind::ScrollDown,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };
        filter.update(wheel(5, 5));
        assert_eq!(filter.offset(), 3);
        filter.update(wheel(70, 5));
        assert_eq!(filter.offset(), 3);
    }

    #[test]
    fn filtering_resets_scroll() {
        let mut filter = CategoryFilter::mount(&long_markup(30)).unwrap();
        render(&filter, 60, 12);
        filter.update(Message::Key(KeyEvent::from(KeyCode::PageDown)));
        let events = emitted(filter.filter_by_category("decor"));
        assert_eq!(filter.offset(), 0);
        assert!(matches!(events[1], Message::Scrolled(0)));
    }

    #[test]
    fn renders_visible_rows() {
        let mut filter = CategoryFilter::mount(&markup()).unwrap();
        filter.filter_by_category("apparel");
        let out = render(&filter, 60, 8);
        assert!(out.contains("Products: apparel (2)"));
        assert!(out.contains("Glow Sneakers"));
        assert!(out.contains("$10"));
        assert!(!out.contains("Neon Cat"));
    }

    #[test]
    fn pad_cuts_and_fills() {
        assert_eq!(pad("abc", 6), "abc   ");
        assert_eq!(pad("abcdefgh", 5), "abcd ");
        assert_eq!(pad("", 2), "  ");
    }
}
