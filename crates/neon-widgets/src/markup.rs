//! The page document components mount from.
//!
//! A [`Markup`] is a flat list of sections, each found by `id`, holding
//! ordered panels tagged with a `class`. Components locate their content the
//! way a script queries a page: a section by id, then panels by class.
//!
//! ```toml
//! [[section]]
//! id = "news-pages"
//!
//! [[section.panel]]
//! class = "news-page"
//! title = "Summer Sale"
//! body = "Up to 40% off neon signage."
//! ```

use serde::Deserialize;

/// A whole page document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Markup {
    #[serde(default, rename = "section")]
    pub sections: Vec<Section>,
}

/// A container located by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default, rename = "panel")]
    pub panels: Vec<Panel>,
}

/// One element inside a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Panel {
    pub class: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Product or link category (`data-category`).
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

impl Markup {
    /// Find a section by id. A leading `#` is accepted and ignored.
    pub fn section(&self, id: &str) -> Option<&Section> {
        let id = id.strip_prefix('#').unwrap_or(id);
        self.sections.iter().find(|section| section.id == id)
    }
}

impl Section {
    /// Panels carrying `class`, in document order. A leading `.` is accepted.
    pub fn panels_with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Panel> + 'a {
        let class = class.strip_prefix('.').unwrap_or(class);
        self.panels.iter().filter(move |panel| panel.class == class)
    }
}

impl Panel {
    pub fn new(class: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        [[section]]
        id = "news-pages"

        [[section.panel]]
        class = "news-page"
        title = "Summer Sale"
        body = "Up to 40% off"

        [[section.panel]]
        class = "banner"
        title = "Not a slide"

        [[section]]
        id = "products"

        [[section.panel]]
        class = "product"
        title = "Neon Cat"
        category = "decor"
        price = "$49"
    "##;

    #[test]
    fn parses_sections_and_panels() {
        let markup: Markup = toml::from_str(PAGE).unwrap();
        assert_eq!(markup.sections.len(), 2);
        let product = &markup.section("products").unwrap().panels[0];
        assert_eq!(product.category.as_deref(), Some("decor"));
        assert_eq!(product.price.as_deref(), Some("$49"));
    }

    #[test]
    fn section_lookup_accepts_selector_prefix() {
        let markup: Markup = toml::from_str(PAGE).unwrap();
        assert!(markup.section("#news-pages").is_some());
        assert!(markup.section("news-pages").is_some());
        assert!(markup.section("missing").is_none());
    }

    #[test]
    fn class_filter_keeps_document_order() {
        let markup: Markup = toml::from_str(PAGE).unwrap();
        let section = markup.section("news-pages").unwrap();
        let titles: Vec<_> = section
            .panels_with_class(".news-page")
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Summer Sale"]);
    }
}
