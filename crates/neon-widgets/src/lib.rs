//! Page components for the **Neon Market** storefront.
//!
//! Every component implements [`neon_core::Component`] and mounts from a
//! [`markup::Markup`] document, so a page can be assembled from any layout
//! that provides the expected sections.
//!
//! # Components
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`carousel`] | Auto-advancing slides with arrows, indicator dots and hover hold |
//! | [`nav_menu`] | Inline links, collapsing to a hamburger menu on narrow layouts |
//! | [`category_filter`] | Product grid filtered by category, with scrolling |
//! | [`back_to_top`] | Button that appears once the grid is scrolled down |
//! | [`theme_toggle`] | Dark/light switch and theme palettes |
//! | [`notice`] | Footer notices that dismiss themselves |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`markup`] | The page document: sections by id, panels by class |
//! | [`error`] | [`MountError`](error::MountError) for components whose section is missing |

pub mod back_to_top;
pub mod carousel;
pub mod category_filter;
pub mod error;
pub mod markup;
pub mod nav_menu;
pub mod notice;
pub mod theme_toggle;

pub use error::MountError;
pub use markup::Markup;
