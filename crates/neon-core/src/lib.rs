//! Event-loop runtime for the **Neon Market** terminal storefront.
//!
//! `neon-core` runs a page the way a browser runs a script: a single event
//! loop owns all state, input and timers arrive as messages, and deferred
//! work reports back through the same queue. The shape follows the
//! [Elm Architecture]: **init -> update -> view**, with side effects pushed
//! out into [`Command`]s and [`Subscription`]s.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | A whole page (init / update / view / subscriptions) |
//! | [`Component`] | A page part that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | A side effect: immediate or delayed message, async task, quit |
//! | [`Subscription`] | Long-lived source: page input, repeating timers |
//! | [`PageEvent`] | Keys, mouse, resize and visibility delivered to the page |
//! | [`Program`] | Drives a [`Model`] on the real terminal |
//! | [`TestProgram`](testing::TestProgram) | Headless harness with a virtual clock |
//!
//! # Timers
//!
//! Repeating timers are subscriptions ([`Every`]), so "at most one autoplay
//! timer" falls out of subscription diffing: a page that declares the same
//! timer id twice still runs one task. One-shot callbacks are
//! [`Command::after`]; they cannot be cancelled, so receivers tag them with
//! a generation and drop stale deliveries.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::PageEvent;
pub use model::Model;
pub use runtime::{Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{page_events, Every};

/// Run a page with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run a page with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
