//! Built-in subscription sources.
//!
//! - **Page input** ([`page_events`]) -- keys, mouse, resize and visibility
//!   from the terminal.
//! - **Timers** ([`Every`]) -- repeating timers. One-shot delays are
//!   [`Command::after`](crate::Command::after).

mod page;
mod timer;

pub use page::*;
pub use timer::*;
