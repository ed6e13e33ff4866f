use crossterm::event::{KeyEvent, MouseEvent};

/// Input events delivered to a page by the runtime.
///
/// `PageEvent` is what the [`page_events`](crate::subscriptions::page_events)
/// subscription yields. Terminal focus changes are surfaced as page
/// visibility, the way a browser tab reports being hidden or shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event: clicks, wheel, and motion (used for hover tracking).
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// The page stopped being visible (terminal lost focus).
    Hidden,
    /// The page became visible again (terminal gained focus).
    Visible,
}

impl PageEvent {
    /// Convert a crossterm event. Paste events have no meaning on the page
    /// and are dropped.
    pub fn from_terminal(event: crossterm::event::Event) -> Option<Self> {
        match event {
            crossterm::event::Event::Key(k) => Some(PageEvent::Key(k)),
            crossterm::event::Event::Mouse(m) => Some(PageEvent::Mouse(m)),
            crossterm::event::Event::Resize(w, h) => Some(PageEvent::Resize(w, h)),
            crossterm::event::Event::FocusGained => Some(PageEvent::Visible),
            crossterm::event::Event::FocusLost => Some(PageEvent::Hidden),
            crossterm::event::Event::Paste(_) => None,
        }
    }
}
