use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable part of a page that renders into a given [`Rect`].
///
/// Components mirror [`Model`](crate::Model) minus `init`: the page builds
/// them however it likes (usually by mounting them from markup) and then
/// forwards their messages. The page decides where each component draws by
/// passing it a sub-area of the frame.
///
/// # Composition
///
/// Wrap the component's message type in a variant of the page message and
/// lift commands and subscriptions with `map`:
///
/// ```rust,ignore
/// fn update(&mut self, msg: Msg) -> Command<Msg> {
///     match msg {
///         Msg::Menu(m) => self.menu.update(m).map(Msg::Menu),
///     }
/// }
///
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     self.menu
///         .subscriptions()
///         .into_iter()
///         .map(|sub| sub.map(Msg::Menu))
///         .collect()
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's own message type.
    type Message: Send + 'static;

    /// Process a message and return a command in the component's message type.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations must stay inside it.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Subscriptions this component needs for its current state.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
