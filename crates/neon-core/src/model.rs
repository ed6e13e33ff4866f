use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level page trait.
///
/// A page owns all of its state and is driven by the runtime through an
/// **init -> update -> view** cycle:
///
/// 1. [`init`](Model::init) builds the page from its flags (configuration,
///    markup) and may return a [`Command`] for startup work.
/// 2. [`view`](Model::view) draws the current state into a [`Frame`].
/// 3. Input, timers and finished async work arrive as messages.
/// 4. [`update`](Model::update) handles one message at a time and may return
///    a further [`Command`].
/// 5. [`subscriptions`](Model::subscriptions) is consulted after every update
///    so long-lived sources (autoplay timers, input) follow the state.
///
/// All mutation happens inside `update`, on the runtime's event loop. Timers
/// and async tasks never touch the model directly; they only send messages.
///
/// # Example
///
/// ```rust,ignore
/// use neon_core::{Command, Model};
/// use ratatui::{widgets::Paragraph, Frame};
///
/// struct Banner { clicks: u32 }
///
/// enum Msg { Clicked }
///
/// impl Model for Banner {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<Msg>) {
///         (Banner { clicks: 0 }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Clicked => self.clicks += 1,
///         }
///         Command::none()
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         frame.render_widget(Paragraph::new(format!("{} clicks", self.clicks)), frame.area());
///     }
/// }
/// ```
pub trait Model: Sized + Send + 'static {
    /// Every event that can affect the page is a variant of this type.
    type Message: Send + 'static;

    /// Startup data handed to [`Model::init`]. Use `()` when none is needed.
    type Flags: Send + 'static;

    /// Create the initial state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message, mutate state, and return a command for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Must not mutate anything observable.
    fn view(&self, frame: &mut Frame);

    /// Declare the subscriptions that should be active for the current state.
    ///
    /// The runtime diffs the returned list against the running set by
    /// [`SubscriptionId`](crate::SubscriptionId): new ids are started,
    /// missing ids are aborted, unchanged ids keep running untouched.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
