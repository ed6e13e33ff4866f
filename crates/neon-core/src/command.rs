use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A side effect returned from [`Model::update`](crate::Model::update) or
/// [`Model::init`](crate::Model::init).
///
/// Commands never touch model state themselves. They describe work for the
/// runtime: deliver a message now, deliver one later, run an async task and
/// feed its result back, or end the program.
///
/// # Examples
///
/// ```rust,ignore
/// // Re-enter update immediately:
/// let cmd = Command::message(Msg::ShowAll);
///
/// // Deliver a message once a delay has elapsed:
/// let cmd = Command::after(Duration::from_millis(250), Msg::ResizeSettled(gen));
///
/// // Persist something off the event loop:
/// let cmd = Command::perform(store.save(theme), Msg::ThemeSaved);
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Action(Action<Msg>),
    Future(BoxFuture<'static, Msg>),
    /// Deliver `msg` once `delay` has elapsed. Kept separate from `Future`
    /// so the headless harness can fire it on a virtual clock.
    Delay {
        delay: Duration,
        msg: Msg,
    },
    Batch(Vec<Command<Msg>>),
}

/// Actions the runtime handles synchronously, without spawning a task.
pub enum Action<Msg> {
    /// Send a message immediately.
    Message(Msg),
    /// Quit the program.
    Quit,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Run an async future and map its output to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move { map(future.await) })),
        }
    }

    /// Send a message immediately.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Action(Action::Message(msg)),
        }
    }

    /// Deliver `msg` after `delay`.
    ///
    /// There is no way to cancel a delayed message once issued. Receivers that
    /// may be superseded should tag the message with a generation and ignore
    /// it when the generation no longer matches.
    pub fn after(delay: Duration, msg: Msg) -> Self {
        Command {
            inner: CommandInner::Delay { delay, msg },
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Action(Action::Quit),
        }
    }

    /// Run multiple commands concurrently.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|cmd| !cmd.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap_or_else(Command::none),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Action(Action::Message(msg)) => Command::message(f(msg)),
            CommandInner::Action(Action::Quit) => Command::quit(),
            CommandInner::Future(fut) => Command {
                inner: CommandInner::Future(Box::pin(async move { f(fut.await) })),
            },
            CommandInner::Delay { delay, msg } => Command::after(delay, f(msg)),
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter()
                        .map(|cmd| cmd.map_with(f.clone()))
                        .collect(),
                ),
            },
        }
    }

    // --- Inspection methods (useful for testing) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// Returns `true` if this command quits the program.
    pub fn is_quit(&self) -> bool {
        matches!(self.inner, CommandInner::Action(Action::Quit))
    }

    /// If this command is an immediate message action, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a delayed message, return the delay and message.
    pub fn into_delayed(self) -> Option<(Duration, Msg)> {
        match self.inner {
            CommandInner::Delay { delay, msg } => Some((delay, msg)),
            _ => None,
        }
    }

    /// If this command is a batch, return the inner commands.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.inner {
            CommandInner::Batch(cmds) => Some(cmds),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_none_is_none() {
        let cmd: Command<()> = Command::none();
        assert!(cmd.is_none());
    }

    #[test]
    fn command_message_creates_action() {
        let cmd: Command<i32> = Command::message(42);
        assert_eq!(cmd.into_message(), Some(42));
    }

    #[test]
    fn command_quit_creates_quit() {
        let cmd: Command<()> = Command::quit();
        assert!(cmd.is_quit());
    }

    #[test]
    fn command_after_keeps_delay_and_message() {
        let cmd: Command<&str> = Command::after(Duration::from_millis(50), "fade-in");
        assert_eq!(
            cmd.into_delayed(),
            Some((Duration::from_millis(50), "fade-in"))
        );
    }

    #[test]
    fn command_batch_empty_returns_none() {
        let cmd: Command<()> = Command::batch(vec![]);
        assert!(cmd.is_none());
    }

    #[test]
    fn command_batch_drops_noops() {
        let cmd: Command<i32> = Command::batch(vec![Command::none(), Command::message(1)]);
        assert_eq!(cmd.into_message(), Some(1));
    }

    #[test]
    fn command_batch_multiple() {
        let cmd: Command<i32> = Command::batch(vec![Command::message(1), Command::message(2)]);
        assert_eq!(cmd.into_batch().map(|cmds| cmds.len()), Some(2));
    }

    #[test]
    fn command_map_message() {
        let cmd: Command<i32> = Command::message(42);
        let mapped: Command<String> = cmd.map(|n| n.to_string());
        assert_eq!(mapped.into_message().as_deref(), Some("42"));
    }

    #[test]
    fn command_map_delay_maps_payload() {
        let cmd: Command<i32> = Command::after(Duration::from_millis(500), 7);
        let mapped: Command<String> = cmd.map(|n| format!("slide {n}"));
        let (delay, msg) = mapped.into_delayed().expect("delay survives map");
        assert_eq!(delay, Duration::from_millis(500));
        assert_eq!(msg, "slide 7");
    }

    #[test]
    fn command_map_quit_stays_quit() {
        let cmd: Command<i32> = Command::quit();
        let mapped: Command<String> = cmd.map(|n| n.to_string());
        assert!(mapped.is_quit());
    }
}
