use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use crate::subscription::SubscriptionId;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::time::Duration;

/// A headless harness that drives a [`Model`] without a terminal or a tokio
/// runtime.
///
/// Immediate messages ([`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages). Delayed messages
/// ([`Command::after`]) are queued against a virtual clock and fire when the
/// test calls [`advance`](TestProgram::advance). Async futures are ignored.
///
/// ```rust,ignore
/// let mut page = TestProgram::<Storefront>::new(flags);
/// page.send(Msg::Page(PageEvent::Key(KeyCode::Right.into())));
/// page.advance(Duration::from_millis(500)); // let the slide transition settle
/// assert!(page.render_string(80, 24).contains("Summer sale"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    scheduled: Vec<Scheduled<M::Message>>,
    now: Duration,
    next_seq: u64,
    quit: bool,
}

struct Scheduled<Msg> {
    due: Duration,
    seq: u64,
    msg: Msg,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    ///
    /// Immediate messages produced by `init` are queued, not processed.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            scheduled: Vec::new(),
            now: Duration::ZERO,
            next_seq: 0,
            quit: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Process queued immediate messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect(cmd);
            }
        }
    }

    /// Move the virtual clock forward, firing every delayed message that
    /// comes due, in due order. Immediate messages are drained after each
    /// delivery, so chains of delays resolve within one call.
    pub fn advance(&mut self, by: Duration) {
        let until = self.now + by;
        self.drain_messages();
        while let Some(pos) = self.next_due(until) {
            let entry = self.scheduled.remove(pos);
            self.now = entry.due;
            let cmd = self.model.update(entry.msg);
            self.collect(cmd);
            self.drain_messages();
        }
        self.now = until;
    }

    /// Virtual time elapsed since the program was created.
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    /// Number of delayed messages that have not fired yet.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.len()
    }

    /// Ids of the subscriptions the model currently declares.
    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.model
            .subscriptions()
            .iter()
            .map(|sub| sub.id().clone())
            .collect()
    }

    /// Whether any update returned [`Command::quit`].
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model, bypassing the update cycle.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a [`Buffer`] of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                self.model.view(frame);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    /// Render the model and return the visible content, one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let area = Rect::new(0, 0, width, height);
        let mut output = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                output.push_str(buf[(x, y)].symbol());
            }
            if y < area.bottom() - 1 {
                output.push('\n');
            }
        }
        output
    }

    fn next_due(&self, until: Duration) -> Option<usize> {
        self.scheduled
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(pos, _)| pos)
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                self.pending_messages.push(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.quit = true;
            }
            CommandInner::Delay { delay, msg } => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.scheduled.push(Scheduled {
                    due: self.now + delay,
                    seq,
                    msg,
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
            // Async work needs a runtime; tests feed its result in by hand.
            CommandInner::Future(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    /// A flash banner that shows a message and clears it after a delay.
    struct Flash {
        text: Option<String>,
        generation: u64,
        log: Vec<String>,
    }

    #[derive(Debug)]
    enum FlashMsg {
        Show(String),
        Expire(u64),
        Echo(String),
    }

    impl Model for Flash {
        type Message = FlashMsg;
        type Flags = ();

        fn init(_: ()) -> (Self, Command<FlashMsg>) {
            (
                Flash {
                    text: None,
                    generation: 0,
                    log: vec![],
                },
                Command::none(),
            )
        }

        fn update(&mut self, msg: FlashMsg) -> Command<FlashMsg> {
            match msg {
                FlashMsg::Show(text) => {
                    self.generation += 1;
                    self.log.push(format!("show {text}"));
                    self.text = Some(text.clone());
                    Command::batch([
                        Command::message(FlashMsg::Echo(text)),
                        Command::after(Duration::from_millis(300), FlashMsg::Expire(self.generation)),
                    ])
                }
                FlashMsg::Expire(generation) => {
                    if generation == self.generation {
                        self.log.push("expire".into());
                        self.text = None;
                    }
                    Command::none()
                }
                FlashMsg::Echo(text) => {
                    self.log.push(format!("echo {text}"));
                    Command::none()
                }
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = self.text.clone().unwrap_or_default();
            frame.render_widget(Paragraph::new(text), frame.area());
        }
    }

    #[test]
    fn immediate_messages_wait_for_drain() {
        let mut prog = TestProgram::<Flash>::new(());
        prog.send(FlashMsg::Show("sale".into()));
        assert_eq!(prog.model().log, vec!["show sale"]);
        prog.drain_messages();
        assert_eq!(prog.model().log, vec!["show sale", "echo sale"]);
    }

    #[test]
    fn delayed_messages_fire_on_advance() {
        let mut prog = TestProgram::<Flash>::new(());
        prog.send(FlashMsg::Show("sale".into()));
        assert_eq!(prog.scheduled_count(), 1);

        prog.advance(Duration::from_millis(299));
        assert_eq!(prog.model().text.as_deref(), Some("sale"));

        prog.advance(Duration::from_millis(1));
        assert_eq!(prog.model().text, None);
        assert_eq!(prog.scheduled_count(), 0);
        assert_eq!(prog.elapsed(), Duration::from_millis(300));
    }

    #[test]
    fn superseded_delay_is_ignored() {
        let mut prog = TestProgram::<Flash>::new(());
        prog.send(FlashMsg::Show("one".into()));
        prog.advance(Duration::from_millis(200));
        prog.send(FlashMsg::Show("two".into()));

        // First expiry comes due but carries a stale generation.
        prog.advance(Duration::from_millis(150));
        assert_eq!(prog.model().text.as_deref(), Some("two"));

        prog.advance(Duration::from_millis(150));
        assert_eq!(prog.model().text, None);
    }

    #[test]
    fn render_string_shows_view() {
        let mut prog = TestProgram::<Flash>::new(());
        prog.send(FlashMsg::Show("Neon".into()));
        assert!(prog.render_string(20, 1).contains("Neon"));
    }
}
