use crate::command::{Action, Command, CommandInner};
use crate::component::Component;
use crate::model::Model;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// Commands captured from `update`, waiting for a test to run them.
///
/// Immediate messages queue up in order.  Futures are kept in issue order and
/// are only polled when the test asks, which is how tests decide the order in
/// which overlapping async work completes.
struct CommandQueue<Msg: Send + 'static> {
    messages: Vec<Msg>,
    futures: Vec<BoxFuture<'static, Msg>>,
    quit: bool,
}

impl<Msg: Send + 'static> CommandQueue<Msg> {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            futures: Vec::new(),
            quit: false,
        }
    }

    fn collect(&mut self, cmd: Command<Msg>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => self.messages.push(msg),
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Future(fut) => self.futures.push(fut),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }

    fn drain(&mut self, update: &mut impl FnMut(Msg) -> Command<Msg>) {
        while !self.messages.is_empty() {
            let messages: Vec<_> = self.messages.drain(..).collect();
            for msg in messages {
                let cmd = update(msg);
                self.collect(cmd);
            }
        }
    }

    async fn resolve_at(
        &mut self,
        index: usize,
        update: &mut impl FnMut(Msg) -> Command<Msg>,
    ) -> bool {
        if index >= self.futures.len() {
            return false;
        }
        let msg = self.futures.remove(index).await;
        let cmd = update(msg);
        self.collect(cmd);
        self.drain(update);
        true
    }

    async fn settle(&mut self, update: &mut impl FnMut(Msg) -> Command<Msg>) {
        self.drain(update);
        let mut running: FuturesUnordered<_> = self.futures.drain(..).collect();
        while let Some(msg) = running.next().await {
            let cmd = update(msg);
            self.collect(cmd);
            self.drain(update);
            running.extend(self.futures.drain(..));
        }
    }
}

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// Synchronous commands are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages).  Async commands are held
/// until [`resolve_next`](TestProgram::resolve_next),
/// [`resolve_at`](TestProgram::resolve_at) or [`settle`](TestProgram::settle)
/// runs them, so a test controls both *whether* and *in which order* pending
/// work completes.  Pair with `#[tokio::test(start_paused = true)]` when the
/// futures contain timers.
///
/// # Example
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Picker>::new(());
/// prog.send(Msg::Focus);
/// prog.settle().await;
/// assert_eq!(prog.model().results().len(), 4);
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    queue: CommandQueue<M::Message>,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut queue = CommandQueue::new();
        queue.collect(init_cmd);
        Self { model, queue }
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.queue.collect(cmd);
    }

    /// Process all pending synchronous messages, including ones they produce.
    pub fn drain_messages(&mut self) {
        let model = &mut self.model;
        self.queue.drain(&mut |msg| model.update(msg));
    }

    /// Number of async commands waiting to be resolved.
    pub fn pending_futures(&self) -> usize {
        self.queue.futures.len()
    }

    /// Whether a [`Command::quit`] has been returned.
    pub fn quit_requested(&self) -> bool {
        self.queue.quit
    }

    /// Await the oldest pending future and feed its message to `update`.
    ///
    /// Returns `false` when nothing was pending.
    pub async fn resolve_next(&mut self) -> bool {
        self.resolve_at(0).await
    }

    /// Await the pending future at `index` (issue order) and feed its message
    /// to `update`, leaving the others pending.
    pub async fn resolve_at(&mut self, index: usize) -> bool {
        let model = &mut self.model;
        self.queue.resolve_at(index, &mut |msg| model.update(msg)).await
    }

    /// Run every pending future to completion, in completion order, until no
    /// messages or futures remain.
    pub async fn settle(&mut self) {
        let model = &mut self.model;
        self.queue.settle(&mut |msg| model.update(msg)).await;
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a ratatui [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        draw(width, height, |frame| self.model.view(frame))
    }

    /// Render the model and return the visible content as a plain string.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }
}

/// Like [`TestProgram`], but for a single [`Component`] rendered into the
/// whole test area.
pub struct TestComponent<C: Component> {
    component: C,
    queue: CommandQueue<C::Message>,
}

impl<C: Component> TestComponent<C> {
    /// Wrap an already-constructed component.
    pub fn new(component: C) -> Self {
        Self {
            component,
            queue: CommandQueue::new(),
        }
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: C::Message) {
        let cmd = self.component.update(msg);
        self.queue.collect(cmd);
    }

    /// Process all pending synchronous messages, including ones they produce.
    pub fn drain_messages(&mut self) {
        let component = &mut self.component;
        self.queue.drain(&mut |msg| component.update(msg));
    }

    /// Take the queued synchronous messages without processing them.
    ///
    /// Useful for asserting on notifications a component emits for its parent.
    pub fn take_messages(&mut self) -> Vec<C::Message> {
        std::mem::take(&mut self.queue.messages)
    }

    /// Number of async commands waiting to be resolved.
    pub fn pending_futures(&self) -> usize {
        self.queue.futures.len()
    }

    /// Await the oldest pending future and feed its message to `update`.
    pub async fn resolve_next(&mut self) -> bool {
        self.resolve_at(0).await
    }

    /// Await the pending future at `index` (issue order), leaving the others pending.
    pub async fn resolve_at(&mut self, index: usize) -> bool {
        let component = &mut self.component;
        self.queue
            .resolve_at(index, &mut |msg| component.update(msg))
            .await
    }

    /// Run every pending future to completion, in completion order.
    pub async fn settle(&mut self) {
        let component = &mut self.component;
        self.queue.settle(&mut |msg| component.update(msg)).await;
    }

    /// Get a shared reference to the component for assertions.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Get a mutable reference to the component for direct test setup.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Render the component into a buffer of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        draw(width, height, |frame| {
            let area = frame.area();
            self.component.view(frame, area);
        })
    }

    /// Render the component and return the visible content as a plain string.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }
}

fn draw(width: u16, height: u16, f: impl FnOnce(&mut ratatui::Frame)) -> Buffer {
    let backend = ratatui::backend::TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test backend never fails");
    terminal.draw(f).expect("test backend never fails");
    terminal.backend().buffer().clone()
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area: Rect = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;
    use std::time::Duration;

    struct Counter {
        count: i64,
        log: Vec<&'static str>,
    }

    #[derive(Debug)]
    enum CounterMsg {
        Increment,
        Chain,
        Later(&'static str, u64),
        Done(&'static str),
        Quit,
    }

    impl Model for Counter {
        type Message = CounterMsg;
        type Flags = i64;

        fn init(initial: i64) -> (Self, Command<CounterMsg>) {
            (
                Counter {
                    count: initial,
                    log: Vec::new(),
                },
                Command::none(),
            )
        }

        fn update(&mut self, msg: CounterMsg) -> Command<CounterMsg> {
            match msg {
                CounterMsg::Increment => {
                    self.count += 1;
                    Command::none()
                }
                CounterMsg::Chain => Command::message(CounterMsg::Increment),
                CounterMsg::Later(name, ms) => {
                    Command::tick(Duration::from_millis(ms), move |_| CounterMsg::Done(name))
                }
                CounterMsg::Done(name) => {
                    self.log.push(name);
                    Command::none()
                }
                CounterMsg::Quit => Command::quit(),
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = format!("Count: {}", self.count);
            frame.render_widget(Paragraph::new(text), frame.area());
        }
    }

    #[test]
    fn send_updates_model() {
        let mut prog = TestProgram::<Counter>::new(41);
        prog.send(CounterMsg::Increment);
        assert_eq!(prog.model().count, 42);
    }

    #[test]
    fn chained_messages_wait_for_drain() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Chain);
        assert_eq!(prog.model().count, 0);
        prog.drain_messages();
        assert_eq!(prog.model().count, 1);
    }

    #[test]
    fn quit_is_recorded() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Quit);
        assert!(prog.quit_requested());
    }

    #[test]
    fn render_string_shows_view() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Increment);
        assert!(prog.render_string(20, 1).contains("Count: 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn settle_delivers_in_completion_order() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Later("slow", 300));
        prog.send(CounterMsg::Later("fast", 100));
        assert_eq!(prog.pending_futures(), 2);

        prog.settle().await;
        assert_eq!(prog.model().log, vec!["fast", "slow"]);
        assert_eq!(prog.pending_futures(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn resolve_at_picks_the_order() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Later("first", 100));
        prog.send(CounterMsg::Later("second", 300));

        assert!(prog.resolve_at(1).await);
        assert!(prog.resolve_next().await);
        assert!(!prog.resolve_next().await);
        assert_eq!(prog.model().log, vec!["second", "first"]);
    }
}
