use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` mirrors [`Model`](crate::Model) except that
/// [`view`](Component::view) receives the area to draw in, so a parent decides
/// where each child lives.  To embed one, wrap the child's message type in a
/// variant of the parent message and lift commands with [`Command::map`]:
///
/// ```rust,ignore
/// use suggestbox_core::{Command, Component, Model};
///
/// struct App { fruit: SuggestBox<String> }
///
/// enum AppMsg { Fruit(suggest_box::Message<String>) }
///
/// impl Model for App {
///     // ...
///     fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///         match msg {
///             AppMsg::Fruit(m) => self.fruit.update(m).map(AppMsg::Fruit),
///         }
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    ///
    /// The returned command uses the component's own `Message` type; the parent
    /// should call [`.map()`](Command::map) to lift it into its own.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into a specific `area` of the [`Frame`].
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently has focus.
    ///
    /// A parent can query this to decide which child receives keyboard
    /// events.  Defaults to `false`.
    fn focused(&self) -> bool {
        false
    }
}
