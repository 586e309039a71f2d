use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};

/// Terminal events read by the runtime and handed to
/// [`Model::on_event`](crate::Model::on_event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A key press (repeat and release events are filtered out).
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl TerminalEvent {
    /// Convert a raw crossterm event, dropping key releases.
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        match event {
            crossterm::event::Event::Key(k) if k.kind == KeyEventKind::Release => None,
            crossterm::event::Event::Key(k) => Some(TerminalEvent::Key(k)),
            crossterm::event::Event::Mouse(m) => Some(TerminalEvent::Mouse(m)),
            crossterm::event::Event::Resize(w, h) => Some(TerminalEvent::Resize(w, h)),
            crossterm::event::Event::FocusGained => Some(TerminalEvent::FocusGained),
            crossterm::event::Event::FocusLost => Some(TerminalEvent::FocusLost),
            crossterm::event::Event::Paste(s) => Some(TerminalEvent::Paste(s)),
        }
    }
}
