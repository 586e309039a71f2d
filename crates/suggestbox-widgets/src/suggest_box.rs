//! Searchable multi-select combobox.
//!
//! A text input that reveals a dropdown of suggestions on focus or trigger
//! click.  Typing refines the suggestions, either through the default
//! case-insensitive filter over a fixed list or through a caller-supplied
//! (possibly async) lookup.  Arrow keys move the highlight, Enter or Tab adds
//! the highlighted item to the selection chips, Backspace on an empty query
//! removes the last chip, and Esc closes the dropdown and clears the query.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use suggestbox_widgets::suggest_box::SuggestBox;
//!
//! let fruit = SuggestBox::new()
//!     .with_items(vec!["Apple", "Apricot", "Banana"])
//!     .with_placeholder("Search fruits...");
//!
//! let remote: SuggestBox<String> = SuggestBox::new()
//!     .with_async_suggestions(|q: String| async move { lookup(&q).await })
//!     .with_call_delay(Duration::from_millis(150));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;
use suggestbox_core::command::Command;
use suggestbox_core::component::Component;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cursor::Cursor;
use crate::item::Item;
use crate::provider::{
    AsyncProvider, FnProvider, LookupResult, Request, Resolution, StaticProvider, Suggestions,
};
use crate::request::RequestToken;
use crate::selection::SelectionList;
use crate::text_edit::TextEditState;
use crate::view_state::{Indicator, Row, ViewState};

pub use crate::view_state::ids;

/// Messages for the suggest box.
///
/// The first group is input the parent forwards.  `Resolved` is produced by the
/// widget's own lookups.  `Selected`, `Removed` and `Dismissed` are emitted by
/// the widget so the parent can react to them.
#[derive(Clone)]
pub enum Message<I> {
    /// The input gained focus.
    Focus,
    /// The input lost focus.
    Blur,
    /// The trigger control was clicked.
    TriggerClick,
    /// A key press on the input.
    KeyPress(KeyEvent),
    /// The whole input value was replaced (paste, programmatic edit).
    Input(String),
    /// A lookup finished.
    Resolved {
        token: RequestToken,
        result: LookupResult<I>,
    },
    /// An item was added to the selection.
    Selected(I),
    /// An item was removed from the selection.
    Removed(I),
    /// The dropdown was closed with Esc.
    Dismissed,
}

impl<I: Item> fmt::Debug for Message<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Focus => f.write_str("Focus"),
            Message::Blur => f.write_str("Blur"),
            Message::TriggerClick => f.write_str("TriggerClick"),
            Message::KeyPress(key) => write!(f, "KeyPress({:?})", key.code),
            Message::Input(text) => write!(f, "Input({text:?})"),
            Message::Resolved { token, result } => match result {
                Ok(items) => write!(f, "Resolved({}, {} items)", token.get(), items.len()),
                Err(e) => write!(f, "Resolved({}, {e})", token.get()),
            },
            Message::Selected(item) => write!(f, "Selected({:?})", item.label()),
            Message::Removed(item) => write!(f, "Removed({:?})", item.label()),
            Message::Dismissed => f.write_str("Dismissed"),
        }
    }
}

/// Plain configuration for a [`SuggestBox`].
#[derive(Debug, Clone)]
pub struct SuggestBoxOptions {
    /// Text shown while the query is empty.
    pub placeholder: String,
    /// Artificial delay before every lookup resolves.
    pub call_delay: Option<Duration>,
    /// Maximum number of result rows drawn at once.
    pub max_visible: usize,
}

impl Default for SuggestBoxOptions {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            call_delay: None,
            max_visible: 8,
        }
    }
}

/// Style configuration for the suggest box.
#[derive(Debug, Clone)]
pub struct SuggestBoxStyle {
    /// Base style of the whole widget.
    pub root: Style,
    /// Style for the query text.
    pub input: Style,
    /// Style for the placeholder.
    pub placeholder: Style,
    /// Style for the text caret.
    pub caret: Style,
    /// Style for selection chips.
    pub chip: Style,
    /// Style for the trigger glyph.
    pub trigger: Style,
    /// Style for result rows.
    pub item: Style,
    /// Style for the highlighted result row.
    pub current_item: Style,
    /// Style for the fetching and result count lines.
    pub indicator: Style,
    /// Style for the not-found line.
    pub not_found: Style,
}

impl Default for SuggestBoxStyle {
    fn default() -> Self {
        Self {
            root: Style::default(),
            input: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            caret: Style::default().add_modifier(Modifier::REVERSED),
            chip: Style::default().fg(Color::Black).bg(Color::Cyan),
            trigger: Style::default().fg(Color::Cyan),
            item: Style::default(),
            current_item: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            indicator: Style::default().fg(Color::DarkGray),
            not_found: Style::default().fg(Color::Red),
        }
    }
}

/// Searchable multi-select combobox component.
pub struct SuggestBox<I: Item> {
    suggestions: Suggestions<I>,
    editor: TextEditState,
    cursor: Cursor,
    selection: SelectionList<I>,
    options: SuggestBoxOptions,
    style: SuggestBoxStyle,
    open: bool,
    focused: bool,
}

impl<I: Item> Default for SuggestBox<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Item> SuggestBox<I> {
    /// Create a suggest box with no items.
    pub fn new() -> Self {
        let options = SuggestBoxOptions::default();
        Self {
            suggestions: Suggestions::new(StaticProvider::new(Vec::new())),
            editor: TextEditState::new(),
            cursor: Cursor::new(options.max_visible),
            selection: SelectionList::new(),
            options,
            style: SuggestBoxStyle::default(),
            open: false,
            focused: false,
        }
    }

    /// Suggest from a fixed list using the default case-insensitive filter.
    pub fn with_items(mut self, items: Vec<I>) -> Self {
        self.suggestions.set_provider(StaticProvider::new(items));
        self
    }

    /// Suggest from a synchronous function of the query text.
    pub fn with_suggestions_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Vec<I> + Send + Sync + 'static,
    {
        self.suggestions.set_provider(FnProvider::new(f));
        self
    }

    /// Suggest from an asynchronous function of the query text.
    ///
    /// Only the answer to the most recently issued query is ever shown; an
    /// error or panic shows as an empty result.
    pub fn with_async_suggestions<F, Fut, E>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<I>, E>> + Send + 'static,
        E: fmt::Display + 'static,
    {
        self.suggestions.set_provider(AsyncProvider::new(f));
        self
    }

    /// Set the placeholder text.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.options.placeholder = placeholder.into();
        self
    }

    /// Delay every lookup by `delay`, showing the fetching indicator meanwhile.
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.options.call_delay = Some(delay).filter(|d| !d.is_zero());
        self.suggestions.set_call_delay(self.options.call_delay);
        self
    }

    /// Set the maximum number of result rows drawn at once.
    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.options.max_visible = max.max(1);
        self.cursor.set_visible(self.options.max_visible);
        self
    }

    /// Apply a full set of options.
    pub fn with_options(self, options: SuggestBoxOptions) -> Self {
        let max_visible = options.max_visible;
        let call_delay = options.call_delay;
        let mut this = Self { options, ..self };
        this.options.call_delay = call_delay.filter(|d| !d.is_zero());
        this.suggestions.set_call_delay(this.options.call_delay);
        this.with_max_visible(max_visible)
    }

    /// Set the style.
    pub fn with_style(mut self, style: SuggestBoxStyle) -> Self {
        self.style = style;
        self
    }

    pub fn options(&self) -> &SuggestBoxOptions {
        &self.options
    }

    /// Whether the dropdown is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether a lookup is outstanding.
    pub fn is_loading(&self) -> bool {
        self.suggestions.is_loading()
    }

    /// The current query text.
    pub fn query(&self) -> String {
        self.editor.value()
    }

    /// The current result set.
    pub fn results(&self) -> &[I] {
        self.suggestions.results()
    }

    /// The highlighted result, if any.
    pub fn highlighted(&self) -> Option<&I> {
        self.cursor
            .index()
            .and_then(|i| self.suggestions.results().get(i))
    }

    /// The highlighted position, `-1` when nothing is highlighted.
    pub fn cursor_position(&self) -> isize {
        self.cursor.position()
    }

    /// The chosen items, in selection order.
    pub fn selection(&self) -> &[I] {
        self.selection.items()
    }

    /// Project the current state into what is displayed.
    pub fn view_state(&self) -> ViewState<'_> {
        let results = self.suggestions.results();
        let rows: Vec<Row<'_>> = results
            .iter()
            .enumerate()
            .map(|(index, item)| Row {
                index,
                label: item.label(),
                current: self.cursor.index() == Some(index),
            })
            .collect();
        let start = self.cursor.offset().min(rows.len());
        let end = (start + self.cursor.visible()).min(rows.len());
        ViewState {
            open: self.open,
            indicator: Indicator::derive(
                self.suggestions.is_loading(),
                self.suggestions.has_searched(),
                results.len(),
            ),
            rows,
            window: start..end,
            chips: self.selection.labels().collect(),
            query: self.editor.value(),
            placeholder: (self.editor.is_empty() && !self.options.placeholder.is_empty())
                .then_some(self.options.placeholder.as_str()),
        }
    }

    fn open(&mut self) -> Command<Message<I>> {
        if self.open {
            return Command::none();
        }
        self.open = true;
        tracing::trace!(target: "suggestbox::widget", "dropdown opened");
        self.refresh()
    }

    fn close(&mut self) {
        self.open = false;
        self.editor.clear();
        self.cursor.reset();
        self.cursor.set_count(0);
        self.suggestions.invalidate();
        tracing::trace!(target: "suggestbox::widget", "dropdown closed");
    }

    /// Issue a lookup for the current text.
    fn refresh(&mut self) -> Command<Message<I>> {
        match self.suggestions.request(&self.editor.value()) {
            Request::Unchanged => Command::none(),
            Request::Applied => {
                self.cursor.set_count(self.suggestions.results().len());
                Command::none()
            }
            Request::Pending(token, fut) => {
                Command::perform(fut, move |result| Message::Resolved { token, result })
            }
        }
    }

    /// The query text changed: re-query if open, otherwise open (which queries).
    fn text_changed(&mut self) -> Command<Message<I>> {
        if self.open {
            self.refresh()
        } else {
            self.open()
        }
    }

    fn accept(&mut self) -> Command<Message<I>> {
        match self.highlighted().cloned() {
            Some(item) => {
                self.selection.push(item.clone());
                Command::message(Message::Selected(item))
            }
            None => Command::none(),
        }
    }

    fn backspace(&mut self) -> Command<Message<I>> {
        if !self.editor.is_empty() {
            if self.editor.delete_back() {
                return self.text_changed();
            }
            return Command::none();
        }
        match self.selection.pop() {
            Some(item) => {
                self.cursor.reset();
                Command::message(Message::Removed(item))
            }
            None => Command::none(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message<I>> {
        if !self.focused {
            return Command::none();
        }
        if !self.open {
            return match (key.code, key.modifiers) {
                (KeyCode::Esc, _) => Command::none(),
                (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                    self.editor.insert_char(c);
                    self.open()
                }
                (KeyCode::Backspace, _) => {
                    let removed = self.backspace();
                    Command::batch([removed, self.open()])
                }
                _ => self.open(),
            };
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                self.close();
                Command::message(Message::Dismissed)
            }
            (KeyCode::Down, _) => {
                self.cursor.move_down();
                Command::none()
            }
            (KeyCode::Up, _) => {
                self.cursor.move_up();
                Command::none()
            }
            (KeyCode::Enter, _) | (KeyCode::Tab, _) => self.accept(),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => {
                if self.editor.delete_forward() {
                    self.text_changed()
                } else {
                    Command::none()
                }
            }
            (KeyCode::Left, _) => {
                self.editor.move_left();
                Command::none()
            }
            (KeyCode::Right, _) => {
                self.editor.move_right();
                Command::none()
            }
            (KeyCode::Home, _) => {
                self.editor.move_home();
                Command::none()
            }
            (KeyCode::End, _) => {
                self.editor.move_end();
                Command::none()
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.editor.insert_char(c);
                self.text_changed()
            }
            _ => Command::none(),
        }
    }

    fn input_line(&self, view: &ViewState<'_>, width: usize) -> Line<'static> {
        let mut spans = Vec::new();
        for chip in &view.chips {
            spans.push(Span::styled(format!(" {chip} "), self.style.chip));
            spans.push(Span::raw(" "));
        }

        if let Some(placeholder) = view.placeholder {
            if self.focused {
                spans.push(Span::styled(" ", self.style.caret));
            }
            spans.push(Span::styled(placeholder.to_string(), self.style.placeholder));
        } else if self.focused {
            let chars = self.editor.chars();
            let caret = self.editor.cursor();
            let before: String = chars[..caret].iter().collect();
            spans.push(Span::styled(before, self.style.input));
            match chars.get(caret) {
                Some(c) => {
                    spans.push(Span::styled(c.to_string(), self.style.caret));
                    let after: String = chars[caret + 1..].iter().collect();
                    spans.push(Span::styled(after, self.style.input));
                }
                None => spans.push(Span::styled(" ", self.style.caret)),
            }
        } else {
            spans.push(Span::styled(view.query.clone(), self.style.input));
        }

        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        if used + 1 < width {
            spans.push(Span::raw(" ".repeat(width - used - 1)));
        }
        Line::from(spans)
    }
}

impl<I: Item> Component for SuggestBox<I> {
    type Message = Message<I>;

    fn update(&mut self, msg: Message<I>) -> Command<Message<I>> {
        match msg {
            Message::Focus => {
                self.focused = true;
                self.open()
            }
            Message::Blur => {
                self.focused = false;
                if self.open {
                    self.close();
                }
                Command::none()
            }
            Message::TriggerClick => self.open(),
            Message::KeyPress(key) => self.handle_key(key),
            Message::Input(text) => {
                if text == self.editor.value() {
                    return Command::none();
                }
                self.editor.set_value(&text);
                self.text_changed()
            }
            Message::Resolved { token, result } => {
                if let Resolution::Applied(count) = self.suggestions.resolve(token, result) {
                    self.cursor.set_count(count);
                }
                Command::none()
            }
            Message::Selected(_) | Message::Removed(_) | Message::Dismissed => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let view = self.view_state();

        // Input row with the trigger glyph in the last column
        let input_area = Rect { height: 1, ..area };
        let line = self.input_line(&view, area.width as usize);
        frame.render_widget(Paragraph::new(line).style(self.style.root), input_area);
        let trigger_area = Rect {
            x: area.right() - 1,
            width: 1,
            ..input_area
        };
        let glyph = if view.open { "▴" } else { "▾" };
        frame.render_widget(
            Paragraph::new(Span::styled(glyph, self.style.trigger)),
            trigger_area,
        );

        if !view.open || area.height < 2 {
            return;
        }

        let mut lines = Vec::new();
        if let Some(text) = view.indicator.text() {
            let style = match view.indicator {
                Indicator::NotFound => self.style.not_found,
                _ => self.style.indicator,
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
        let label_width = (area.width as usize).saturating_sub(2);
        for row in &view.rows[view.window.clone()] {
            let (prefix, style) = if row.current {
                ("▸ ", self.style.current_item)
            } else {
                ("  ", self.style.item)
            };
            let label = truncate(row.label, label_width);
            lines.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
        }

        let dropdown_area = Rect {
            y: area.y + 1,
            height: (lines.len() as u16).min(area.height - 1),
            ..area
        };
        frame.render_widget(Clear, dropdown_area);
        frame.render_widget(
            Paragraph::new(lines).style(self.style.root),
            dropdown_area,
        );
    }

    fn focused(&self) -> bool {
        self.focused
    }
}

/// Cut `text` to at most `max_width` display columns, marking the cut with `…`.
fn truncate(text: &str, max_width: usize) -> Cow<'_, str> {
    if text.width() <= max_width {
        return Cow::Borrowed(text);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Named;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use suggestbox_core::testing::TestComponent;

    fn key(code: KeyCode) -> Message<Named> {
        Message::KeyPress(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn named(names: &[&str]) -> Vec<Named> {
        names.iter().map(|n| Named::new(*n)).collect()
    }

    fn harness(names: &[&str]) -> TestComponent<SuggestBox<Named>> {
        TestComponent::new(
            SuggestBox::new()
                .with_items(named(names))
                .with_placeholder("testing placeholder"),
        )
    }

    fn labels(sb: &SuggestBox<Named>) -> Vec<String> {
        sb.results().iter().map(|n| n.name.clone()).collect()
    }

    fn chips(sb: &SuggestBox<Named>) -> Vec<String> {
        sb.selection().iter().map(|n| n.name.clone()).collect()
    }

    fn current(sb: &SuggestBox<Named>) -> Option<String> {
        sb.view_state().current().map(|row| row.label.to_string())
    }

    #[test]
    fn placeholder_is_shown_while_empty() {
        let sb: SuggestBox<Named> = SuggestBox::new().with_placeholder("testing placeholder");
        assert_eq!(sb.view_state().placeholder, Some("testing placeholder"));
    }

    #[test]
    fn focus_opens_and_blur_closes() {
        let mut t = harness(&[]);
        assert!(!t.component().view_state().is_present(ids::DROP_DOWN));
        t.send(Message::Focus);
        assert!(t.component().view_state().is_present(ids::DROP_DOWN));
        t.send(Message::Blur);
        assert!(!t.component().view_state().is_present(ids::DROP_DOWN));
    }

    #[test]
    fn trigger_click_opens_and_second_click_keeps_open() {
        let mut t = harness(&[]);
        t.send(Message::TriggerClick);
        assert!(t.component().is_open());
        t.send(Message::TriggerClick);
        assert!(t.component().is_open());
        assert!(!t.component().focused());
    }

    #[test]
    fn dropdown_rows_match_items() {
        let mut t = harness(&["item1", "item2", "item3"]);
        t.send(Message::TriggerClick);
        let view = t.component().view_state();
        assert_eq!(view.indicator, Indicator::ResultCount(3));
        assert_eq!(view.visible_labels(), vec!["item1", "item2", "item3"]);
    }

    #[test]
    fn default_search_filters_by_substring() {
        let mut t = harness(&["aaa", "bbb", "ccc"]);
        t.send(Message::Focus);
        for (query, expected) in [("a", "aaa"), ("b", "bbb"), ("c", "ccc")] {
            t.send(Message::Input(query.into()));
            assert_eq!(labels(t.component()), vec![expected]);
        }
        t.send(Message::Input("d".into()));
        assert!(labels(t.component()).is_empty());
    }

    #[test]
    fn result_count_and_not_found() {
        let mut t = harness(&["aaa", "aab", "abc"]);
        t.send(Message::Focus);
        let view = t.component().view_state();
        assert_eq!(view.indicator, Indicator::ResultCount(3));
        assert!(!view.is_present(ids::NOT_FOUND));

        for (query, count) in [("a", 3), ("b", 2), ("c", 1)] {
            t.send(Message::Input(query.into()));
            let view = t.component().view_state();
            assert_eq!(view.indicator, Indicator::ResultCount(count), "query {query}");
            assert!(!view.is_present(ids::NOT_FOUND));
        }

        t.send(Message::Input("d".into()));
        let view = t.component().view_state();
        assert!(!view.is_present(ids::RESULT_COUNT));
        assert!(view.is_present(ids::NOT_FOUND));
    }

    #[test]
    fn typing_keys_builds_the_query() {
        let mut t = harness(&["aaa", "aab", "abc"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Char('a')));
        t.send(key(KeyCode::Char('b')));
        assert_eq!(t.component().query(), "ab");
        assert_eq!(labels(t.component()), vec!["aab", "abc"]);
        t.send(key(KeyCode::Char('d')));
        assert_eq!(t.component().view_state().indicator, Indicator::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn call_delay_shows_fetching_until_resolved() {
        let mut t = TestComponent::new(
            SuggestBox::<Named>::new().with_call_delay(Duration::from_millis(500)),
        );
        t.send(Message::TriggerClick);
        assert!(t.component().view_state().is_present(ids::FETCHING));
        assert_eq!(t.pending_futures(), 1);

        let start = tokio::time::Instant::now();
        t.settle().await;
        assert!(start.elapsed() >= Duration::from_millis(500));
        let view = t.component().view_state();
        assert!(!view.is_present(ids::FETCHING));
        assert!(view.is_present(ids::NOT_FOUND));
    }

    #[test]
    fn arrow_down_clamps_at_last_item() {
        let mut t = harness(&["item1", "item2", "item3", "item4"]);
        t.send(Message::Focus);
        for _ in 0..4 {
            t.send(key(KeyCode::Down));
        }
        assert_eq!(current(t.component()).as_deref(), Some("item4"));
        t.send(key(KeyCode::Down));
        assert_eq!(current(t.component()).as_deref(), Some("item4"));
        assert_eq!(t.component().cursor_position(), 3);
    }

    #[test]
    fn keyboard_navigation_selection_and_removal() {
        let mut t = harness(&["item1", "item2", "item3", "item4"]);
        t.send(Message::Focus);

        for expected in ["item1", "item2", "item3", "item4", "item4"] {
            t.send(key(KeyCode::Down));
            assert_eq!(current(t.component()).as_deref(), Some(expected));
        }
        t.send(key(KeyCode::Up));
        assert_eq!(current(t.component()).as_deref(), Some("item3"));

        t.send(key(KeyCode::Enter));
        assert_eq!(chips(t.component()), vec!["item3"]);

        t.send(key(KeyCode::Backspace));
        assert!(chips(t.component()).is_empty());

        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Tab));
        assert_eq!(chips(t.component()), vec!["item1", "item3"]);
        assert_eq!(t.component().view_state().chips, vec!["item1", "item3"]);

        t.send(key(KeyCode::Backspace));
        assert_eq!(chips(t.component()), vec!["item1"]);
        t.send(key(KeyCode::Backspace));
        assert!(chips(t.component()).is_empty());

        t.send(Message::Input("item".into()));
        assert_eq!(t.component().query(), "item");

        t.send(key(KeyCode::Esc));
        assert!(!t.component().view_state().is_present(ids::DROP_DOWN));
        assert_eq!(t.component().query(), "");

        t.send(key(KeyCode::Down));
        assert!(t.component().view_state().is_present(ids::DROP_DOWN));

        t.send(key(KeyCode::Esc));
        assert!(!t.component().is_open());

        t.send(key(KeyCode::Char('i')));
        assert!(t.component().view_state().is_present(ids::DROP_DOWN));
        assert_eq!(t.component().query(), "i");
    }

    #[test]
    fn blur_then_focus_resets_query() {
        let mut t = harness(&["item1", "item2"]);
        t.send(Message::Focus);
        t.send(Message::Input("2".into()));
        t.send(key(KeyCode::Down));
        t.send(Message::Blur);
        assert!(!t.component().is_open());

        t.send(Message::Focus);
        assert!(t.component().is_open());
        assert_eq!(t.component().query(), "");
        assert_eq!(t.component().cursor_position(), -1);
        assert_eq!(labels(t.component()), vec!["item1", "item2"]);
    }

    #[test]
    fn selection_survives_close_and_reopen() {
        let mut t = harness(&["item1", "item2"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        t.send(Message::Blur);
        t.send(Message::Focus);
        assert_eq!(chips(t.component()), vec!["item1"]);
    }

    #[test]
    fn select_then_backspace_round_trips() {
        let mut t = harness(&["item1", "item2", "item3"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        let before = chips(t.component());

        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        t.send(key(KeyCode::Backspace));
        assert_eq!(chips(t.component()), before);
    }

    #[test]
    fn backspace_with_text_edits_instead_of_removing() {
        let mut t = harness(&["item1", "item2"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        t.send(Message::Input("it".into()));

        t.send(key(KeyCode::Backspace));
        assert_eq!(t.component().query(), "i");
        assert_eq!(chips(t.component()), vec!["item1"]);
    }

    #[test]
    fn selected_and_removed_are_announced() {
        let mut t = harness(&["item1", "item2"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        t.send(key(KeyCode::Backspace));
        t.send(key(KeyCode::Esc));

        let notes: Vec<String> = t
            .take_messages()
            .into_iter()
            .map(|m| format!("{m:?}"))
            .collect();
        assert_eq!(
            notes,
            vec![
                "Selected(\"item1\")".to_string(),
                "Removed(\"item1\")".to_string(),
                "Dismissed".to_string(),
            ]
        );
    }

    #[test]
    fn accept_without_highlight_is_noop() {
        let mut t = harness(&["item1"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Enter));
        t.send(key(KeyCode::Tab));
        assert!(chips(t.component()).is_empty());
        assert!(t.take_messages().is_empty());
    }

    #[test]
    fn keys_on_empty_results_are_noops() {
        let mut t = harness(&["item1"]);
        t.send(Message::Focus);
        t.send(Message::Input("zzz".into()));
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Up));
        t.send(key(KeyCode::Enter));
        assert_eq!(t.component().cursor_position(), -1);
        assert!(chips(t.component()).is_empty());
    }

    #[test]
    fn esc_while_closed_is_noop() {
        let mut t = harness(&["item1"]);
        t.send(key(KeyCode::Esc));
        assert!(!t.component().is_open());
        assert!(t.take_messages().is_empty());
    }

    #[test]
    fn navigation_key_while_closed_only_opens() {
        let mut t = harness(&["item1", "item2"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Esc));
        assert!(!t.component().is_open());
        t.send(key(KeyCode::Down));
        assert!(t.component().is_open());
        assert_eq!(t.component().cursor_position(), -1);
    }

    #[test]
    fn unfocused_keys_are_ignored() {
        let mut t = harness(&["item1", "item2"]);
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Char('x')));
        assert!(!t.component().is_open());
        assert_eq!(t.component().query(), "");

        // Trigger click opens without focusing.
        t.send(Message::TriggerClick);
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        assert_eq!(t.component().cursor_position(), -1);
        assert!(chips(t.component()).is_empty());
    }

    #[test]
    fn keys_after_blur_leave_selection_alone() {
        let mut t = harness(&["item1", "item2"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        t.take_messages();
        t.send(Message::Blur);

        t.send(key(KeyCode::Char('x')));
        t.send(key(KeyCode::Backspace));
        t.send(key(KeyCode::Backspace));
        assert!(!t.component().is_open());
        assert_eq!(t.component().query(), "");
        assert_eq!(chips(t.component()), vec!["item1"]);
        assert!(t.take_messages().is_empty());
    }

    #[test]
    fn backspace_while_closed_opens_and_removes_chip() {
        let mut t = harness(&["item1", "item2"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        t.send(key(KeyCode::Esc));
        t.take_messages();
        assert!(!t.component().is_open());

        t.send(key(KeyCode::Backspace));
        assert!(t.component().is_open());
        assert!(chips(t.component()).is_empty());
        assert_eq!(labels(t.component()), vec!["item1", "item2"]);
        let notes: Vec<String> = t
            .take_messages()
            .into_iter()
            .map(|m| format!("{m:?}"))
            .collect();
        assert_eq!(notes, vec!["Removed(\"item1\")".to_string()]);
    }

    #[test]
    fn delete_at_home_edits_and_refilters() {
        let mut t = harness(&["ab", "b", "cb"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Char('a')));
        t.send(key(KeyCode::Char('b')));
        assert_eq!(labels(t.component()), vec!["ab"]);

        t.send(key(KeyCode::Home));
        t.send(key(KeyCode::Delete));
        assert_eq!(t.component().query(), "b");
        assert_eq!(labels(t.component()), vec!["ab", "b", "cb"]);

        // Delete at the end of the query changes nothing.
        t.send(key(KeyCode::End));
        t.send(key(KeyCode::Delete));
        assert_eq!(t.component().query(), "b");
    }

    #[test]
    fn caret_keys_move_the_insertion_point() {
        let mut t = harness(&["xab", "axb", "abx"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Char('a')));
        t.send(key(KeyCode::Char('b')));

        t.send(key(KeyCode::Left));
        t.send(key(KeyCode::Char('x')));
        assert_eq!(t.component().query(), "axb");
        assert_eq!(labels(t.component()), vec!["axb"]);

        t.send(key(KeyCode::Home));
        t.send(key(KeyCode::Right));
        t.send(key(KeyCode::Delete));
        assert_eq!(t.component().query(), "ab");
        assert_eq!(labels(t.component()), vec!["xab", "abx"]);

        t.send(key(KeyCode::End));
        t.send(key(KeyCode::Char('x')));
        assert_eq!(t.component().query(), "abx");
        assert_eq!(labels(t.component()), vec!["abx"]);
    }

    #[test]
    fn zero_call_delay_means_no_delay() {
        let sb: SuggestBox<Named> = SuggestBox::new().with_call_delay(Duration::ZERO);
        assert_eq!(sb.options().call_delay, None);
        assert_eq!(sb.suggestions.call_delay(), None);

        let mut t = TestComponent::new(
            SuggestBox::new()
                .with_items(named(&["item1"]))
                .with_call_delay(Duration::ZERO),
        );
        t.send(Message::Focus);
        assert_eq!(t.pending_futures(), 0);
        assert_eq!(labels(t.component()), vec!["item1"]);
    }

    #[test]
    fn highlight_clamps_when_results_shrink() {
        let mut t = harness(&["item1", "item2", "item3", "item4"]);
        t.send(Message::Focus);
        for _ in 0..4 {
            t.send(key(KeyCode::Down));
        }
        t.send(Message::Input("item".into()));
        assert_eq!(t.component().cursor_position(), 3);
        t.send(Message::Input("item2".into()));
        assert_eq!(t.component().cursor_position(), 0);
        assert_eq!(current(t.component()).as_deref(), Some("item2"));
        t.send(Message::Input("nothing".into()));
        assert_eq!(t.component().cursor_position(), -1);
    }

    #[test]
    fn cursor_stays_in_bounds_for_any_key_walk() {
        let mut t = harness(&["item1", "item2", "item3", "item4", "item5"]);
        t.send(Message::Focus);
        let queries = ["", "item", "1", "3", "zz", "ITEM"];
        let mut seed: u32 = 0x9e37_79b9;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            match seed % 4 {
                0 => t.send(key(KeyCode::Down)),
                1 => t.send(key(KeyCode::Up)),
                2 => t.send(Message::Input(queries[(seed >> 4) as usize % queries.len()].into())),
                _ => t.send(key(KeyCode::Down)),
            }
            let pos = t.component().cursor_position();
            let len = t.component().results().len() as isize;
            assert!(pos >= -1 && pos < len.max(0), "pos {pos} len {len}");
        }
    }

    #[test]
    fn custom_sync_supplier_replaces_filtering() {
        let mut t = TestComponent::new(
            SuggestBox::<String>::new()
                .with_placeholder("testing placeholder")
                .with_suggestions_fn(|v: &str| vec![format!("{v}a"), format!("{v}b"), format!("{v}c")]),
        );
        t.send(Message::Focus);
        t.send(Message::Input("test".into()));
        let view = t.component().view_state();
        assert_eq!(view.visible_labels(), vec!["testa", "testb", "testc"]);
        assert_eq!(view.indicator, Indicator::ResultCount(3));
    }

    #[test]
    fn panicking_sync_supplier_shows_not_found() {
        let mut t = TestComponent::new(SuggestBox::<String>::new().with_suggestions_fn(
            |v: &str| -> Vec<String> {
                if v == "boom" {
                    panic!("lookup exploded");
                }
                vec![v.to_string()]
            },
        ));
        t.send(Message::Focus);
        t.send(Message::Input("boom".into()));
        assert_eq!(t.component().view_state().indicator, Indicator::NotFound);
    }

    fn echo_async() -> TestComponent<SuggestBox<String>> {
        TestComponent::new(SuggestBox::<String>::new().with_async_suggestions(
            |q: String| async move { Ok::<_, String>(vec![format!("{q}-1"), format!("{q}-2")]) },
        ))
    }

    #[tokio::test]
    async fn later_query_wins_when_earlier_resolves_last() {
        let mut t = echo_async();
        t.send(Message::Focus);
        t.send(Message::Input("a".into()));
        t.send(Message::Input("b".into()));
        // focus (""), "a", "b"
        assert_eq!(t.pending_futures(), 3);

        assert!(t.resolve_at(2).await);
        assert_eq!(t.component().results(), &["b-1".to_string(), "b-2".to_string()]);
        assert!(!t.component().is_loading());

        t.settle().await;
        assert_eq!(t.component().results(), &["b-1".to_string(), "b-2".to_string()]);
        assert!(!t.component().is_loading());
    }

    #[tokio::test]
    async fn stale_completion_does_not_clear_loading() {
        let mut t = echo_async();
        t.send(Message::Focus);
        t.send(Message::Input("a".into()));

        // The focus lookup for "" completes after "a" was issued.
        assert!(t.resolve_at(0).await);
        assert!(t.component().is_loading());
        assert!(t.component().results().is_empty());
        assert!(t.component().view_state().is_present(ids::FETCHING));

        assert!(t.resolve_next().await);
        assert!(!t.component().is_loading());
        assert_eq!(t.component().results()[0], "a-1");
    }

    #[tokio::test]
    async fn repeating_the_same_query_issues_nothing() {
        let mut t = echo_async();
        t.send(Message::Focus);
        t.send(Message::Input("x".into()));
        t.send(Message::Input("x".into()));
        t.send(Message::TriggerClick);
        assert_eq!(t.pending_futures(), 2);
        t.settle().await;

        let before: Vec<String> = t.component().results().to_vec();
        t.send(Message::Input("x".into()));
        assert_eq!(t.pending_futures(), 0);
        assert!(!t.component().is_loading());
        assert_eq!(t.component().results(), before.as_slice());
    }

    #[tokio::test]
    async fn failing_supplier_degrades_to_no_results() {
        let mut t = TestComponent::new(SuggestBox::<String>::new().with_async_suggestions(
            |_q: String| async move { Err::<Vec<String>, _>("service unavailable") },
        ));
        t.send(Message::Focus);
        assert!(t.component().is_loading());
        t.settle().await;
        let view = t.component().view_state();
        assert!(!t.component().is_loading());
        assert!(view.is_present(ids::NOT_FOUND));
        assert!(view.rows.is_empty());
    }

    #[tokio::test]
    async fn completion_after_close_is_discarded() {
        let mut t = echo_async();
        t.send(Message::Focus);
        t.send(Message::Blur);
        t.settle().await;
        assert!(t.component().results().is_empty());
        assert!(!t.component().is_loading());

        t.send(Message::Focus);
        assert!(t.component().is_loading());
        t.settle().await;
        assert_eq!(t.component().results().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn call_delay_applies_to_async_suppliers() {
        let mut t = TestComponent::new(
            SuggestBox::<String>::new()
                .with_async_suggestions(|q: String| async move { Ok::<_, String>(vec![q]) })
                .with_call_delay(Duration::from_millis(300)),
        );
        t.send(Message::Focus);
        t.send(Message::Input("kiwi".into()));
        let start = tokio::time::Instant::now();
        t.settle().await;
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert_eq!(t.component().results(), &["kiwi".to_string()]);
    }

    #[test]
    fn max_visible_limits_the_window() {
        let mut t = TestComponent::new(
            SuggestBox::new()
                .with_items(named(&["a1", "a2", "a3", "a4", "a5"]))
                .with_max_visible(2),
        );
        t.send(Message::Focus);
        assert_eq!(t.component().view_state().visible_labels(), vec!["a1", "a2"]);
        for _ in 0..4 {
            t.send(key(KeyCode::Down));
        }
        assert_eq!(t.component().view_state().visible_labels(), vec!["a3", "a4"]);
    }

    #[test]
    fn with_options_applies_everything() {
        let sb: SuggestBox<Named> = SuggestBox::new().with_options(SuggestBoxOptions {
            placeholder: "pick".into(),
            call_delay: Some(Duration::from_millis(50)),
            max_visible: 3,
        });
        assert_eq!(sb.options().placeholder, "pick");
        assert_eq!(sb.options().max_visible, 3);
        assert_eq!(sb.suggestions.call_delay(), Some(Duration::from_millis(50)));
    }

    #[test]
    fn renders_indicator_rows_and_highlight() {
        let mut t = harness(&["item1", "item2"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Down));
        let screen = t.render_string(30, 4);
        let lines: Vec<&str> = screen.lines().collect();
        assert!(lines[0].ends_with('▴'));
        assert!(lines[1].contains("2 results"));
        assert!(lines[2].contains("▸ item1"));
        assert!(lines[3].contains("  item2"));
    }

    #[test]
    fn renders_chips_and_placeholder() {
        let mut t = harness(&["item1", "item2"]);
        t.send(Message::Focus);
        t.send(key(KeyCode::Down));
        t.send(key(KeyCode::Enter));
        t.send(key(KeyCode::Esc));
        let screen = t.render_string(40, 3);
        let first = screen.lines().next().unwrap_or_default();
        assert!(first.contains(" item1 "));
        assert!(first.contains("testing placeholder"));
        assert!(first.ends_with('▾'));
        assert!(!screen.contains("result"));
    }

    #[test]
    fn renders_not_found() {
        let mut t = harness(&["item1"]);
        t.send(Message::Focus);
        t.send(Message::Input("zzz".into()));
        assert!(t.render_string(30, 3).contains("not found"));
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
    }
}
