//! Pure projection of suggest box state into what is displayed.
//!
//! Nothing here is stored: [`ViewState`] is rebuilt from the component on
//! demand, so the indicators can never drift out of sync with the state they
//! describe.  Rendering reads a `ViewState`, and so do tests.

/// Stable identifiers for the observable regions of the widget.
pub mod ids {
    pub const ROOT: &str = "suggest-box";
    pub const TRIGGER: &str = "trigger-button";
    pub const DROP_DOWN: &str = "drop-down";
    pub const RESULT_COUNT: &str = "result-count";
    pub const NOT_FOUND: &str = "not-found-msg";
    pub const FETCHING: &str = "fetching-msg";
    pub const SELECTION: &str = "selection";
}

/// The status line at the top of the dropdown.  At most one is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Nothing to say yet: no lookup has completed in this open cycle.
    Hidden,
    /// A lookup is outstanding.
    Fetching,
    /// The result set has this many items.
    ResultCount(usize),
    /// The last lookup came back empty.
    NotFound,
}

impl Indicator {
    /// Derive the indicator from the lookup state.
    pub fn derive(loading: bool, searched: bool, count: usize) -> Self {
        match (loading, count) {
            (true, _) => Indicator::Fetching,
            (false, 0) if searched => Indicator::NotFound,
            (false, 0) => Indicator::Hidden,
            (false, n) => Indicator::ResultCount(n),
        }
    }

    /// The region identifier this indicator occupies, if any.
    pub fn id(self) -> Option<&'static str> {
        match self {
            Indicator::Hidden => None,
            Indicator::Fetching => Some(ids::FETCHING),
            Indicator::ResultCount(_) => Some(ids::RESULT_COUNT),
            Indicator::NotFound => Some(ids::NOT_FOUND),
        }
    }

    /// Text shown for the indicator.
    pub fn text(self) -> Option<String> {
        match self {
            Indicator::Hidden => None,
            Indicator::Fetching => Some("fetching...".to_string()),
            Indicator::ResultCount(1) => Some("1 result".to_string()),
            Indicator::ResultCount(n) => Some(format!("{n} results")),
            Indicator::NotFound => Some("not found".to_string()),
        }
    }
}

/// One dropdown row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    /// Position within the full result set.
    pub index: usize,
    pub label: &'a str,
    /// Whether this row is highlighted.
    pub current: bool,
}

/// Everything the widget displays, derived from its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<'a> {
    /// Whether the dropdown is shown.
    pub open: bool,
    pub indicator: Indicator,
    /// All result rows, in result order.
    pub rows: Vec<Row<'a>>,
    /// Range of `rows` inside the scroll window.
    pub window: std::ops::Range<usize>,
    /// Selection chip labels, in selection order.
    pub chips: Vec<&'a str>,
    pub query: String,
    /// Placeholder text, present only while the query is empty.
    pub placeholder: Option<&'a str>,
}

impl<'a> ViewState<'a> {
    /// Whether the region with the given [`ids`] identifier is displayed.
    ///
    /// The root, trigger and selection regions always exist; the dropdown
    /// exists only while open, and the indicator regions only inside it.
    pub fn is_present(&self, id: &str) -> bool {
        match id {
            ids::ROOT | ids::TRIGGER | ids::SELECTION => true,
            ids::DROP_DOWN => self.open,
            _ => self.open && self.indicator.id() == Some(id),
        }
    }

    /// The highlighted row, if any.
    pub fn current(&self) -> Option<&Row<'a>> {
        self.rows.iter().find(|row| row.current)
    }

    /// Labels of the rows inside the scroll window.
    pub fn visible_labels(&self) -> Vec<&'a str> {
        self.rows[self.window.clone()]
            .iter()
            .map(|row| row.label)
            .collect()
    }
}
