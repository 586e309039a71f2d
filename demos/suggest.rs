//! # Suggest Box Demo
//!
//! A fruit picker built on [`SuggestBox`].  Type to filter, Up/Down to move,
//! Enter or Tab to add a chip, Backspace on an empty query to remove the last
//! one, Esc to close the dropdown.  Ctrl+C quits and prints the selection.
//!
//! Run with: `cargo run --example suggest -- --remote --delay 200 --log suggest.log`

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use suggestbox::crossterm::event::{KeyCode, KeyModifiers};
use suggestbox::ratatui::layout::{Constraint, Layout};
use suggestbox::ratatui::style::{Color, Modifier, Style};
use suggestbox::ratatui::text::{Line, Span};
use suggestbox::ratatui::widgets::{Block, Borders, Paragraph};
use suggestbox::ratatui::Frame;
use suggestbox::widgets::suggest_box::{Message, SuggestBox};
use suggestbox::{Command, Component, Model, ProgramOptions, TerminalEvent};
use tracing_subscriber::EnvFilter;

const FRUITS: &[&str] = &[
    "Apple",
    "Apricot",
    "Avocado",
    "Banana",
    "Blackberry",
    "Blueberry",
    "Cherry",
    "Coconut",
    "Cranberry",
    "Date",
    "Fig",
    "Grape",
    "Guava",
    "Kiwi",
    "Lemon",
    "Lime",
    "Mango",
    "Melon",
    "Nectarine",
    "Orange",
    "Papaya",
    "Peach",
    "Pear",
    "Pineapple",
    "Plum",
    "Pomegranate",
    "Raspberry",
    "Strawberry",
    "Tangerine",
    "Watermelon",
];

#[derive(Parser, Debug, Clone)]
#[command(name = "suggest")]
#[command(about = "Searchable multi-select fruit picker")]
struct Args {
    #[arg(long, help = "Delay every lookup by this many milliseconds")]
    delay: Option<u64>,

    #[arg(long, help = "Look fruits up through a simulated remote service")]
    remote: bool,

    #[arg(long, help = "Write tracing output to this file")]
    log: Option<PathBuf>,
}

struct Demo {
    fruit: SuggestBox<String>,
    last_event: String,
}

#[derive(Debug)]
enum Msg {
    Fruit(Message<String>),
    Quit,
}

/// Simulated remote lookup: slow, and every fifth call fails.
async fn remote_lookup(query: String, call: u64) -> Result<Vec<String>, String> {
    tokio::time::sleep(Duration::from_millis(150 + (call % 3) * 200)).await;
    if call % 5 == 4 {
        return Err(format!("fruit service timed out for {query:?}"));
    }
    let query = query.to_lowercase();
    Ok(FRUITS
        .iter()
        .filter(|f| f.to_lowercase().contains(&query))
        .map(|f| f.to_string())
        .collect())
}

fn build_fruit_box(args: &Args) -> SuggestBox<String> {
    let mut fruit = SuggestBox::new().with_placeholder("Search fruits...");
    fruit = if args.remote {
        let calls = Arc::new(AtomicU64::new(0));
        fruit.with_async_suggestions(move |query: String| {
            let call = calls.fetch_add(1, Ordering::Relaxed);
            remote_lookup(query, call)
        })
    } else {
        fruit.with_items(FRUITS.iter().map(|f| f.to_string()).collect())
    };
    if let Some(ms) = args.delay {
        fruit = fruit.with_call_delay(Duration::from_millis(ms));
    }
    fruit
}

impl Model for Demo {
    type Message = Msg;
    type Flags = Args;

    fn init(args: Args) -> (Self, Command<Msg>) {
        let mut fruit = build_fruit_box(&args);
        let cmd = fruit.update(Message::Focus).map(Msg::Fruit);
        (
            Demo {
                fruit,
                last_event: String::new(),
            },
            cmd,
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Fruit(msg) => {
                match &msg {
                    Message::Selected(item) => self.last_event = format!("added {item}"),
                    Message::Removed(item) => self.last_event = format!("removed {item}"),
                    Message::Dismissed => self.last_event = "dropdown dismissed".to_string(),
                    _ => {}
                }
                self.fruit.update(msg).map(Msg::Fruit)
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [title_area, input_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let title = Paragraph::new(Line::from(Span::styled(
            "Fruit Picker",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, title_area);

        let block = Block::default().borders(Borders::ALL).title("Fruits");
        let inner = block.inner(input_area);
        frame.render_widget(block, input_area);
        self.fruit.view(frame, inner);

        let status = Paragraph::new(Line::from(vec![
            Span::raw(format!("{} selected  ", self.fruit.selection().len())),
            Span::styled(&self.last_event, Style::default().fg(Color::Green)),
        ]));
        frame.render_widget(status, status_area);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("Type", Style::default().fg(Color::DarkGray)),
            Span::raw(" to filter  "),
            Span::styled("Up/Down", Style::default().fg(Color::DarkGray)),
            Span::raw(" navigate  "),
            Span::styled("Enter/Tab", Style::default().fg(Color::DarkGray)),
            Span::raw(" add  "),
            Span::styled("Backspace", Style::default().fg(Color::DarkGray)),
            Span::raw(" remove  "),
            Span::styled("Ctrl+C", Style::default().fg(Color::DarkGray)),
            Span::raw(" quit"),
        ]));
        frame.render_widget(help, help_area);
    }

    fn on_event(&self, event: TerminalEvent) -> Option<Msg> {
        match event {
            TerminalEvent::Key(key) => match (key.code, key.modifiers) {
                (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Msg::Quit),
                _ => Some(Msg::Fruit(Message::KeyPress(key))),
            },
            TerminalEvent::FocusGained => Some(Msg::Fruit(Message::Focus)),
            TerminalEvent::FocusLost => Some(Msg::Fruit(Message::Blur)),
            TerminalEvent::Paste(text) => {
                Some(Msg::Fruit(Message::Input(self.fruit.query() + &text)))
            }
            _ => None,
        }
    }
}

/// Send tracing output to `path`; the terminal belongs to the UI.
fn configure_logging(path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = std::fs::File::create(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,suggestbox=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()?;
    tracing::info!(target: "suggestbox::demo", log = %path.display(), "logging started");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    if let Some(path) = &args.log {
        configure_logging(path)?;
    }

    let options = ProgramOptions {
        focus_reporting: true,
        bracketed_paste: true,
        ..ProgramOptions::default()
    };
    let demo = suggestbox::run_with::<Demo>(args, options).await?;

    let chosen: Vec<&str> = demo
        .fruit
        .selection()
        .iter()
        .map(String::as_str)
        .collect();
    println!("Selected: {}", chosen.join(", "));
    Ok(())
}
