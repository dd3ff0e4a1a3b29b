//! Terminal app list panel.
//!
//! Renders the view model to stdout and reads commands from stdin.

pub mod events;
pub mod prompt;

use crate::functions::formatting::{app_row, version_line};
use crate::view_model::{AppFilter, AppListView};
use events::DeckEvent;
use log::debug;
use tokio::sync::broadcast::Receiver;

/// A command typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Filter(AppFilter),
    /// Open the n-th visible app (1-based).
    Open(usize),
    Show,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let head = parts.next()?;

        if let Some(filter) = AppFilter::from_str(head) {
            return Some(Command::Filter(filter));
        }

        Some(match head {
            "open" | "o" => match parts.next().and_then(|n| n.parse().ok()) {
                Some(n) if n > 0 => Command::Open(n),
                _ => Command::Unknown(line.trim().to_string()),
            },
            "list" | "ls" => Command::Show,
            "quit" | "q" | "exit" => Command::Quit,
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Command::Open(n),
                _ => Command::Unknown(line.trim().to_string()),
            },
        })
    }
}

/// Print the header, filter bar and visible apps.
pub fn render(view: &AppListView) {
    println!();
    println!("Apps Manager");
    println!("{}", view.subtitle());

    if view.is_loading() {
        return;
    }

    let filters: Vec<String> = view
        .available_filters()
        .iter()
        .map(|f| {
            if *f == view.filter() {
                format!("[{}]", f.label())
            } else {
                format!(" {} ", f.label())
            }
        })
        .collect();
    println!("{}", filters.join(" "));

    let apps = view.visible_apps();
    if apps.is_empty() {
        println!("  {}", view.empty_text());
        return;
    }

    for (i, app) in apps.iter().enumerate() {
        println!("{}", app_row(i + 1, app));
        println!("       {}", version_line(app));
    }
}

/// Print pending events from the view model.
pub fn print_events(rx: &mut Receiver<DeckEvent>) {
    for event in events::drain(rx) {
        match event {
            DeckEvent::Notice(notice) => println!("\n!! {}: {}", notice.title, notice.message),
            DeckEvent::InventoryLoaded(counts) => debug!("Inventory loaded: {} apps", counts.total),
            DeckEvent::FilterChanged(filter) => debug!("Filter changed to {}", filter),
        }
    }
}

pub fn print_help() {
    println!("Commands: all | personal | work | open <n> | list | quit");
}
