//! ProfileDeck - personal and work profile app inventory for Android devices
//!
//! Lists the apps installed in both profiles of a connected device and
//! launches them in the profile they belong to.

mod config;
mod event_bus;
mod functions;
mod panels;
mod services;
mod view_model;

use config::DeckConfig;
use deck_launch::{DispatchOutcome, LaunchTarget, StoreChannel};
use log::{info, warn};
use panels::app_list::prompt::{TerminalPrompt, read_line};
use panels::app_list::{self, Command};
use view_model::{AppListView, Notice};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting ProfileDeck...");

    let config = match DeckConfig::default_path() {
        Some(path) if path.exists() => DeckConfig::load(&path),
        Some(path) => {
            let config = DeckConfig::default();
            match config.save(&path) {
                Ok(()) => info!("Wrote default config to {}", path.display()),
                Err(e) => warn!("Could not write default config: {}", e),
            }
            config
        }
        None => DeckConfig::default(),
    }
    .with_env_overrides();

    let mut rx = app_list::events::subscribe();
    let services = services::start_all(&config).await;

    let mut view = AppListView::new();
    app_list::render(&view);
    view.activate(&services.acquirer).await;

    app_list::print_events(&mut rx);
    app_list::render(&view);
    app_list::print_help();

    let prompt = TerminalPrompt;

    while let Some(line) = read_line("> ").await {
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Filter(filter) => {
                view.set_filter(filter);
                app_list::render(&view);
            }
            Command::Open(n) => {
                let Some(app) = view.visible_apps().into_iter().nth(n - 1) else {
                    println!("No app #{} in this list", n);
                    continue;
                };
                let target =
                    LaunchTarget::new(app.package_id, app.display_name, app.is_work_profile);

                let outcome = services.dispatcher.dispatch(&target, &prompt).await;
                match &outcome {
                    DispatchOutcome::Launched => println!("Opened {}", target.display_name),
                    DispatchOutcome::StoreOpened(StoreChannel::DeepLink) => {
                        println!("Opened store listing for {}", target.package_id)
                    }
                    DispatchOutcome::StoreOpened(StoreChannel::Web) => {
                        println!("Opened web store listing for {}", target.package_id)
                    }
                    _ => {}
                }
                if let Some((title, message)) = outcome.notice(&target) {
                    app_list::events::send_notice(Notice::new(title, message));
                }
            }
            Command::Show => app_list::render(&view),
            Command::Quit => break,
            Command::Unknown(input) => {
                println!("Unknown command: {}", input);
                app_list::print_help();
            }
        }

        app_list::print_events(&mut rx);
    }

    info!("ProfileDeck exiting.");
}
