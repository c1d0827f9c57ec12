use iced::widget::{column, container, text, Column};
use iced::{Element, Length, Task, Theme};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod services;
mod state;
mod ui;

use services::DesktopServices;
use state::{Effect, Message, Screen};

/// Main application state
struct PlaceReporter {
    /// Form, list and flags
    screen: Screen,
    /// Collaborators, shared with background tasks
    services: Arc<DesktopServices>,
}

impl PlaceReporter {
    /// Create the application and kick off the initial list fetch
    fn new(services: Arc<DesktopServices>, screen: Screen) -> (Self, Task<Message>) {
        let mut app = PlaceReporter { screen, services };
        let effect = app.screen.initialize();
        let task = app.perform(effect);
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let effect = self.screen.update(message);
        self.perform(effect)
    }

    /// Run a collaborator call in the background; its outcome comes back as a message
    fn perform(&self, effect: Option<Effect>) -> Task<Message> {
        match effect {
            Some(effect) => {
                let services = Arc::clone(&self.services);
                Task::perform(async move { services.run(effect).await }, std::convert::identity)
            }
            None => Task::none(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let content: Column<Message> = column![
            text("Place Reporter").size(32),
            ui::form::view(&self.screen),
            ui::list::view(&self.screen),
        ]
        .spacing(20)
        .padding(24);

        let base: Element<Message> = container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into();

        match self.screen.alert() {
            Some(alert) => ui::alert::overlay(base, alert),
            None => base,
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    let config = config::load();
    let services = match DesktopServices::from_config(&config) {
        Ok(services) => Arc::new(services),
        Err(err) => {
            tracing::error!(error = %err, "cannot start");
            std::process::exit(1);
        }
    };
    let screen = Screen::new(config.camera.capture_options());
    tracing::info!(api = %config.api.base_url, "place reporter starting");

    iced::application("Place Reporter", PlaceReporter::update, PlaceReporter::view)
        .theme(PlaceReporter::theme)
        .centered()
        .run_with(move || PlaceReporter::new(services, screen))
}
