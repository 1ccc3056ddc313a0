mod cards;
mod components;
mod debounce;
mod detail;
mod detail_handlers;
mod detail_page;
mod detail_popup;
mod detail_sections;
mod epoch;
mod handlers;
mod hero;
mod list_page;
mod list_query;
mod media;
mod route;
mod search;
mod selection;
mod settings;
#[cfg(test)]
mod testing;
mod tmdb;
mod video;

use std::sync::Arc;

use iced::event::{self, Event};
use iced::keyboard::{self, key::Named, Key};
use iced::widget::container;
use iced::{Element, Font, Length, Size, Subscription, Task, Theme};
use tracing_subscriber::EnvFilter;

use detail::DetailLoader;
use list_page::ListPageState;
use media::{HomeRow, ImageCache, LoadingState, MediaKey, Message, BACKGROUND_BLACK};
use route::{History, Route};
use search::SearchState;
use selection::SelectionStore;
use settings::{AppSettings, SetupPage};
use tmdb::{load_home_rows, Catalog, TmdbClient};

pub struct Movieflix {
    pub setup_page: Option<SetupPage>,
    pub catalog: Option<Arc<dyn Catalog>>,
    pub history: History,
    pub home_rows: Vec<HomeRow>,
    pub home_state: LoadingState,
    pub list: ListPageState,
    pub search: SearchState,
    pub selection: SelectionStore,
    pub modal: DetailLoader,
    pub page_detail: DetailLoader,
    pub image_cache: ImageCache,
    pub hovered_card: Option<MediaKey>,
    pub main_scroll_offset: f32,
}

impl Default for Movieflix {
    fn default() -> Self {
        Self {
            setup_page: None,
            catalog: None,
            history: History::default(),
            home_rows: Vec::new(),
            home_state: LoadingState::Loading,
            list: ListPageState::default(),
            search: SearchState::default(),
            selection: SelectionStore::default(),
            modal: DetailLoader::new(),
            page_detail: DetailLoader::new(),
            image_cache: ImageCache::new(),
            hovered_card: None,
            main_scroll_offset: 0.0,
        }
    }
}

impl Movieflix {
    fn new() -> (Self, Task<Message>) {
        let settings = AppSettings::load().unwrap_or_else(|error| {
            tracing::warn!(%error, "could not read settings, using defaults");
            AppSettings::default()
        });

        if !settings.is_valid() {
            tracing::info!("no access token configured, showing setup");
            return (
                Self {
                    setup_page: Some(SetupPage::new(settings)),
                    ..Default::default()
                },
                Task::none(),
            );
        }

        let mut app = Self::default();
        let mut tasks = vec![app.initialize_with_settings(settings)];
        if let Some(route) = std::env::args().nth(1).and_then(|arg| Route::parse(&arg)) {
            tracing::info!(location = %route.to_location(), "opening start location");
            tasks.push(handlers::handle_navigate(&mut app, route));
        }
        (app, Task::batch(tasks))
    }

    fn initialize_with_settings(&mut self, settings: AppSettings) -> Task<Message> {
        let client = match TmdbClient::from_settings(&settings) {
            Ok(client) => client,
            Err(error) => {
                tracing::warn!(%error, "could not build the TMDB client");
                let mut setup = SetupPage::new(settings);
                setup.error = Some(error.to_string());
                self.setup_page = Some(setup);
                return Task::none();
            }
        };
        tracing::info!(base_url = %settings.base_url, language = %settings.language, "catalog ready");

        let catalog: Arc<dyn Catalog> = Arc::new(client);
        self.catalog = Some(Arc::clone(&catalog));
        self.setup_page = None;
        self.home_state = LoadingState::Loading;

        Task::perform(load_home_rows(catalog), Message::HomeLoaded)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        if let Message::Setup(setup_msg) = message {
            if let Some(ref mut setup) = self.setup_page {
                if let Some(settings) = setup.update(setup_msg) {
                    return self.initialize_with_settings(settings);
                }
            }
            return Task::none();
        }
        handlers::handle_message(self, message)
    }

    fn view(&self) -> Element<'_, Message> {
        if let Some(ref setup) = self.setup_page {
            return setup.view().map(Message::Setup);
        }

        let main_content = container(self.view_main_content())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(BACKGROUND_BLACK)),
                ..Default::default()
            });

        if self.selection.current().is_open() {
            return iced::widget::stack![
                main_content,
                iced::widget::opaque(self.view_detail_modal())
            ]
            .width(Length::Fill)
            .height(Length::Fill)
            .into();
        }

        main_content.into()
    }

    fn title(&self) -> String {
        format!("Movieflix - {}", self.history.current().title())
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.selection.current().is_open() {
            event::listen_with(modal_key_handler)
        } else {
            Subscription::none()
        }
    }
}

fn modal_key_handler(
    event: Event,
    _status: event::Status,
    _window: iced::window::Id,
) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: Key::Named(Named::Escape),
            ..
        }) => Some(Message::EscapePressed),
        _ => None,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wgpu_core=warn,iced_wgpu=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    iced::application(Movieflix::new, Movieflix::update, Movieflix::view)
        .title(Movieflix::title)
        .theme(Movieflix::theme)
        .window_size(Size::new(1280.0, 800.0))
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .default_font(Font::DEFAULT)
        .subscription(Movieflix::subscription)
        .run()
}
