use iced::Task;

use crate::detail::{fetch_detail_view, fetch_season, DetailLoader, DetailView, SeasonRequest, SeasonState};
use crate::epoch::RequestToken;
use crate::media::{ApiError, DetailSlot, MediaKey, Message, SeasonDetail};
use crate::video::open_trailer;
use crate::Movieflix;

fn loader_mut(app: &mut Movieflix, slot: DetailSlot) -> &mut DetailLoader {
    match slot {
        DetailSlot::Modal => &mut app.modal,
        DetailSlot::Page => &mut app.page_detail,
    }
}

fn loader(app: &Movieflix, slot: DetailSlot) -> &DetailLoader {
    match slot {
        DetailSlot::Modal => &app.modal,
        DetailSlot::Page => &app.page_detail,
    }
}

fn season_task(app: &Movieflix, slot: DetailSlot, request: SeasonRequest) -> Task<Message> {
    let Some(catalog) = app.catalog.clone() else {
        return Task::none();
    };
    Task::perform(
        fetch_season(catalog, request.id, request.season),
        move |result| Message::SeasonLoaded(slot, request.token, result),
    )
}

pub fn handle_open_detail(app: &mut Movieflix, key: MediaKey) -> Task<Message> {
    let Some(catalog) = app.catalog.clone() else {
        return Task::none();
    };
    app.hovered_card = None;
    app.selection.open(key.id, key.kind);
    let request = app.modal.begin(key);

    Task::perform(fetch_detail_view(catalog, request.key), move |result| {
        Message::DetailLoaded(DetailSlot::Modal, request.token, result.map(Box::new))
    })
}

/// Closes the modal and drops whatever it still had in flight.
pub fn dismiss_modal(app: &mut Movieflix) {
    app.selection.close();
    app.modal.reset();
}

pub fn handle_close_detail(app: &mut Movieflix) -> Task<Message> {
    dismiss_modal(app);
    Task::none()
}

pub fn handle_escape(app: &mut Movieflix) -> Task<Message> {
    if app.selection.current().is_open() {
        dismiss_modal(app);
    }
    Task::none()
}

pub fn handle_detail_loaded(
    app: &mut Movieflix,
    slot: DetailSlot,
    token: RequestToken,
    result: Result<Box<DetailView>, ApiError>,
) -> Task<Message> {
    let cascade = loader_mut(app, slot).finish(token, result.map(|view| *view));

    let images = match loader(app, slot).view() {
        Some(view) => app.load_detail_images(view),
        None => Task::none(),
    };
    match cascade {
        Some(request) => Task::batch([images, season_task(app, slot, request)]),
        None => images,
    }
}

pub fn handle_select_season(app: &mut Movieflix, slot: DetailSlot, season: u32) -> Task<Message> {
    match loader_mut(app, slot).select_season(season) {
        Some(request) => season_task(app, slot, request),
        None => Task::none(),
    }
}

pub fn handle_season_loaded(
    app: &mut Movieflix,
    slot: DetailSlot,
    token: RequestToken,
    result: Result<SeasonDetail, ApiError>,
) -> Task<Message> {
    if !loader_mut(app, slot).finish_season(token, result) {
        return Task::none();
    }
    match loader(app, slot).season_state() {
        SeasonState::Loaded(season) => app.load_episode_images(season),
        _ => Task::none(),
    }
}

pub fn handle_open_trailer(key: String) -> Task<Message> {
    Task::perform(open_trailer(key), Message::TrailerOpened)
}

pub fn handle_trailer_opened(result: Result<(), String>) -> Task<Message> {
    if let Err(error) = result {
        tracing::warn!(%error, "could not open trailer");
    }
    Task::none()
}
