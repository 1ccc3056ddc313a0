use std::sync::Arc;

use iced::Task;

use crate::components::MAIN_SCROLL_ID;
use crate::debounce::quiet_period;
use crate::detail::fetch_detail_view;
use crate::detail_handlers;
use crate::epoch::RequestToken;
use crate::list_page::ListLoad;
use crate::list_query::{ListQuery, ListTab};
use crate::media::{
    ApiError, DetailSlot, Genre, HomeRow, ListPage, LoadingState, MediaKind, Message, SearchPage,
};
use crate::route::Route;
use crate::search::search_titles;
use crate::tmdb::{fetch_image_bytes, load_home_rows, Catalog};
use crate::Movieflix;

pub fn handle_message(app: &mut Movieflix, message: Message) -> Task<Message> {
    match message {
        Message::Setup(_) => Task::none(),
        Message::Navigate(route) => handle_navigate(app, route),
        Message::NavigateBack => handle_history_step(app, false),
        Message::NavigateForward => handle_history_step(app, true),
        Message::MainScrolled(offset) => handle_main_scrolled(app, offset),
        Message::HomeLoaded(result) => handle_home_loaded(app, result),
        Message::RetryHome => handle_retry_home(app),
        Message::LoadImage(url) => handle_load_image(app, url),
        Message::ImageLoaded(url, result) => handle_image_loaded(app, url, result),
        Message::HoverCard(key) => {
            app.hovered_card = key;
            Task::none()
        }
        Message::OpenDetail(key) => detail_handlers::handle_open_detail(app, key),
        Message::CloseDetail => detail_handlers::handle_close_detail(app),
        Message::EscapePressed => detail_handlers::handle_escape(app),
        Message::DetailLoaded(slot, token, result) => {
            detail_handlers::handle_detail_loaded(app, slot, token, result)
        }
        Message::SelectSeason(slot, season) => {
            detail_handlers::handle_select_season(app, slot, season)
        }
        Message::SeasonLoaded(slot, token, result) => {
            detail_handlers::handle_season_loaded(app, slot, token, result)
        }
        Message::OpenTrailer(key) => detail_handlers::handle_open_trailer(key),
        Message::TrailerOpened(result) => detail_handlers::handle_trailer_opened(result),
        Message::ListLoaded(token, result) => handle_list_loaded(app, token, result),
        Message::GenresLoaded(kind, result) => handle_genres_loaded(app, kind, result),
        Message::SelectListTab(tab) => handle_select_list_tab(app, tab),
        Message::ToggleListGenre(genre_id) => {
            let query = app.list.query.toggle_genre(genre_id);
            handle_navigate(app, Route::List(query))
        }
        Message::SelectListPage(page) => {
            let query = app.list.page_target(page);
            handle_navigate(app, Route::List(query))
        }
        Message::SearchQueryChanged(text) => handle_search_query_changed(app, text),
        Message::SearchDebounceElapsed(ticket) => handle_search_debounce_elapsed(app, ticket),
        Message::SearchResultsLoaded(token, result) => handle_search_results(app, token, result),
        Message::ClearSearch => handle_clear_search(app),
    }
}

fn catalog(app: &Movieflix) -> Option<Arc<dyn Catalog>> {
    app.catalog.clone()
}

fn scroll_to_top() -> Task<Message> {
    iced::widget::operation::scroll_to(
        iced::widget::Id::new(MAIN_SCROLL_ID),
        iced::widget::scrollable::AbsoluteOffset { x: 0.0, y: 0.0 },
    )
}

pub fn handle_navigate(app: &mut Movieflix, route: Route) -> Task<Message> {
    detail_handlers::dismiss_modal(app);
    if app.history.push(route.clone()) {
        tracing::info!(location = %route.to_location(), "navigate");
    }
    Task::batch([enter_route(app, route), scroll_to_top()])
}

fn handle_history_step(app: &mut Movieflix, forward: bool) -> Task<Message> {
    let step = if forward {
        app.history.forward()
    } else {
        app.history.back()
    };
    let Some(route) = step.cloned() else {
        return Task::none();
    };
    detail_handlers::dismiss_modal(app);
    tracing::info!(location = %route.to_location(), forward, "history step");
    Task::batch([enter_route(app, route), scroll_to_top()])
}

/// Starts whatever loads the route needs. History is already positioned on it.
fn enter_route(app: &mut Movieflix, route: Route) -> Task<Message> {
    app.hovered_card = None;
    match route {
        Route::Home => match app.home_state {
            LoadingState::Error(_) => handle_retry_home(app),
            _ => Task::none(),
        },
        Route::List(query) => enter_list(app, query),
        Route::Search { query } => {
            let Some(ticket) = app.search.on_input(query) else {
                return Task::none();
            };
            Task::perform(quiet_period(ticket), Message::SearchDebounceElapsed)
        }
        Route::Detail(key) => {
            let Some(catalog) = catalog(app) else {
                return Task::none();
            };
            let request = app.page_detail.begin(key);
            Task::perform(fetch_detail_view(catalog, request.key), move |result| {
                Message::DetailLoaded(DetailSlot::Page, request.token, result.map(Box::new))
            })
        }
    }
}

fn enter_list(app: &mut Movieflix, query: ListQuery) -> Task<Message> {
    let Some(catalog) = catalog(app) else {
        return Task::none();
    };
    let ListLoad {
        token,
        request,
        genres_for,
    } = app.list.enter(query);

    let list_catalog = Arc::clone(&catalog);
    let mut tasks = vec![Task::perform(
        async move { request.execute(list_catalog.as_ref()).await },
        move |result| Message::ListLoaded(token, result),
    )];

    if let Some(kind) = genres_for {
        tasks.push(Task::perform(
            async move { catalog.list_genres(kind).await },
            move |result| Message::GenresLoaded(kind, result),
        ));
    }
    Task::batch(tasks)
}

fn handle_select_list_tab(app: &mut Movieflix, tab: ListTab) -> Task<Message> {
    let query = app.list.query.with_tab(tab);
    handle_navigate(app, Route::List(query))
}

fn handle_list_loaded(
    app: &mut Movieflix,
    token: RequestToken,
    result: Result<ListPage, ApiError>,
) -> Task<Message> {
    if !app.list.finish(token, result) {
        return Task::none();
    }
    match &app.list.results {
        Some(page) => app.load_poster_images(&page.items),
        None => Task::none(),
    }
}

fn handle_genres_loaded(
    app: &mut Movieflix,
    kind: MediaKind,
    result: Result<Vec<Genre>, ApiError>,
) -> Task<Message> {
    app.list.finish_genres(kind, result);
    Task::none()
}

fn handle_main_scrolled(app: &mut Movieflix, offset: f32) -> Task<Message> {
    if app.selection.is_scroll_locked() {
        return Task::none();
    }
    app.main_scroll_offset = offset;
    Task::none()
}

fn handle_home_loaded(
    app: &mut Movieflix,
    result: Result<Vec<HomeRow>, ApiError>,
) -> Task<Message> {
    match result {
        Ok(rows) => {
            tracing::info!(rows = rows.len(), "home loaded");
            app.home_rows = rows;
            app.home_state = LoadingState::Idle;
            app.load_home_images()
        }
        Err(error) => {
            tracing::warn!(%error, "home load failed");
            app.home_state = LoadingState::Error(error.to_string());
            Task::none()
        }
    }
}

pub fn handle_retry_home(app: &mut Movieflix) -> Task<Message> {
    let Some(catalog) = catalog(app) else {
        return Task::none();
    };
    app.home_state = LoadingState::Loading;
    Task::perform(load_home_rows(catalog), Message::HomeLoaded)
}

fn handle_load_image(app: &mut Movieflix, url: String) -> Task<Message> {
    if !app.image_cache.needs_fetch(&url) {
        return Task::none();
    }
    app.image_cache.mark_pending(url.clone());
    let image_url = url.clone();

    Task::perform(
        async move { fetch_image_bytes(image_url).await },
        move |result| match result {
            Ok(bytes) => {
                Message::ImageLoaded(url, Ok(iced::widget::image::Handle::from_bytes(bytes)))
            }
            Err(error) => Message::ImageLoaded(url, Err(error)),
        },
    )
}

fn handle_image_loaded(
    app: &mut Movieflix,
    url: String,
    result: Result<iced::widget::image::Handle, String>,
) -> Task<Message> {
    match result {
        Ok(handle) => app.image_cache.insert(url, handle),
        Err(error) => {
            tracing::debug!(%url, %error, "image fetch failed");
            app.image_cache.forget_pending(&url);
        }
    }
    Task::none()
}

fn handle_search_query_changed(app: &mut Movieflix, text: String) -> Task<Message> {
    app.history.replace(Route::Search {
        query: text.clone(),
    });
    match app.search.on_input(text) {
        Some(ticket) => Task::perform(quiet_period(ticket), Message::SearchDebounceElapsed),
        None => Task::none(),
    }
}

fn handle_search_debounce_elapsed(app: &mut Movieflix, ticket: RequestToken) -> Task<Message> {
    let Some(catalog) = catalog(app) else {
        return Task::none();
    };
    let Some((token, query)) = app.search.on_quiet(ticket) else {
        return Task::none();
    };
    tracing::debug!(%query, "search");
    Task::perform(search_titles(catalog, query), move |result| {
        Message::SearchResultsLoaded(token, result)
    })
}

fn handle_search_results(
    app: &mut Movieflix,
    token: RequestToken,
    result: Result<SearchPage, ApiError>,
) -> Task<Message> {
    if !app.search.apply(token, result) {
        return Task::none();
    }
    match &app.search.results {
        Some(page) => app.load_poster_images(&page.items),
        None => Task::none(),
    }
}

fn handle_clear_search(app: &mut Movieflix) -> Task<Message> {
    app.search.clear();
    app.history.replace(Route::Search {
        query: String::new(),
    });
    Task::none()
}
