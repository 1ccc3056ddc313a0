use iced::widget::{button, column, container, row, text, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{
    bold_text, icon, pill_button_style, skeleton_card, HEADER_HEIGHT, ICON_CHEVRON_LEFT,
    ICON_CHEVRON_RIGHT,
};
use crate::epoch::{Epoch, RequestToken};
use crate::list_query::{clamp_page, page_window, ListQuery, ListRequest, ListTab};
use crate::media::{
    ApiError, Genre, ListPage, LoadingState, MediaKind, Message, BRAND_RED, TEXT_GRAY, TEXT_WHITE,
};
use crate::Movieflix;

/// Filter state and results behind the list route.
#[derive(Debug)]
pub struct ListPageState {
    pub query: ListQuery,
    epoch: Epoch,
    pub results: Option<ListPage>,
    pub loading: LoadingState,
    pub genres: Vec<Genre>,
    genres_kind: Option<MediaKind>,
}

impl Default for ListPageState {
    fn default() -> Self {
        Self {
            query: ListQuery::default(),
            epoch: Epoch::new(),
            results: None,
            loading: LoadingState::Idle,
            genres: Vec::new(),
            genres_kind: None,
        }
    }
}

pub struct ListLoad {
    pub token: RequestToken,
    pub request: ListRequest,
    pub genres_for: Option<MediaKind>,
}

impl ListPageState {
    /// Switches to `query` and hands back the one request that answers it.
    pub fn enter(&mut self, query: ListQuery) -> ListLoad {
        let genres_for = (self.genres_kind != Some(query.kind)).then_some(query.kind);
        if genres_for.is_some() {
            self.genres.clear();
            self.genres_kind = Some(query.kind);
        }
        if self.query.kind != query.kind || self.query.tab != query.tab {
            self.results = None;
        }
        self.query = query;
        self.loading = LoadingState::Loading;
        ListLoad {
            token: self.epoch.issue(),
            request: self.query.resolve(),
            genres_for,
        }
    }

    pub fn finish(&mut self, token: RequestToken, result: Result<ListPage, ApiError>) -> bool {
        if !self.epoch.is_current(token) {
            tracing::debug!(token = token.value(), "discarding stale list response");
            return false;
        }
        match result {
            Ok(page) => {
                self.results = Some(page);
                self.loading = LoadingState::Idle;
            }
            Err(error) => {
                tracing::warn!(query = ?self.query, %error, "list load failed");
                self.results = None;
                self.loading = LoadingState::Error(error.to_string());
            }
        }
        true
    }

    pub fn finish_genres(&mut self, kind: MediaKind, result: Result<Vec<Genre>, ApiError>) {
        if self.genres_kind != Some(kind) {
            return;
        }
        match result {
            Ok(genres) => self.genres = genres,
            Err(error) => {
                tracing::warn!(%kind, %error, "genre list load failed");
                self.genres_kind = None;
            }
        }
    }

    /// Any load in flight hides the previous grid; its page count stays for clamping.
    pub fn shows_placeholder(&self) -> bool {
        matches!(self.loading, LoadingState::Loading)
    }

    pub fn total_pages(&self) -> u32 {
        self.results.as_ref().map_or(1, |page| page.total_pages)
    }

    pub fn page_target(&self, page: u32) -> ListQuery {
        self.query.with_page(clamp_page(page, self.total_pages()))
    }
}

impl Movieflix {
    pub fn view_list_page(&self) -> Element<'_, Message> {
        let query = &self.list.query;
        let title = bold_text(
            match query.kind {
                MediaKind::Movie => "Movies",
                MediaKind::Tv => "TV Shows",
            },
            32,
            TEXT_WHITE,
        );

        let body: Element<Message> = match (&self.list.loading, &self.list.results) {
            (LoadingState::Error(message), _) => {
                let retry = Message::Navigate(crate::route::Route::List(query.clone()));
                self.view_error_state(message, retry)
            }
            _ if self.list.shows_placeholder() => list_skeleton(),
            (_, Some(page)) if page.items.is_empty() => self.view_empty_state("Nothing here yet."),
            (_, Some(page)) => column![
                self.view_card_grid(&page.items, false),
                self.view_pagination()
            ]
            .spacing(40)
            .into(),
            (_, None) => self.view_empty_state("Nothing here yet."),
        };

        column![
            title,
            self.view_list_tabs(),
            self.view_genre_chips(),
            body
        ]
        .spacing(24)
        .padding(
            Padding::new(32.0)
                .top(HEADER_HEIGHT + 32.0)
                .left(48.0)
                .right(48.0),
        )
        .width(Length::Fill)
        .into()
    }

    fn view_list_tabs(&self) -> Element<'_, Message> {
        let active = self.list.query.tab;
        let tabs: Vec<Element<Message>> = ListTab::for_kind(self.list.query.kind)
            .iter()
            .map(|&tab| {
                let is_active = tab == active;
                let label = text(tab.label()).size(15);
                let underline = container(Space::new().width(Length::Fill).height(2)).style(
                    move |_theme| container::Style {
                        background: is_active.then_some(iced::Background::Color(BRAND_RED)),
                        ..Default::default()
                    },
                );
                button(column![label, underline].spacing(6).width(Length::Shrink))
                    .padding(Padding::new(6.0).left(4.0).right(4.0))
                    .style(move |_theme, status| button::Style {
                        background: None,
                        text_color: match status {
                            _ if is_active => TEXT_WHITE,
                            button::Status::Hovered => TEXT_WHITE,
                            _ => TEXT_GRAY,
                        },
                        border: Border::default(),
                        shadow: Shadow::default(),
                        snap: false,
                    })
                    .on_press(Message::SelectListTab(tab))
                    .into()
            })
            .collect();

        Row::with_children(tabs).spacing(24).into()
    }

    fn view_genre_chips(&self) -> Element<'_, Message> {
        if self.list.genres.is_empty() {
            return Space::new().height(0).into();
        }
        let selected = self.list.query.genre;
        let chips: Vec<Element<Message>> = self
            .list
            .genres
            .iter()
            .map(|genre| {
                let is_active = selected == Some(genre.id);
                button(text(&genre.name).size(13))
                    .padding(Padding::new(6.0).left(14.0).right(14.0))
                    .style(pill_button_style(is_active))
                    .on_press(Message::ToggleListGenre(genre.id))
                    .into()
            })
            .collect();

        Row::with_children(chips).spacing(8).wrap().into()
    }

    fn view_pagination(&self) -> Element<'_, Message> {
        let window = page_window(self.list.query.page, self.list.total_pages());
        if window.pages.is_empty() {
            return Space::new().height(0).into();
        }

        let number = |page: u32| -> Element<'_, Message> {
            let is_current = page == window.current;
            button(
                container(text(page.to_string()).size(14))
                    .center_x(Length::Fixed(36.0))
                    .center_y(Length::Fixed(36.0)),
            )
            .padding(0)
            .style(move |_theme, status| button::Style {
                background: Some(iced::Background::Color(match status {
                    _ if is_current => BRAND_RED,
                    button::Status::Hovered => Color::from_rgba(1.0, 1.0, 1.0, 0.2),
                    _ => Color::from_rgba(1.0, 1.0, 1.0, 0.08),
                })),
                text_color: TEXT_WHITE,
                border: Border {
                    radius: 8.0.into(),
                    ..Default::default()
                },
                shadow: Shadow::default(),
                snap: false,
            })
            .on_press_maybe((!is_current).then_some(Message::SelectListPage(page)))
            .into()
        };
        let arrow = |glyph: char, target: u32, enabled: bool| -> Element<'_, Message> {
            button(
                container(icon(glyph).size(12))
                    .center_x(Length::Fixed(36.0))
                    .center_y(Length::Fixed(36.0)),
            )
            .padding(0)
            .style(move |_theme, _status| button::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    1.0, 1.0, 1.0, 0.08,
                ))),
                text_color: if enabled { TEXT_WHITE } else { TEXT_GRAY },
                border: Border {
                    radius: 8.0.into(),
                    ..Default::default()
                },
                shadow: Shadow::default(),
                snap: false,
            })
            .on_press_maybe(enabled.then_some(Message::SelectListPage(target)))
            .into()
        };
        let gap = || text("...").size(14).color(TEXT_GRAY);

        let mut controls = row![arrow(
            ICON_CHEVRON_LEFT,
            window.current.saturating_sub(1),
            window.has_previous()
        )]
        .spacing(6)
        .align_y(iced::Alignment::Center);

        if window.first_shortcut() {
            controls = controls.push(number(1));
            if window.leading_gap() {
                controls = controls.push(gap());
            }
        }
        for &page in &window.pages {
            controls = controls.push(number(page));
        }
        if window.last_shortcut() {
            if window.trailing_gap() {
                controls = controls.push(gap());
            }
            controls = controls.push(number(window.total));
        }
        controls = controls.push(arrow(
            ICON_CHEVRON_RIGHT,
            window.current + 1,
            window.has_next(),
        ));

        container(controls).center_x(Length::Fill).into()
    }
}

fn list_skeleton<'a>() -> Element<'a, Message> {
    let cards: Vec<Element<Message>> = (0..12).map(|_| skeleton_card()).collect();
    Row::with_children(cards)
        .spacing(16)
        .width(Length::Fill)
        .wrap()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ListItem;

    fn page(total_pages: u32) -> ListPage {
        ListPage {
            items: Vec::<ListItem>::new(),
            page: 1,
            total_pages,
            total_results: 0,
        }
    }

    #[test]
    fn entering_a_query_fetches_genres_once_per_kind() {
        let mut state = ListPageState::default();
        let first = state.enter(ListQuery::new(MediaKind::Tv, ListTab::Popular));
        assert_eq!(first.genres_for, Some(MediaKind::Tv));

        let second = state.enter(ListQuery::new(MediaKind::Tv, ListTab::TopRated));
        assert_eq!(second.genres_for, None);

        let third = state.enter(ListQuery::new(MediaKind::Movie, ListTab::Popular));
        assert_eq!(third.genres_for, Some(MediaKind::Movie));
    }

    #[test]
    fn latest_query_wins() {
        let mut state = ListPageState::default();
        let stale = state.enter(ListQuery::default());
        let current = state.enter(ListQuery::default().with_page(2));

        assert!(state.finish(current.token, Ok(page(9))));
        assert!(!state.finish(stale.token, Err(ApiError::Timeout)));
        assert!(matches!(state.loading, LoadingState::Idle));
        assert_eq!(state.total_pages(), 9);
    }

    #[test]
    fn page_targets_are_clamped_to_known_pages() {
        let mut state = ListPageState::default();
        let load = state.enter(ListQuery::default());
        state.finish(load.token, Ok(page(4)));

        assert_eq!(state.page_target(9).page, 4);
        assert_eq!(state.page_target(0).page, 1);
        assert_eq!(state.page_target(3).page, 3);
    }

    #[test]
    fn changing_page_shows_placeholder_until_loaded() {
        let mut state = ListPageState::default();
        let load = state.enter(ListQuery::default());
        state.finish(load.token, Ok(page(4)));
        assert!(!state.shows_placeholder());

        let target = state.page_target(2);
        let next = state.enter(target);
        assert!(state.shows_placeholder());
        assert_eq!(state.page_target(7).page, 4);

        state.finish(next.token, Ok(page(4)));
        assert!(!state.shows_placeholder());
    }

    #[test]
    fn failed_load_surfaces_error() {
        let mut state = ListPageState::default();
        let load = state.enter(ListQuery::default());
        state.finish(load.token, Err(ApiError::Unauthorized));
        assert!(matches!(state.loading, LoadingState::Error(_)));
        assert!(state.results.is_none());
    }
}
