use std::sync::Arc;

use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{bold_text, icon, HEADER_HEIGHT, ICON_SEARCH, ICON_X_LG};
use crate::debounce::SearchDebouncer;
use crate::epoch::{Epoch, RequestToken};
use crate::media::{
    ApiError, CatalogEntry, Message, SearchPage, SURFACE_DARK_GRAY, TEXT_GRAY, TEXT_WHITE,
};
use crate::tmdb::Catalog;
use crate::Movieflix;

/// Runs one multi-type search and keeps only movies and shows.
///
/// A blank query short-circuits to an empty page without touching the catalog.
pub async fn search_titles(
    catalog: Arc<dyn Catalog>,
    query: String,
) -> Result<SearchPage, ApiError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchPage::default());
    }

    let page = catalog.search_multi(query, 1).await?;
    Ok(SearchPage {
        items: page
            .entries
            .into_iter()
            .filter_map(CatalogEntry::into_list_item)
            .collect(),
        total_results: page.total_results,
    })
}

#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    debouncer: SearchDebouncer,
    epoch: Epoch,
    pub results: Option<SearchPage>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_query: String,
}

impl SearchState {
    /// Records a keystroke. Returns the ticket for the quiet-period timer.
    pub fn on_input(&mut self, text: String) -> Option<RequestToken> {
        let token = self.debouncer.input(&text);
        self.input = text;
        if token.is_none() {
            self.epoch.invalidate();
            self.results = None;
            self.loading = false;
            self.error = None;
            self.last_query.clear();
        }
        token
    }

    /// Timer elapsed; hands back the query to send if this ticket is still the latest.
    pub fn on_quiet(&mut self, ticket: RequestToken) -> Option<(RequestToken, String)> {
        let query = self.debouncer.fire(ticket)?;
        if query == self.last_query && self.results.is_some() && self.error.is_none() {
            return None;
        }
        self.loading = true;
        self.error = None;
        self.last_query = query.clone();
        Some((self.epoch.issue(), query))
    }

    pub fn apply(&mut self, token: RequestToken, result: Result<SearchPage, ApiError>) -> bool {
        if !self.epoch.is_current(token) {
            tracing::debug!(token = token.value(), "discarding stale search results");
            return false;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                tracing::debug!(query = %self.last_query, total = page.total_results, "search results");
                self.results = Some(page);
            }
            Err(error) => {
                tracing::warn!(query = %self.last_query, %error, "search failed");
                self.results = None;
                self.error = Some(error.to_string());
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.epoch.invalidate();
        self.input.clear();
        self.results = None;
        self.loading = false;
        self.error = None;
        self.last_query.clear();
    }
}

impl Movieflix {
    pub fn view_search_page(&self) -> Element<'_, Message> {
        column![self.view_search_bar(), self.view_search_results()]
            .spacing(32)
            .padding(
                Padding::new(32.0)
                    .top(HEADER_HEIGHT + 32.0)
                    .left(48.0)
                    .right(48.0),
            )
            .width(Length::Fill)
            .into()
    }

    fn view_search_bar(&self) -> Element<'_, Message> {
        let input = text_input("Search movies and TV shows", &self.search.input)
            .on_input(Message::SearchQueryChanged)
            .size(18)
            .padding(Padding::new(12.0).left(8.0))
            .style(|_theme, _status| text_input::Style {
                background: iced::Background::Color(Color::TRANSPARENT),
                border: Border::default(),
                icon: TEXT_GRAY,
                placeholder: TEXT_GRAY,
                value: TEXT_WHITE,
                selection: Color::from_rgba(1.0, 1.0, 1.0, 0.3),
            });

        let clear: Element<Message> = if self.search.input.is_empty() {
            Space::new().width(0).into()
        } else {
            button(icon(ICON_X_LG).size(14))
                .padding(8)
                .style(|_theme, status| button::Style {
                    background: None,
                    text_color: match status {
                        button::Status::Hovered => TEXT_WHITE,
                        _ => TEXT_GRAY,
                    },
                    border: Border::default(),
                    shadow: Shadow::default(),
                    snap: false,
                })
                .on_press(Message::ClearSearch)
                .into()
        };

        container(
            row![
                icon(ICON_SEARCH).size(18).color(TEXT_GRAY),
                input,
                clear
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::new(4.0).left(16.0).right(8.0))
        .width(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
            border: Border {
                radius: 8.0.into(),
                width: 1.0,
                color: Color::from_rgba(1.0, 1.0, 1.0, 0.1),
            },
            ..Default::default()
        })
        .into()
    }

    fn view_search_results(&self) -> Element<'_, Message> {
        let search = &self.search;
        if search.last_query.is_empty() {
            return self.view_empty_state("Start typing to search movies and TV shows.");
        }
        if search.loading && search.results.is_none() {
            return container(text("Searching...").size(16).color(TEXT_GRAY))
                .padding(Padding::new(80.0))
                .center_x(Length::Fill)
                .into();
        }
        if let Some(error) = &search.error {
            let retry = Message::SearchQueryChanged(search.input.clone());
            return self.view_error_state(error, retry);
        }
        let Some(page) = &search.results else {
            return Space::new().height(0).into();
        };
        if page.items.is_empty() {
            return self.view_empty_state("No results found.");
        }

        let count = match page.total_results {
            1 => String::from("1 result"),
            n => format!("{} results", n),
        };
        column![
            row![
                bold_text(format!("Results for \"{}\"", search.last_query), 24, TEXT_WHITE),
                Space::new().width(Length::Fill),
                text(count).size(14).color(TEXT_GRAY)
            ]
            .align_y(iced::Alignment::Center),
            self.view_card_grid(&page.items, true)
        ]
        .spacing(24)
        .into()
    }
}
