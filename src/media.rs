use std::collections::{HashMap, HashSet};
use std::fmt;

use iced::widget::image::Handle;
use iced::Color;
use serde::Deserialize;

use crate::detail::DetailView;
use crate::epoch::RequestToken;
use crate::list_query::ListTab;
use crate::route::Route;

pub const BACKGROUND_BLACK: Color = Color::from_rgb(0.035, 0.035, 0.043);
pub const SURFACE_DARK_GRAY: Color = Color::from_rgb(0.094, 0.094, 0.106);
pub const SURFACE_LIGHT_GRAY: Color = Color::from_rgb(0.153, 0.153, 0.165);
pub const BRAND_RED: Color = Color::from_rgb(0.863, 0.149, 0.149);
pub const ACCENT_BLUE: Color = Color::from_rgb(0.145, 0.388, 0.922);
pub const RATING_GOLD: Color = Color::from_rgb(0.98, 0.8, 0.082);
pub const TEXT_WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);
pub const TEXT_GRAY: Color = Color::from_rgb(0.631, 0.631, 0.667);
pub const TEXT_DIM: Color = Color::from_rgb(0.443, 0.443, 0.478);

pub type MediaId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaKind {
    #[default]
    Movie,
    Tv,
}

impl MediaKind {
    pub fn path(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Tv),
            _ => None,
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Tv => "TV",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Numeric ids are only unique within one kind, so items are addressed by both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub kind: MediaKind,
    pub id: MediaId,
}

impl MediaKey {
    pub fn new(kind: MediaKind, id: MediaId) -> Self {
        Self { kind, id }
    }

    pub fn movie(id: MediaId) -> Self {
        Self::new(MediaKind::Movie, id)
    }

    pub fn tv(id: MediaId) -> Self {
        Self::new(MediaKind::Tv, id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Normalized display record shared by movies and TV shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub id: MediaId,
    pub kind: MediaKind,
    pub title: String,
    pub date: Option<String>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f32,
    pub genre_ids: Vec<u64>,
}

impl ListItem {
    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.kind, self.id)
    }

    pub fn year(&self) -> Option<&str> {
        self.date.as_deref().and_then(|d| d.get(..4))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieEntry {
    pub id: MediaId,
    pub title: String,
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvEntry {
    pub id: MediaId,
    pub name: String,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

/// One row of a mixed-kind result set, tagged by the provider's `media_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum CatalogEntry {
    Movie(MovieEntry),
    Tv(TvEntry),
    Person,
    #[serde(other)]
    Unknown,
}

impl CatalogEntry {
    /// Projects titles onto the shared display record; people and unknown kinds yield `None`.
    pub fn into_list_item(self) -> Option<ListItem> {
        match self {
            CatalogEntry::Movie(movie) => Some(movie.into()),
            CatalogEntry::Tv(show) => Some(show.into()),
            CatalogEntry::Person | CatalogEntry::Unknown => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<MovieEntry> for ListItem {
    fn from(movie: MovieEntry) -> Self {
        Self {
            id: movie.id,
            kind: MediaKind::Movie,
            title: movie.title,
            date: non_empty(movie.release_date),
            overview: movie.overview,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            vote_average: movie.vote_average,
            genre_ids: movie.genre_ids,
        }
    }
}

impl From<TvEntry> for ListItem {
    fn from(show: TvEntry) -> Self {
        Self {
            id: show.id,
            kind: MediaKind::Tv,
            title: show.name,
            date: non_empty(show.first_air_date),
            overview: show.overview,
            poster_path: show.poster_path,
            backdrop_path: show.backdrop_path,
            vote_average: show.vote_average,
            genre_ids: show.genre_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeasonSummary {
    pub id: u64,
    pub season_number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub episode_count: u32,
    pub air_date: Option<String>,
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub id: MediaId,
    pub kind: MediaKind,
    pub title: String,
    pub date: Option<String>,
    pub overview: String,
    pub tagline: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f32,
    pub vote_count: u32,
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    pub episode_run_time: Vec<u32>,
    pub seasons: Vec<SeasonSummary>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub status: Option<String>,
    pub original_language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Total(u32),
    PerEpisode(u32),
}

impl DetailRecord {
    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.kind, self.id)
    }

    pub fn runtime(&self) -> Option<Runtime> {
        match self.runtime.filter(|&m| m > 0) {
            Some(minutes) => Some(Runtime::Total(minutes)),
            None => self
                .episode_run_time
                .first()
                .copied()
                .map(Runtime::PerEpisode),
        }
    }

    /// Seasons offered as tabs; season 0 holds specials and is never listed.
    pub fn selectable_seasons(&self) -> Vec<&SeasonSummary> {
        self.seasons
            .iter()
            .filter(|s| s.season_number > 0)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub video_type: String,
    pub site: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub episode_number: u32,
    pub season_number: u32,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeasonDetail {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub season_number: u32,
    pub air_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListPage {
    pub items: Vec<ListItem>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Raw multi-search results, people included.
#[derive(Debug, Clone, Default)]
pub struct MultiSearchPage {
    pub entries: Vec<CatalogEntry>,
    pub total_results: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    pub items: Vec<ListItem>,
    pub total_results: u32,
}

#[derive(Debug, Clone)]
pub struct HomeRow {
    pub title: String,
    pub kind: MediaKind,
    pub tab: ListTab,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone)]
pub enum LoadingState {
    Idle,
    Loading,
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    cache: HashMap<String, Handle>,
    pending: HashSet<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&Handle> {
        self.cache.get(url)
    }

    pub fn insert(&mut self, url: String, handle: Handle) {
        self.pending.remove(&url);
        self.cache.insert(url, handle);
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    pub fn mark_pending(&mut self, url: String) {
        self.pending.insert(url);
    }

    pub fn forget_pending(&mut self, url: &str) {
        self.pending.remove(url);
    }

    pub fn needs_fetch(&self, url: &str) -> bool {
        self.get(url).is_none() && !self.is_pending(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("access token rejected")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("rate limited")]
    RateLimit,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Parse(String),
}

/// Which detail surface a load belongs to; each has its own request slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSlot {
    Modal,
    Page,
}

#[derive(Debug, Clone)]
pub enum Message {
    Setup(crate::settings::SetupMessage),
    Navigate(Route),
    NavigateBack,
    NavigateForward,
    MainScrolled(f32),
    HomeLoaded(Result<Vec<HomeRow>, ApiError>),
    RetryHome,
    LoadImage(String),
    ImageLoaded(String, Result<Handle, String>),
    HoverCard(Option<MediaKey>),
    OpenDetail(MediaKey),
    CloseDetail,
    EscapePressed,
    DetailLoaded(DetailSlot, RequestToken, Result<Box<DetailView>, ApiError>),
    SelectSeason(DetailSlot, u32),
    SeasonLoaded(DetailSlot, RequestToken, Result<SeasonDetail, ApiError>),
    OpenTrailer(String),
    TrailerOpened(Result<(), String>),
    ListLoaded(RequestToken, Result<ListPage, ApiError>),
    GenresLoaded(MediaKind, Result<Vec<Genre>, ApiError>),
    SelectListTab(ListTab),
    ToggleListGenre(u64),
    SelectListPage(u32),
    SearchQueryChanged(String),
    SearchDebounceElapsed(RequestToken),
    SearchResultsLoaded(RequestToken, Result<SearchPage, ApiError>),
    ClearSearch,
}

pub fn truncate_description(description: &str, max_chars: usize) -> String {
    if description.chars().count() <= max_chars {
        return description.to_string();
    }
    let truncated: String = description.chars().take(max_chars).collect();
    format!(
        "{}...",
        truncated
            .rfind(' ')
            .map_or(truncated.as_str(), |i| &truncated[..i])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_entries_project_by_media_type() {
        let raw = serde_json::json!([
            {"media_type": "movie", "id": 100, "title": "Heat", "release_date": "1995-12-15",
             "overview": "", "poster_path": "/heat.jpg", "backdrop_path": null,
             "vote_average": 7.9, "genre_ids": [28, 80]},
            {"media_type": "tv", "id": 100, "name": "Dark", "first_air_date": "",
             "poster_path": null, "backdrop_path": null},
            {"media_type": "person", "id": 7, "name": "Al Pacino", "known_for": []}
        ]);
        let entries: Vec<CatalogEntry> = serde_json::from_value(raw).unwrap();
        let items: Vec<ListItem> = entries
            .into_iter()
            .filter_map(CatalogEntry::into_list_item)
            .collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key(), MediaKey::movie(100));
        assert_eq!(items[0].title, "Heat");
        assert_eq!(items[0].year(), Some("1995"));
        assert_eq!(items[1].key(), MediaKey::tv(100));
        assert_eq!(items[1].title, "Dark");
        assert_eq!(items[1].date, None);
        assert_ne!(items[0].key(), items[1].key());
    }

    #[test]
    fn kind_defaults_to_movie() {
        assert_eq!(MediaKind::default(), MediaKind::Movie);
        assert_eq!(MediaKind::parse("tv"), Some(MediaKind::Tv));
        assert_eq!(MediaKind::parse("person"), None);
    }

    #[test]
    fn runtime_prefers_movie_minutes_then_episode_length() {
        let mut record = DetailRecord {
            id: 1,
            kind: MediaKind::Tv,
            title: String::from("Show"),
            date: None,
            overview: String::new(),
            tagline: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: 0.0,
            vote_count: 0,
            genres: Vec::new(),
            runtime: None,
            episode_run_time: vec![42, 50],
            seasons: Vec::new(),
            number_of_seasons: None,
            number_of_episodes: None,
            status: None,
            original_language: None,
        };
        assert_eq!(record.runtime(), Some(Runtime::PerEpisode(42)));

        record.runtime = Some(121);
        assert_eq!(record.runtime(), Some(Runtime::Total(121)));

        record.runtime = None;
        record.episode_run_time.clear();
        assert_eq!(record.runtime(), None);
    }

    #[test]
    fn description_is_cut_on_a_word_boundary() {
        assert_eq!(truncate_description("short", 10), "short");
        assert_eq!(
            truncate_description("a quiet night in the city", 12),
            "a quiet..."
        );
    }
}
