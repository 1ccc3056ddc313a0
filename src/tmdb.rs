use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::list_query::ListTab;
use crate::media::{
    ApiError, CastMember, CatalogEntry, DetailRecord, Genre, HomeRow, ListItem, ListPage,
    MediaId, MediaKind, MovieEntry, MultiSearchPage, SeasonDetail, SeasonSummary, TvEntry, Video,
};
use crate::settings::AppSettings;

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const VIDEO_EMBED_BASE_URL: &str = "https://www.youtube.com/embed";

/// Read side of the metadata provider.
///
/// Every operation is a single request; failures surface as [`ApiError`]
/// and are never retried here.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_by_category(
        &self,
        kind: MediaKind,
        category: &str,
        page: u32,
    ) -> Result<ListPage, ApiError>;

    async fn list_by_genre(
        &self,
        kind: MediaKind,
        genre_id: u64,
        page: u32,
        sort_by: &str,
    ) -> Result<ListPage, ApiError>;

    async fn list_genres(&self, kind: MediaKind) -> Result<Vec<Genre>, ApiError>;

    async fn detail(&self, kind: MediaKind, id: MediaId) -> Result<DetailRecord, ApiError>;

    async fn credits(&self, kind: MediaKind, id: MediaId) -> Result<Vec<CastMember>, ApiError>;

    async fn videos(&self, kind: MediaKind, id: MediaId) -> Result<Vec<Video>, ApiError>;

    async fn recommendations(
        &self,
        kind: MediaKind,
        id: MediaId,
    ) -> Result<Vec<ListItem>, ApiError>;

    async fn season_detail(&self, id: MediaId, season: u32) -> Result<SeasonDetail, ApiError>;

    async fn search_multi(&self, query: &str, page: u32) -> Result<MultiSearchPage, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Profile,
    Still,
    Poster,
    Backdrop,
}

impl ImageSize {
    fn preset(self) -> &'static str {
        match self {
            ImageSize::Profile => "w185",
            ImageSize::Still => "w300",
            ImageSize::Poster => "w500",
            ImageSize::Backdrop => "original",
        }
    }
}

pub fn image_url(path: &str, size: ImageSize) -> String {
    format!("{}/{}{}", IMAGE_BASE_URL, size.preset(), path)
}

pub fn video_embed_url(key: &str) -> String {
    format!("{}/{}", VIDEO_EMBED_BASE_URL, key)
}

pub async fn fetch_image_bytes(url: String) -> Result<Vec<u8>, String> {
    reqwest::get(&url)
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| e.to_string())
}

#[derive(Debug, Deserialize)]
struct PagedResponse<T> {
    #[serde(default = "first_page")]
    page: u32,
    results: Vec<T>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct MovieDetailPayload {
    id: MediaId,
    title: String,
    release_date: Option<String>,
    #[serde(default)]
    overview: String,
    tagline: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    vote_count: u32,
    genres: Vec<Genre>,
    runtime: Option<u32>,
    status: Option<String>,
    original_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TvDetailPayload {
    id: MediaId,
    name: String,
    first_air_date: Option<String>,
    #[serde(default)]
    overview: String,
    tagline: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    vote_count: u32,
    genres: Vec<Genre>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    #[serde(default)]
    seasons: Vec<SeasonSummary>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    status: Option<String>,
    original_language: Option<String>,
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<MovieDetailPayload> for DetailRecord {
    fn from(p: MovieDetailPayload) -> Self {
        Self {
            id: p.id,
            kind: MediaKind::Movie,
            title: p.title,
            date: filled(p.release_date),
            overview: p.overview,
            tagline: filled(p.tagline),
            poster_path: p.poster_path,
            backdrop_path: p.backdrop_path,
            vote_average: p.vote_average,
            vote_count: p.vote_count,
            genres: p.genres,
            runtime: p.runtime,
            episode_run_time: Vec::new(),
            seasons: Vec::new(),
            number_of_seasons: None,
            number_of_episodes: None,
            status: p.status,
            original_language: p.original_language,
        }
    }
}

impl From<TvDetailPayload> for DetailRecord {
    fn from(p: TvDetailPayload) -> Self {
        Self {
            id: p.id,
            kind: MediaKind::Tv,
            title: p.name,
            date: filled(p.first_air_date),
            overview: p.overview,
            tagline: filled(p.tagline),
            poster_path: p.poster_path,
            backdrop_path: p.backdrop_path,
            vote_average: p.vote_average,
            vote_count: p.vote_count,
            genres: p.genres,
            runtime: None,
            episode_run_time: p.episode_run_time,
            seasons: p.seasons,
            number_of_seasons: p.number_of_seasons,
            number_of_episodes: p.number_of_episodes,
            status: p.status,
            original_language: p.original_language,
        }
    }
}

fn status_error(status: u16) -> Option<ApiError> {
    match status {
        401 => Some(ApiError::Unauthorized),
        404 => Some(ApiError::NotFound),
        429 => Some(ApiError::RateLimit),
        s if s >= 400 => Some(ApiError::Status(s)),
        _ => None,
    }
}

fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(error.to_string())
    }
}

fn list_page(kind: MediaKind, value: serde_json::Value) -> Result<ListPage, ApiError> {
    let page = match kind {
        MediaKind::Movie => {
            let raw: PagedResponse<MovieEntry> = decode(value)?;
            into_list_page(raw)
        }
        MediaKind::Tv => {
            let raw: PagedResponse<TvEntry> = decode(value)?;
            into_list_page(raw)
        }
    };
    Ok(page)
}

fn into_list_page<T: Into<ListItem>>(raw: PagedResponse<T>) -> ListPage {
    ListPage {
        items: raw.results.into_iter().map(Into::into).collect(),
        page: raw.page,
        total_pages: raw.total_pages,
        total_results: raw.total_results,
    }
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

#[derive(Clone)]
pub struct TmdbClient {
    access_token: String,
    base_url: String,
    language: String,
    http_client: Arc<reqwest::Client>,
}

impl TmdbClient {
    pub fn new(
        access_token: String,
        base_url: String,
        language: String,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            language,
            http_client: Arc::new(http_client),
        })
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self, ApiError> {
        Self::new(
            settings.access_token.clone(),
            settings.base_url.clone(),
            settings.language.clone(),
            settings.request_timeout(),
        )
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "tmdb request");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        if let Some(error) = status_error(response.status().as_u16()) {
            return Err(error);
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Parse(e.to_string())
            }
        })
    }
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn list_by_category(
        &self,
        kind: MediaKind,
        category: &str,
        page: u32,
    ) -> Result<ListPage, ApiError> {
        let endpoint = format!("/{}/{}", kind.path(), category);
        let value = self
            .fetch_json(&endpoint, &[("page", page.to_string())])
            .await?;
        list_page(kind, value)
    }

    async fn list_by_genre(
        &self,
        kind: MediaKind,
        genre_id: u64,
        page: u32,
        sort_by: &str,
    ) -> Result<ListPage, ApiError> {
        let endpoint = format!("/discover/{}", kind.path());
        let params = [
            ("with_genres", genre_id.to_string()),
            ("page", page.to_string()),
            ("sort_by", sort_by.to_string()),
        ];
        let value = self.fetch_json(&endpoint, &params).await?;
        list_page(kind, value)
    }

    async fn list_genres(&self, kind: MediaKind) -> Result<Vec<Genre>, ApiError> {
        let response: GenreListResponse = self
            .fetch_json(&format!("/genre/{}/list", kind.path()), &[])
            .await?;
        Ok(response.genres)
    }

    async fn detail(&self, kind: MediaKind, id: MediaId) -> Result<DetailRecord, ApiError> {
        let value: serde_json::Value = self
            .fetch_json(&format!("/{}/{}", kind.path(), id), &[])
            .await?;
        let record = match kind {
            MediaKind::Movie => decode::<MovieDetailPayload>(value)?.into(),
            MediaKind::Tv => decode::<TvDetailPayload>(value)?.into(),
        };
        Ok(record)
    }

    async fn credits(&self, kind: MediaKind, id: MediaId) -> Result<Vec<CastMember>, ApiError> {
        let response: CreditsResponse = self
            .fetch_json(&format!("/{}/{}/credits", kind.path(), id), &[])
            .await?;
        Ok(response.cast)
    }

    async fn videos(&self, kind: MediaKind, id: MediaId) -> Result<Vec<Video>, ApiError> {
        let response: VideosResponse = self
            .fetch_json(&format!("/{}/{}/videos", kind.path(), id), &[])
            .await?;
        Ok(response.results)
    }

    async fn recommendations(
        &self,
        kind: MediaKind,
        id: MediaId,
    ) -> Result<Vec<ListItem>, ApiError> {
        let value = self
            .fetch_json(&format!("/{}/{}/recommendations", kind.path(), id), &[])
            .await?;
        Ok(list_page(kind, value)?.items)
    }

    async fn season_detail(&self, id: MediaId, season: u32) -> Result<SeasonDetail, ApiError> {
        self.fetch_json(&format!("/tv/{}/season/{}", id, season), &[])
            .await
    }

    async fn search_multi(&self, query: &str, page: u32) -> Result<MultiSearchPage, ApiError> {
        let params = [("query", query.to_string()), ("page", page.to_string())];
        let raw: PagedResponse<CatalogEntry> = self.fetch_json("/search/multi", &params).await?;
        Ok(MultiSearchPage {
            entries: raw.results,
            total_results: raw.total_results,
        })
    }
}

const HOME_ROWS: [(&str, MediaKind, ListTab); 8] = [
    ("Popular Movies", MediaKind::Movie, ListTab::Popular),
    ("Top Rated Movies", MediaKind::Movie, ListTab::TopRated),
    ("Now Playing", MediaKind::Movie, ListTab::NowPlaying),
    ("Upcoming", MediaKind::Movie, ListTab::Upcoming),
    ("Popular TV", MediaKind::Tv, ListTab::Popular),
    ("Top Rated TV", MediaKind::Tv, ListTab::TopRated),
    ("On The Air", MediaKind::Tv, ListTab::OnTheAir),
    ("Airing Today", MediaKind::Tv, ListTab::AiringToday),
];

/// Fetches every home row at once; one failed row fails the page.
pub async fn load_home_rows(catalog: Arc<dyn Catalog>) -> Result<Vec<HomeRow>, ApiError> {
    let fetch = |index: usize| {
        let catalog = Arc::clone(&catalog);
        let (_, kind, tab) = HOME_ROWS[index];
        async move { catalog.list_by_category(kind, tab.category(), 1).await }
    };

    let pages = tokio::try_join!(
        fetch(0),
        fetch(1),
        fetch(2),
        fetch(3),
        fetch(4),
        fetch(5),
        fetch(6),
        fetch(7)
    )?;

    let pages = [
        pages.0, pages.1, pages.2, pages.3, pages.4, pages.5, pages.6, pages.7,
    ];
    Ok(HOME_ROWS
        .iter()
        .zip(pages)
        .map(|(&(title, kind, tab), page)| HomeRow {
            title: title.to_string(),
            kind,
            tab,
            items: page.items,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;

    #[test]
    fn image_urls_use_size_presets() {
        assert_eq!(
            image_url("/a.jpg", ImageSize::Poster),
            "https://image.tmdb.org/t/p/w500/a.jpg"
        );
        assert_eq!(
            image_url("/a.jpg", ImageSize::Backdrop),
            "https://image.tmdb.org/t/p/original/a.jpg"
        );
        assert_eq!(
            image_url("/p.jpg", ImageSize::Profile),
            "https://image.tmdb.org/t/p/w185/p.jpg"
        );
        assert_eq!(
            image_url("/s.jpg", ImageSize::Still),
            "https://image.tmdb.org/t/p/w300/s.jpg"
        );
        assert_eq!(
            video_embed_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn statuses_map_to_error_variants() {
        assert_eq!(status_error(200), None);
        assert_eq!(status_error(304), None);
        assert_eq!(status_error(401), Some(ApiError::Unauthorized));
        assert_eq!(status_error(404), Some(ApiError::NotFound));
        assert_eq!(status_error(429), Some(ApiError::RateLimit));
        assert_eq!(status_error(503), Some(ApiError::Status(503)));
    }

    #[test]
    fn tv_detail_payload_keeps_seasons_and_run_time() {
        let value = serde_json::json!({
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "overview": "Seven noble families fight for control.",
            "tagline": "",
            "poster_path": "/got.jpg",
            "backdrop_path": null,
            "vote_average": 8.4,
            "vote_count": 21000,
            "genres": [{"id": 10765, "name": "Sci-Fi & Fantasy"}],
            "episode_run_time": [60],
            "number_of_seasons": 8,
            "number_of_episodes": 73,
            "seasons": [
                {"id": 3627, "season_number": 0, "name": "Specials", "episode_count": 14},
                {"id": 3624, "season_number": 1, "name": "Season 1", "episode_count": 10}
            ]
        });
        let record: DetailRecord = decode::<TvDetailPayload>(value).unwrap().into();

        assert_eq!(record.kind, MediaKind::Tv);
        assert_eq!(record.title, "Game of Thrones");
        assert_eq!(record.tagline, None);
        assert_eq!(record.seasons.len(), 2);
        assert_eq!(record.selectable_seasons().len(), 1);
        assert_eq!(record.number_of_episodes, Some(73));
    }

    #[test]
    fn detail_without_genres_is_malformed() {
        let value = serde_json::json!({"id": 550, "title": "Fight Club"});
        let result = decode::<MovieDetailPayload>(value);
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    fn list_payload_projects_by_requested_kind() {
        let value = serde_json::json!({
            "page": 2,
            "total_pages": 40,
            "total_results": 800,
            "results": [
                {"id": 66732, "name": "Stranger Things", "first_air_date": "2016-07-15",
                 "poster_path": "/st.jpg", "backdrop_path": null, "vote_average": 8.6}
            ]
        });
        let page = list_page(MediaKind::Tv, value).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 40);
        assert_eq!(page.items[0].kind, MediaKind::Tv);
        assert_eq!(page.items[0].title, "Stranger Things");
    }

    #[tokio::test]
    async fn home_rows_issue_every_category_once() {
        let fake = Arc::new(FakeCatalog::default());
        let rows = load_home_rows(fake.clone()).await.unwrap();

        assert_eq!(rows.len(), 8);
        assert_eq!(fake.calls("list_by_category"), 8);
        assert_eq!(rows[0].kind, MediaKind::Movie);
        assert_eq!(rows[6].tab, ListTab::OnTheAir);
        assert_eq!(rows[6].kind, MediaKind::Tv);
    }

    #[tokio::test]
    async fn one_failed_row_fails_the_home_page() {
        let fake = Arc::new(FakeCatalog::default());
        fake.fail_with(ApiError::RateLimit);
        let result = load_home_rows(fake).await;
        assert_eq!(result.err(), Some(ApiError::RateLimit));
    }
}
