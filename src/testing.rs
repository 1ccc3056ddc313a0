use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::media::{
    ApiError, CastMember, CatalogEntry, DetailRecord, Episode, Genre, ListItem, ListPage,
    MediaId, MediaKind, MovieEntry, MultiSearchPage, SeasonDetail, SeasonSummary, TvEntry, Video,
};
use crate::tmdb::Catalog;

/// In-memory catalog that counts calls and can be slowed down or broken per test.
#[derive(Default)]
pub struct FakeCatalog {
    calls: Mutex<HashMap<&'static str, usize>>,
    queries: Mutex<Vec<String>>,
    list_requests: Mutex<Vec<String>>,
    season_requests: Mutex<Vec<(MediaId, u32)>>,
    detail_delays: Mutex<HashMap<MediaId, Duration>>,
    season_delays: Mutex<HashMap<u32, Duration>>,
    videos: Mutex<Option<Vec<Video>>>,
    cast_len: Mutex<Option<u64>>,
    recommendation_len: Mutex<Option<u64>>,
    failure: Mutex<Option<ApiError>>,
}

impl FakeCatalog {
    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn list_requests(&self) -> Vec<String> {
        self.list_requests.lock().unwrap().clone()
    }

    pub fn season_requests(&self) -> Vec<(MediaId, u32)> {
        self.season_requests.lock().unwrap().clone()
    }

    pub fn delay_detail(&self, id: MediaId, delay: Duration) {
        self.detail_delays.lock().unwrap().insert(id, delay);
    }

    pub fn delay_season(&self, season: u32, delay: Duration) {
        self.season_delays.lock().unwrap().insert(season, delay);
    }

    pub fn set_videos(&self, videos: Vec<Video>) {
        *self.videos.lock().unwrap() = Some(videos);
    }

    pub fn set_cast_len(&self, len: u64) {
        *self.cast_len.lock().unwrap() = Some(len);
    }

    pub fn set_recommendation_len(&self, len: u64) {
        *self.recommendation_len.lock().unwrap() = Some(len);
    }

    pub fn fail_with(&self, error: ApiError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    fn record(&self, operation: &'static str) -> Result<(), ApiError> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub fn list_item(kind: MediaKind, id: MediaId) -> ListItem {
    ListItem {
        id,
        kind,
        title: format!("{} {}", kind, id),
        date: Some(String::from("2020-01-01")),
        overview: String::new(),
        poster_path: Some(format!("/{}.jpg", id)),
        backdrop_path: None,
        vote_average: 7.0,
        genre_ids: Vec::new(),
    }
}

pub fn video(key: &str, video_type: &str, site: &str) -> Video {
    Video {
        id: key.to_string(),
        key: key.to_string(),
        name: format!("{} {}", video_type, key),
        video_type: video_type.to_string(),
        site: site.to_string(),
    }
}

pub fn detail_record(kind: MediaKind, id: MediaId) -> DetailRecord {
    let seasons = match kind {
        MediaKind::Movie => Vec::new(),
        MediaKind::Tv => (0..=3)
            .map(|n| SeasonSummary {
                id: id * 100 + u64::from(n),
                season_number: n,
                name: if n == 0 {
                    String::from("Specials")
                } else {
                    format!("Season {}", n)
                },
                episode_count: 8,
                air_date: None,
                poster_path: None,
            })
            .collect(),
    };
    DetailRecord {
        id,
        kind,
        title: format!("{} {}", kind, id),
        date: Some(String::from("2020-01-01")),
        overview: String::from("overview"),
        tagline: None,
        poster_path: None,
        backdrop_path: None,
        vote_average: 7.5,
        vote_count: 100,
        genres: vec![Genre {
            id: 18,
            name: String::from("Drama"),
        }],
        runtime: (kind == MediaKind::Movie).then_some(120),
        episode_run_time: Vec::new(),
        number_of_seasons: (kind == MediaKind::Tv).then_some(3),
        number_of_episodes: (kind == MediaKind::Tv).then_some(24),
        seasons,
        status: None,
        original_language: None,
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn list_by_category(
        &self,
        kind: MediaKind,
        category: &str,
        page: u32,
    ) -> Result<ListPage, ApiError> {
        self.record("list_by_category")?;
        self.list_requests
            .lock()
            .unwrap()
            .push(format!("/{}/{}?page={}", kind, category, page));
        Ok(ListPage {
            items: (1..=20).map(|id| list_item(kind, id)).collect(),
            page,
            total_pages: 5,
            total_results: 100,
        })
    }

    async fn list_by_genre(
        &self,
        kind: MediaKind,
        genre_id: u64,
        page: u32,
        sort_by: &str,
    ) -> Result<ListPage, ApiError> {
        self.record("list_by_genre")?;
        self.list_requests.lock().unwrap().push(format!(
            "/discover/{}?with_genres={}&page={}&sort_by={}",
            kind, genre_id, page, sort_by
        ));
        Ok(ListPage {
            items: (1..=3).map(|id| list_item(kind, id)).collect(),
            page,
            total_pages: 1,
            total_results: 3,
        })
    }

    async fn list_genres(&self, kind: MediaKind) -> Result<Vec<Genre>, ApiError> {
        self.record("list_genres")?;
        let name = match kind {
            MediaKind::Movie => "Action",
            MediaKind::Tv => "Action & Adventure",
        };
        Ok(vec![Genre {
            id: 28,
            name: name.to_string(),
        }])
    }

    async fn detail(&self, kind: MediaKind, id: MediaId) -> Result<DetailRecord, ApiError> {
        let delay = self.detail_delays.lock().unwrap().get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record("detail")?;
        Ok(detail_record(kind, id))
    }

    async fn credits(&self, _kind: MediaKind, id: MediaId) -> Result<Vec<CastMember>, ApiError> {
        self.record("credits")?;
        let len = self.cast_len.lock().unwrap().unwrap_or(15);
        Ok((1..=len)
            .map(|n| CastMember {
                id: id * 1000 + n,
                name: format!("Actor {}", n),
                character: format!("Role {}", n),
                profile_path: None,
            })
            .collect())
    }

    async fn videos(&self, _kind: MediaKind, _id: MediaId) -> Result<Vec<Video>, ApiError> {
        self.record("videos")?;
        let configured = self.videos.lock().unwrap().clone();
        Ok(configured.unwrap_or_else(|| {
            vec![
                video("teaser", "Teaser", "YouTube"),
                video("trailer", "Trailer", "YouTube"),
            ]
        }))
    }

    async fn recommendations(
        &self,
        kind: MediaKind,
        id: MediaId,
    ) -> Result<Vec<ListItem>, ApiError> {
        self.record("recommendations")?;
        let len = self.recommendation_len.lock().unwrap().unwrap_or(12);
        Ok((1..=len).map(|n| list_item(kind, id * 100 + n)).collect())
    }

    async fn season_detail(&self, id: MediaId, season: u32) -> Result<SeasonDetail, ApiError> {
        let delay = self.season_delays.lock().unwrap().get(&season).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record("season_detail")?;
        self.season_requests.lock().unwrap().push((id, season));
        Ok(SeasonDetail {
            id: id * 100 + u64::from(season),
            name: format!("Season {}", season),
            overview: String::new(),
            season_number: season,
            air_date: None,
            poster_path: None,
            episodes: (1..=3)
                .map(|n| Episode {
                    id: u64::from(season) * 100 + u64::from(n),
                    episode_number: n,
                    season_number: season,
                    name: format!("Episode {}", n),
                    overview: String::new(),
                    air_date: None,
                    still_path: None,
                    runtime: Some(45),
                    vote_average: 8.0,
                })
                .collect(),
        })
    }

    async fn search_multi(&self, query: &str, _page: u32) -> Result<MultiSearchPage, ApiError> {
        self.record("search_multi")?;
        self.queries.lock().unwrap().push(query.to_string());
        let movie = MovieEntry {
            id: 268,
            title: String::from("Batman"),
            release_date: Some(String::from("1989-06-23")),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 7.2,
            genre_ids: Vec::new(),
        };
        let show = TvEntry {
            id: 2098,
            name: String::from("Batman: The Animated Series"),
            first_air_date: Some(String::from("1992-09-05")),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 8.5,
            genre_ids: Vec::new(),
        };
        Ok(MultiSearchPage {
            entries: vec![
                CatalogEntry::Movie(movie),
                CatalogEntry::Person,
                CatalogEntry::Tv(show),
            ],
            total_results: 3,
        })
    }
}
