use std::sync::Arc;

use crate::epoch::{Epoch, RequestToken};
use crate::media::{
    ApiError, CastMember, DetailRecord, ListItem, MediaId, MediaKey, MediaKind, SeasonDetail,
    SeasonSummary, Video,
};
use crate::tmdb::Catalog;

pub const CAST_LIMIT: usize = 10;
pub const RECOMMENDATION_LIMIT: usize = 10;
const FIRST_SEASON: u32 = 1;

/// Everything one detail surface renders for a title.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub detail: DetailRecord,
    pub cast: Vec<CastMember>,
    pub trailer: Option<Video>,
    pub recommendations: Vec<ListItem>,
}

impl DetailView {
    pub fn key(&self) -> MediaKey {
        self.detail.key()
    }
}

pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
}

/// Runs the four detail fetches together; any failure fails the group.
pub async fn fetch_detail_view(
    catalog: Arc<dyn Catalog>,
    key: MediaKey,
) -> Result<DetailView, ApiError> {
    let MediaKey { kind, id } = key;
    let (detail, mut cast, videos, mut recommendations) = tokio::try_join!(
        catalog.detail(kind, id),
        catalog.credits(kind, id),
        catalog.videos(kind, id),
        catalog.recommendations(kind, id),
    )?;

    cast.truncate(CAST_LIMIT);
    recommendations.truncate(RECOMMENDATION_LIMIT);
    let trailer = select_trailer(&videos).cloned();

    Ok(DetailView {
        detail,
        cast,
        trailer,
        recommendations,
    })
}

pub async fn fetch_season(
    catalog: Arc<dyn Catalog>,
    id: MediaId,
    season: u32,
) -> Result<SeasonDetail, ApiError> {
    catalog.season_detail(id, season).await
}

#[derive(Debug, Clone, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading(MediaKey),
    Loaded(Box<DetailView>),
    Failed(MediaKey),
}

#[derive(Debug, Clone, Default)]
pub enum SeasonState {
    #[default]
    Idle,
    Loading(u32),
    Loaded(SeasonDetail),
    Failed(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRequest {
    pub token: RequestToken,
    pub key: MediaKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonRequest {
    pub token: RequestToken,
    pub id: MediaId,
    pub season: u32,
}

/// One detail slot (modal or page) with its title load and season cascade.
///
/// Title loads and season loads are tracked by separate epochs so a late
/// answer for a previous title or season never overwrites the current one.
#[derive(Debug)]
pub struct DetailLoader {
    detail_epoch: Epoch,
    season_epoch: Epoch,
    state: DetailState,
    selected_season: u32,
    season: SeasonState,
}

impl Default for DetailLoader {
    fn default() -> Self {
        Self {
            detail_epoch: Epoch::new(),
            season_epoch: Epoch::new(),
            state: DetailState::Idle,
            selected_season: FIRST_SEASON,
            season: SeasonState::Idle,
        }
    }
}

impl DetailLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, key: MediaKey) -> DetailRequest {
        self.season_epoch.invalidate();
        self.selected_season = FIRST_SEASON;
        self.season = SeasonState::Idle;
        self.state = DetailState::Loading(key);
        DetailRequest {
            token: self.detail_epoch.issue(),
            key,
        }
    }

    /// Applies a finished title load. TV titles answer with the season 1 request.
    pub fn finish(
        &mut self,
        token: RequestToken,
        result: Result<DetailView, ApiError>,
    ) -> Option<SeasonRequest> {
        if !self.detail_epoch.is_current(token) {
            tracing::debug!(token = token.value(), "discarding stale detail response");
            return None;
        }

        match result {
            Ok(view) => {
                let key = view.key();
                self.state = DetailState::Loaded(Box::new(view));
                match key.kind {
                    MediaKind::Tv => Some(self.request_season(key.id, FIRST_SEASON)),
                    MediaKind::Movie => None,
                }
            }
            Err(error) => {
                let key = match &self.state {
                    DetailState::Loading(key) | DetailState::Failed(key) => *key,
                    DetailState::Loaded(view) => view.key(),
                    DetailState::Idle => return None,
                };
                tracing::warn!(id = key.id, kind = %key.kind, %error, "detail load failed");
                self.state = DetailState::Failed(key);
                None
            }
        }
    }

    /// Only meaningful once a TV title is loaded; season 0 is never selectable.
    pub fn select_season(&mut self, season: u32) -> Option<SeasonRequest> {
        let id = match &self.state {
            DetailState::Loaded(view) if view.detail.kind == MediaKind::Tv => view.detail.id,
            _ => return None,
        };
        if season == 0 {
            return None;
        }
        Some(self.request_season(id, season))
    }

    fn request_season(&mut self, id: MediaId, season: u32) -> SeasonRequest {
        self.selected_season = season;
        self.season = SeasonState::Loading(season);
        SeasonRequest {
            token: self.season_epoch.issue(),
            id,
            season,
        }
    }

    pub fn finish_season(
        &mut self,
        token: RequestToken,
        result: Result<SeasonDetail, ApiError>,
    ) -> bool {
        if !self.season_epoch.is_current(token) {
            tracing::debug!(token = token.value(), "discarding stale season response");
            return false;
        }

        self.season = match result {
            Ok(season) => SeasonState::Loaded(season),
            Err(error) => {
                tracing::warn!(season = self.selected_season, %error, "season load failed");
                SeasonState::Failed(self.selected_season)
            }
        };
        true
    }

    /// Drops the slot back to idle and retires anything in flight.
    pub fn reset(&mut self) {
        self.detail_epoch.invalidate();
        self.season_epoch.invalidate();
        self.state = DetailState::Idle;
        self.season = SeasonState::Idle;
        self.selected_season = FIRST_SEASON;
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn view(&self) -> Option<&DetailView> {
        match &self.state {
            DetailState::Loaded(view) => Some(view.as_ref()),
            _ => None,
        }
    }

    pub fn selected_season(&self) -> u32 {
        self.selected_season
    }

    pub fn season_state(&self) -> &SeasonState {
        &self.season
    }

    pub fn season_tabs(&self) -> Vec<&SeasonSummary> {
        self.view()
            .map(|view| view.detail.selectable_seasons())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{video, FakeCatalog};

    fn catalog(fake: &Arc<FakeCatalog>) -> Arc<dyn Catalog> {
        fake.clone()
    }

    #[test]
    fn first_youtube_trailer_wins() {
        let videos = vec![
            video("a", "Teaser", "YouTube"),
            video("b", "Trailer", "Vimeo"),
            video("c", "Trailer", "YouTube"),
            video("d", "Trailer", "YouTube"),
        ];
        assert_eq!(select_trailer(&videos).map(|v| v.key.as_str()), Some("c"));
    }

    #[test]
    fn teasers_alone_mean_no_trailer() {
        let videos = vec![video("a", "Teaser", "YouTube"), video("b", "Clip", "YouTube")];
        assert_eq!(select_trailer(&videos), None);
        assert_eq!(select_trailer(&[]), None);
    }

    #[tokio::test]
    async fn detail_group_truncates_cast_and_recommendations() {
        let fake = Arc::new(FakeCatalog::default());
        let view = fetch_detail_view(catalog(&fake), MediaKey::movie(550))
            .await
            .unwrap();

        assert_eq!(view.cast.len(), CAST_LIMIT);
        assert_eq!(view.cast[0].name, "Actor 1");
        assert_eq!(view.recommendations.len(), RECOMMENDATION_LIMIT);
        assert_eq!(view.trailer.map(|t| t.key), Some(String::from("trailer")));
        for op in ["detail", "credits", "videos", "recommendations"] {
            assert_eq!(fake.calls(op), 1, "{op}");
        }
    }

    #[tokio::test]
    async fn short_lists_pass_through_and_missing_trailer_is_none() {
        let fake = Arc::new(FakeCatalog::default());
        fake.set_cast_len(3);
        fake.set_recommendation_len(3);
        fake.set_videos(vec![
            video("teaser", "Teaser", "YouTube"),
            video("vimeo", "Trailer", "Vimeo"),
        ]);
        let view = fetch_detail_view(catalog(&fake), MediaKey::movie(550))
            .await
            .unwrap();

        let cast: Vec<&str> = view.cast.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cast, vec!["Actor 1", "Actor 2", "Actor 3"]);
        let recommended: Vec<MediaId> = view.recommendations.iter().map(|r| r.id).collect();
        assert_eq!(recommended, vec![55001, 55002, 55003]);
        assert_eq!(view.trailer, None);
    }

    #[tokio::test]
    async fn one_failed_fetch_fails_the_group() {
        let fake = Arc::new(FakeCatalog::default());
        fake.fail_with(ApiError::NotFound);
        let mut loader = DetailLoader::new();
        let request = loader.begin(MediaKey::movie(1));
        let result = fetch_detail_view(catalog(&fake), request.key).await;

        assert!(loader.finish(request.token, result).is_none());
        assert!(matches!(loader.state(), DetailState::Failed(key) if *key == MediaKey::movie(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn late_answer_for_previous_title_is_discarded() {
        let fake = Arc::new(FakeCatalog::default());
        fake.delay_detail(1, Duration::from_millis(500));
        let mut loader = DetailLoader::new();

        let first = loader.begin(MediaKey::movie(1));
        let slow = tokio::spawn(fetch_detail_view(catalog(&fake), first.key));
        let second = loader.begin(MediaKey::movie(2));
        let fast = fetch_detail_view(catalog(&fake), second.key).await;

        assert!(loader.finish(second.token, fast).is_none());
        let late = slow.await.unwrap();
        assert!(loader.finish(first.token, late).is_none());

        let shown = loader.view().map(DetailView::key);
        assert_eq!(shown, Some(MediaKey::movie(2)));
    }

    #[tokio::test]
    async fn tv_load_cascades_into_season_one() {
        let fake = Arc::new(FakeCatalog::default());
        let mut loader = DetailLoader::new();
        let request = loader.begin(MediaKey::tv(1399));
        let result = fetch_detail_view(catalog(&fake), request.key).await;

        let season = loader.finish(request.token, result).unwrap();
        assert_eq!((season.id, season.season), (1399, 1));
        assert!(matches!(loader.season_state(), SeasonState::Loading(1)));

        let episodes = fetch_season(catalog(&fake), season.id, season.season).await;
        assert!(loader.finish_season(season.token, episodes));
        assert!(matches!(loader.season_state(), SeasonState::Loaded(s) if s.episodes.len() == 3));

        let tabs: Vec<u32> = loader.season_tabs().iter().map(|s| s.season_number).collect();
        assert_eq!(tabs, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn switching_titles_resets_season_to_one() {
        let fake = Arc::new(FakeCatalog::default());
        let mut loader = DetailLoader::new();

        let request = loader.begin(MediaKey::tv(10));
        let result = fetch_detail_view(catalog(&fake), request.key).await;
        loader.finish(request.token, result);
        let third = loader.select_season(3).unwrap();
        assert_eq!(loader.selected_season(), 3);

        let next = loader.begin(MediaKey::tv(20));
        assert_eq!(loader.selected_season(), 1);
        let late = fetch_season(catalog(&fake), third.id, third.season).await;
        assert!(!loader.finish_season(third.token, late));

        let result = fetch_detail_view(catalog(&fake), next.key).await;
        let season = loader.finish(next.token, result).unwrap();
        assert_eq!((season.id, season.season), (20, 1));
        assert_eq!(fake.calls("detail"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn only_latest_season_pick_is_applied() {
        let fake = Arc::new(FakeCatalog::default());
        fake.delay_season(2, Duration::from_millis(300));
        let mut loader = DetailLoader::new();
        let request = loader.begin(MediaKey::tv(5));
        let result = fetch_detail_view(catalog(&fake), request.key).await;
        loader.finish(request.token, result);

        let second = loader.select_season(2).unwrap();
        let slow = tokio::spawn(fetch_season(catalog(&fake), second.id, second.season));
        let third = loader.select_season(3).unwrap();
        let fast = fetch_season(catalog(&fake), third.id, third.season).await;

        assert!(loader.finish_season(third.token, fast));
        assert!(!loader.finish_season(second.token, slow.await.unwrap()));
        assert!(matches!(loader.season_state(), SeasonState::Loaded(s) if s.season_number == 3));
        assert_eq!(fake.season_requests(), vec![(5, 3), (5, 2)]);
        assert_eq!(fake.calls("detail"), 1);
    }

    #[test]
    fn season_selection_needs_a_loaded_show() {
        let mut loader = DetailLoader::new();
        assert!(loader.select_season(2).is_none());
        loader.begin(MediaKey::movie(3));
        assert!(loader.select_season(1).is_none());
    }

    #[test]
    fn reset_retires_in_flight_loads() {
        let mut loader = DetailLoader::new();
        let request = loader.begin(MediaKey::movie(9));
        loader.reset();
        let view = DetailView {
            detail: crate::testing::detail_record(MediaKind::Movie, 9),
            cast: Vec::new(),
            trailer: None,
            recommendations: Vec::new(),
        };
        loader.finish(request.token, Ok(view));
        assert!(matches!(loader.state(), DetailState::Idle));
    }
}
