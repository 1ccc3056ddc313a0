use crate::media::{ApiError, ListPage, MediaKind};
use crate::tmdb::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListTab {
    #[default]
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    OnTheAir,
    AiringToday,
}

const MOVIE_TABS: [ListTab; 4] = [
    ListTab::Popular,
    ListTab::TopRated,
    ListTab::NowPlaying,
    ListTab::Upcoming,
];

const TV_TABS: [ListTab; 4] = [
    ListTab::Popular,
    ListTab::TopRated,
    ListTab::OnTheAir,
    ListTab::AiringToday,
];

impl ListTab {
    pub fn for_kind(kind: MediaKind) -> &'static [ListTab] {
        match kind {
            MediaKind::Movie => &MOVIE_TABS,
            MediaKind::Tv => &TV_TABS,
        }
    }

    /// Query-string form.
    pub fn key(self) -> &'static str {
        match self {
            ListTab::Popular => "popular",
            ListTab::TopRated => "top_rated",
            ListTab::NowPlaying => "now_playing",
            ListTab::Upcoming => "upcoming",
            ListTab::OnTheAir => "on_air",
            ListTab::AiringToday => "airing_today",
        }
    }

    /// Unknown keys, and keys that belong to the other kind, fall back to popular.
    pub fn parse(kind: MediaKind, key: &str) -> ListTab {
        Self::for_kind(kind)
            .iter()
            .copied()
            .find(|tab| tab.key() == key)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            ListTab::Popular => "Popular",
            ListTab::TopRated => "Top Rated",
            ListTab::NowPlaying => "Now Playing",
            ListTab::Upcoming => "Upcoming",
            ListTab::OnTheAir => "On The Air",
            ListTab::AiringToday => "Airing Today",
        }
    }

    /// Provider category segment used when no genre is filtered.
    pub fn category(self) -> &'static str {
        match self {
            ListTab::Popular => "popular",
            ListTab::TopRated => "top_rated",
            ListTab::NowPlaying => "now_playing",
            ListTab::Upcoming => "upcoming",
            ListTab::OnTheAir => "on_the_air",
            ListTab::AiringToday => "airing_today",
        }
    }

    /// Discover ordering that approximates the tab once a genre is applied.
    pub fn sort_key(self) -> &'static str {
        match self {
            ListTab::Popular => "popularity.desc",
            ListTab::TopRated => "vote_average.desc",
            ListTab::NowPlaying => "primary_release_date.desc",
            ListTab::Upcoming => "primary_release_date.asc",
            ListTab::OnTheAir | ListTab::AiringToday => "first_air_date.desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub kind: MediaKind,
    pub tab: ListTab,
    pub genre: Option<u64>,
    pub page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(MediaKind::Movie, ListTab::Popular)
    }
}

impl ListQuery {
    pub fn new(kind: MediaKind, tab: ListTab) -> Self {
        Self {
            kind,
            tab: ListTab::parse(kind, tab.key()),
            genre: None,
            page: 1,
        }
    }

    /// Exactly one provider operation per query; a genre filter takes priority.
    pub fn resolve(&self) -> ListRequest {
        match self.genre {
            Some(genre_id) => ListRequest::Genre {
                kind: self.kind,
                genre_id,
                page: self.page,
                sort_by: self.tab.sort_key(),
            },
            None => ListRequest::Category {
                kind: self.kind,
                category: self.tab.category(),
                page: self.page,
            },
        }
    }

    pub fn with_tab(&self, tab: ListTab) -> Self {
        Self::new(self.kind, tab)
    }

    /// Selecting the active genre again clears the filter.
    pub fn toggle_genre(&self, genre_id: u64) -> Self {
        let genre = if self.genre == Some(genre_id) {
            None
        } else {
            Some(genre_id)
        };
        Self {
            genre,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("type", self.kind.path().to_string()),
            ("tab", self.tab.key().to_string()),
        ];
        if let Some(genre) = self.genre {
            params.push(("genre", genre.to_string()));
        }
        params.push(("page", self.page.to_string()));
        params
    }

    /// Missing or malformed values fall back to movie / popular / no genre / page 1.
    pub fn from_params<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut kind = MediaKind::default();
        let mut tab_key = "";
        let mut genre = None;
        let mut page = 1;
        for (key, value) in params {
            match key {
                "type" => kind = MediaKind::parse(value).unwrap_or_default(),
                "tab" => tab_key = value,
                "genre" => genre = value.parse().ok(),
                "page" => page = value.parse().ok().filter(|&p: &u32| p > 0).unwrap_or(1),
                _ => {}
            }
        }
        Self {
            kind,
            tab: ListTab::parse(kind, tab_key),
            genre,
            page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
    Category {
        kind: MediaKind,
        category: &'static str,
        page: u32,
    },
    Genre {
        kind: MediaKind,
        genre_id: u64,
        page: u32,
        sort_by: &'static str,
    },
}

impl ListRequest {
    pub async fn execute(self, catalog: &dyn Catalog) -> Result<ListPage, ApiError> {
        match self {
            ListRequest::Category {
                kind,
                category,
                page,
            } => catalog.list_by_category(kind, category, page).await,
            ListRequest::Genre {
                kind,
                genre_id,
                page,
                sort_by,
            } => catalog.list_by_genre(kind, genre_id, page, sort_by).await,
        }
    }
}

pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

const WINDOW_RADIUS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub total: u32,
    pub pages: Vec<u32>,
}

impl PageWindow {
    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    pub fn first_shortcut(&self) -> bool {
        self.pages.first().is_some_and(|&p| p > 1)
    }

    pub fn leading_gap(&self) -> bool {
        self.pages.first().is_some_and(|&p| p > 2)
    }

    pub fn last_shortcut(&self) -> bool {
        self.pages.last().is_some_and(|&p| p < self.total)
    }

    pub fn trailing_gap(&self) -> bool {
        self.pages.last().is_some_and(|&p| p + 1 < self.total)
    }
}

/// Numbered buttons around the current page; empty when there is a single page.
pub fn page_window(current: u32, total: u32) -> PageWindow {
    let current = clamp_page(current, total);
    let pages = if total <= 1 {
        Vec::new()
    } else {
        let start = current.saturating_sub(WINDOW_RADIUS).max(1);
        let end = (current + WINDOW_RADIUS).min(total);
        (start..=end).collect()
    };
    PageWindow {
        current,
        total,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;

    #[test]
    fn genre_filter_resolves_to_discover_with_tab_sort() {
        let query = ListQuery {
            kind: MediaKind::Movie,
            tab: ListTab::Upcoming,
            genre: Some(28),
            page: 2,
        };
        assert_eq!(
            query.resolve(),
            ListRequest::Genre {
                kind: MediaKind::Movie,
                genre_id: 28,
                page: 2,
                sort_by: "primary_release_date.asc",
            }
        );
    }

    #[test]
    fn tabs_resolve_to_category_endpoints() {
        let tv = ListQuery::new(MediaKind::Tv, ListTab::OnTheAir);
        assert_eq!(
            tv.resolve(),
            ListRequest::Category {
                kind: MediaKind::Tv,
                category: "on_the_air",
                page: 1,
            }
        );
        let with_genre = tv.toggle_genre(16);
        assert!(matches!(
            with_genre.resolve(),
            ListRequest::Genre {
                sort_by: "first_air_date.desc",
                ..
            }
        ));
    }

    #[test]
    fn unknown_or_foreign_tab_falls_back_to_popular() {
        assert_eq!(ListTab::parse(MediaKind::Movie, "trending"), ListTab::Popular);
        assert_eq!(ListTab::parse(MediaKind::Tv, "now_playing"), ListTab::Popular);
        assert_eq!(ListTab::parse(MediaKind::Tv, "on_air"), ListTab::OnTheAir);
    }

    #[test]
    fn tab_change_resets_page_and_genre() {
        let query = ListQuery::new(MediaKind::Movie, ListTab::Popular)
            .toggle_genre(28)
            .with_page(4);
        let next = query.with_tab(ListTab::TopRated);
        assert_eq!(next.tab, ListTab::TopRated);
        assert_eq!(next.genre, None);
        assert_eq!(next.page, 1);
    }

    #[test]
    fn selecting_active_genre_clears_it() {
        let query = ListQuery::default().toggle_genre(28).with_page(3);
        assert_eq!(query.genre, Some(28));
        let cleared = query.toggle_genre(28);
        assert_eq!(cleared.genre, None);
        assert_eq!(cleared.page, 1);
    }

    #[test]
    fn params_round_trip_and_tolerate_garbage() {
        let query = ListQuery::new(MediaKind::Tv, ListTab::AiringToday)
            .toggle_genre(35)
            .with_page(7);
        let params = query.to_params();
        let parsed = ListQuery::from_params(params.iter().map(|(k, v)| (*k, v.as_str())));
        assert_eq!(parsed, query);

        let fallback = ListQuery::from_params([("page", "zero"), ("genre", "x"), ("tab", "?")]);
        assert_eq!(fallback, ListQuery::default());
    }

    #[test]
    fn page_is_clamped_into_range() {
        assert_eq!(clamp_page(0, 10), 1);
        assert_eq!(clamp_page(12, 10), 10);
        assert_eq!(clamp_page(3, 0), 1);
    }

    #[test]
    fn window_spans_two_pages_each_side() {
        let window = page_window(6, 20);
        assert_eq!(window.pages, vec![4, 5, 6, 7, 8]);
        assert!(window.first_shortcut());
        assert!(window.leading_gap());
        assert!(window.last_shortcut());
        assert!(window.trailing_gap());

        let start = page_window(1, 3);
        assert_eq!(start.pages, vec![1, 2, 3]);
        assert!(!start.has_previous());
        assert!(start.has_next());
        assert!(!start.first_shortcut());
        assert!(!start.last_shortcut());

        let near_start = page_window(4, 9);
        assert_eq!(near_start.pages, vec![2, 3, 4, 5, 6]);
        assert!(near_start.first_shortcut());
        assert!(!near_start.leading_gap());

        assert!(page_window(1, 1).pages.is_empty());
    }

    #[tokio::test]
    async fn request_hits_exactly_one_endpoint() {
        let fake = FakeCatalog::default();
        let query = ListQuery::new(MediaKind::Movie, ListTab::NowPlaying).with_page(2);
        let page = query.resolve().execute(&fake).await.unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(fake.calls("list_by_category"), 1);
        assert_eq!(fake.calls("list_by_genre"), 0);
        assert_eq!(fake.list_requests(), vec!["/movie/now_playing?page=2"]);
    }
}
