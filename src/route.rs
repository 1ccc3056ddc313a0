use reqwest::Url;

use crate::list_query::ListQuery;
use crate::media::{MediaKey, MediaKind};

const LOCATION_BASE: &str = "movieflix://app/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    List(ListQuery),
    Search { query: String },
    Detail(MediaKey),
}

impl Route {
    pub fn to_location(&self) -> String {
        match self {
            Route::Home => String::from("/"),
            Route::List(query) => with_query("/list", &query.to_params()),
            Route::Search { query } if query.trim().is_empty() => String::from("/search"),
            Route::Search { query } => with_query("/search", &[("q", query.clone())]),
            Route::Detail(key) => format!("/detail/{}/{}", key.kind, key.id),
        }
    }

    pub fn parse(location: &str) -> Option<Route> {
        let base = Url::parse(LOCATION_BASE).ok()?;
        let url = base.join(location).ok()?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["list"] => Some(Route::List(ListQuery::from_params(
                pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ))),
            ["search"] => Some(Route::Search {
                query: pairs
                    .into_iter()
                    .find(|(k, _)| k == "q")
                    .map(|(_, v)| v)
                    .unwrap_or_default(),
            }),
            ["detail", kind, id] => {
                let kind = MediaKind::parse(kind)?;
                let id = id.parse().ok()?;
                Some(Route::Detail(MediaKey::new(kind, id)))
            }
            _ => None,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Route::Home => String::from("Home"),
            Route::List(query) => format!("{} {}", query.kind.badge(), query.tab.label()),
            Route::Search { .. } => String::from("Search"),
            Route::Detail(key) => format!("{} {}", key.kind.badge(), key.id),
        }
    }
}

fn with_query(path: &str, params: &[(&str, String)]) -> String {
    let mut url = match Url::parse(LOCATION_BASE).and_then(|base| base.join(path)) {
        Ok(url) => url,
        Err(_) => return path.to_string(),
    };
    url.query_pairs_mut()
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
    match url.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

/// Back/forward stack of visited routes.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: vec![Route::Home],
            index: 0,
        }
    }
}

impl History {
    pub fn current(&self) -> &Route {
        &self.entries[self.index]
    }

    /// Visiting drops any forward entries; revisiting the current route is a no-op.
    pub fn push(&mut self, route: Route) -> bool {
        if *self.current() == route {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(route);
        self.index = self.entries.len() - 1;
        true
    }

    /// Swaps the current entry in place, as typing into the search box does.
    pub fn replace(&mut self, route: Route) {
        self.entries[self.index] = route;
    }

    pub fn back(&mut self) -> Option<&Route> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Route> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_query::ListTab;

    #[test]
    fn locations_round_trip() {
        let routes = [
            Route::Home,
            Route::List(
                ListQuery::new(MediaKind::Tv, ListTab::TopRated)
                    .toggle_genre(18)
                    .with_page(3),
            ),
            Route::Search {
                query: String::from("the dark knight & co"),
            },
            Route::Detail(MediaKey::tv(1399)),
        ];
        for route in routes {
            let location = route.to_location();
            assert_eq!(Route::parse(&location), Some(route), "{location}");
        }
    }

    #[test]
    fn list_location_uses_query_keys() {
        let route = Route::List(ListQuery::new(MediaKind::Movie, ListTab::Upcoming).toggle_genre(28));
        assert_eq!(
            route.to_location(),
            "/list?type=movie&tab=upcoming&genre=28&page=1"
        );
    }

    #[test]
    fn bad_locations_are_rejected() {
        assert_eq!(Route::parse("/detail/person/5"), None);
        assert_eq!(Route::parse("/detail/movie/abc"), None);
        assert_eq!(Route::parse("/settings"), None);
        assert_eq!(
            Route::parse("/search"),
            Some(Route::Search {
                query: String::new()
            })
        );
    }

    #[test]
    fn history_walks_back_and_forward() {
        let mut history = History::default();
        let list = Route::List(ListQuery::new(MediaKind::Movie, ListTab::TopRated).with_page(2));
        let detail = Route::Detail(MediaKey::movie(550));

        assert!(history.push(list.clone()));
        assert!(history.push(detail.clone()));
        assert!(!history.push(detail.clone()));

        assert_eq!(history.back(), Some(&list));
        assert!(history.can_go_forward());
        assert_eq!(history.forward(), Some(&detail));
        assert_eq!(history.forward(), None);

        history.back();
        history.push(Route::Home);
        assert!(!history.can_go_forward());
        assert_eq!(history.back(), Some(&list));
    }
}
