//! API endpoints.

mod announcements;
mod auth;
mod catalog;
mod comments;
mod events;
mod hierarchy;
mod meetings;
mod members;
mod prayers;
mod stories;
mod testimonies;
mod uploads;

use axum::Router;
use serde::Deserialize;

use crate::middleware::AppState;

/// Filters shared by the feed-like listings.
///
/// Values arrive as raw strings so that `?rede_id=` or `?rede_id=abc` fall
/// back to "no filter" instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Network filter.
    pub rede_id: Option<String>,
    /// Generation filter.
    pub geracao_id: Option<String>,
    /// Author filter.
    pub autor_id: Option<String>,
    /// Cell filter.
    pub celula_id: Option<String>,
}

impl FeedQuery {
    /// Parsed network filter.
    #[must_use]
    pub fn network_id(&self) -> Option<i32> {
        lenient_id(self.rede_id.as_deref())
    }

    /// Parsed generation filter.
    #[must_use]
    pub fn generation_id(&self) -> Option<i32> {
        lenient_id(self.geracao_id.as_deref())
    }

    /// Parsed author filter.
    #[must_use]
    pub fn author_id(&self) -> Option<i32> {
        lenient_id(self.autor_id.as_deref())
    }

    /// Parsed cell filter.
    #[must_use]
    pub fn cell_id(&self) -> Option<i32> {
        lenient_id(self.celula_id.as_deref())
    }
}

/// Parse an optional query id, ignoring blanks and garbage.
fn lenient_id(raw: Option<&str>) -> Option<i32> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(hierarchy::router())
        .merge(announcements::router())
        .merge(prayers::router())
        .merge(testimonies::router())
        .merge(meetings::router())
        .merge(catalog::router())
        .merge(uploads::router())
        .nest("/membros", members::router())
        .nest("/eventos", events::router())
        .nest("/comentarios", comments::router())
        .nest("/stories", stories::router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_id() {
        assert_eq!(lenient_id(Some("3")), Some(3));
        assert_eq!(lenient_id(Some(" 42 ")), Some(42));
        assert_eq!(lenient_id(Some("")), None);
        assert_eq!(lenient_id(Some("abc")), None);
        assert_eq!(lenient_id(None), None);
    }

    #[test]
    fn test_feed_query_filters() {
        let query = FeedQuery {
            rede_id: Some("1".to_string()),
            geracao_id: Some("x".to_string()),
            autor_id: None,
            celula_id: Some("9".to_string()),
        };

        assert_eq!(query.network_id(), Some(1));
        assert_eq!(query.generation_id(), None);
        assert_eq!(query.author_id(), None);
        assert_eq!(query.cell_id(), Some(9));
    }
}
