//! Search request encoding.

use url::Url;

use crate::domain::ports::SearchQuery;
use crate::infrastructure::http::with_query;

/// Giphy GIF search endpoint.
pub const GIPHY_SEARCH_ENDPOINT: &str = "https://api.giphy.com/v1/gifs/search";

/// Builds the request URL for one page of results.
#[must_use]
pub fn search_url(endpoint: &Url, api_key: &str, query: &SearchQuery) -> Url {
    let offset = query.offset().to_string();
    let limit = query.limit().to_string();

    with_query(
        endpoint,
        [
            ("api_key", api_key),
            ("q", query.text()),
            ("offset", offset.as_str()),
            ("limit", limit.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test_case("cats", 0, 100 ; "first_page")]
    #[test_case("funny cats & dogs", 300, 25 ; "needs_encoding")]
    #[test_case("", 0, 1 ; "empty_query")]
    #[test_case("ünïcödé?=#", 4_000_000, 50 ; "reserved_and_unicode")]
    fn test_search_url_has_exactly_four_params(text: &str, offset: u32, limit: u32) {
        let endpoint = Url::parse(GIPHY_SEARCH_ENDPOINT).unwrap();
        let query = SearchQuery::new(text, offset, limit).unwrap();

        let url = search_url(&endpoint, "secret-key", &query);

        assert_eq!(url.path(), "/v1/gifs/search");
        assert_eq!(
            pairs(&url),
            vec![
                ("api_key".to_string(), "secret-key".to_string()),
                ("q".to_string(), text.to_string()),
                ("offset".to_string(), offset.to_string()),
                ("limit".to_string(), limit.to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_is_percent_encoded() {
        let endpoint = Url::parse(GIPHY_SEARCH_ENDPOINT).unwrap();
        let query = SearchQuery::new("cats & dogs", 0, 10).unwrap();

        let url = search_url(&endpoint, "k", &query);

        assert_eq!(url.query(), Some("api_key=k&q=cats+%26+dogs&offset=0&limit=10"));
    }
}
