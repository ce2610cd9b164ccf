//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::feed::Feed;
use super::media::{MediaItem, MediaType};
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    RawMediaResult, TmdbCredits, TmdbErrorResponse, TmdbGenre, TmdbGenreList, TmdbMovieDetails,
    TmdbPage, TmdbPersonDetails, TmdbTvDetails, TmdbTvSeason,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Highest page number TMDB serves for any list endpoint.
pub const MAX_PAGE: u32 = 500;

/// Default maximum number of retries for HTTP 429 responses.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Backoff unit between retries when the server sends no `Retry-After`.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// How the client authenticates.
#[derive(Clone)]
enum Credentials {
    /// v4 read access token, sent as `Authorization: Bearer`.
    Bearer(String),
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

/// TMDB API client.
///
/// Configuration is fixed at build time; share one instance behind `Arc`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Authentication.
    credentials: Credentials,
    /// Response language.
    language: String,
    /// Region filter (ISO 3166-1).
    region: Option<String>,
    /// Include adult content in lists and searches.
    include_adult: bool,
    /// Retries allowed on HTTP 429.
    max_retries: u32,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    credentials: Option<Credentials>,
    user_agent: Option<String>,
    language: Option<String>,
    region: Option<String>,
    include_adult: bool,
    min_interval: Option<Duration>,
    max_retries: Option<u32>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            user_agent: None,
            language: None,
            region: None,
            include_adult: false,
            min_interval: None,
            max_retries: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token. Either this or [`Self::api_key`] is required.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer(token.into()));
        self
    }

    /// Sets the v3 API key. Either this or [`Self::api_token`] is required.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::ApiKey(key.into()));
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the region filter.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Includes adult content (default: false).
    #[must_use]
    pub const fn include_adult(mut self, include: bool) -> Self {
        self.include_adult = include;
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Sets the number of retries on HTTP 429 (default: 3).
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - Neither `api_token` nor `api_key` is set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credentials = self
            .credentials
            .context("api_token or api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credentials,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            region: self.region,
            include_adult: self.include_adult,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Response language sent with every request.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Sends a GET request with auth, language, query params, and rate limiting.
    /// Retries up to `max_retries` times on HTTP 429.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut retries = 0u32;
        loop {
            let mut builder = self
                .http_client
                .get(url.clone())
                .query(&[("language", self.language.as_str())])
                .query(query);
            builder = match &self.credentials {
                Credentials::Bearer(token) => builder.bearer_auth(token),
                Credentials::ApiKey(key) => builder.query(&[("api_key", key.as_str())]),
            };
            let request = builder
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(path, "TMDB API request");

            let result = self.http_client.execute(request).await;
            let response = result.with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > self.max_retries {
                    bail!(
                        "TMDB API rate limit exceeded after {} retries: {path}",
                        self.max_retries
                    );
                }
                let backoff = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map_or_else(
                        || RETRY_BACKOFF.saturating_mul(retries),
                        Duration::from_secs,
                    );
                tracing::warn!(
                    retry = retries,
                    max_retries = self.max_retries,
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    "TMDB API rate limited (429). Retrying..."
                );
                let mut limiter = self.rate_limiter.lock().await;
                limiter.cool_down(backoff);
                limiter.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            let parsed =
                raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
            return Ok(parsed);
        }
    }
}

/// Normalises a raw page, dropping entries outside the known media types.
fn normalize_page(raw: TmdbPage<RawMediaResult>, feed: &Feed) -> TmdbPage<MediaItem> {
    let fallback = feed.default_media_type();
    let fetched = raw.results.len();
    let results: Vec<MediaItem> = raw
        .results
        .into_iter()
        .filter_map(|r| MediaItem::from_raw(r, fallback))
        .collect();

    let skipped = fetched.saturating_sub(results.len());
    if skipped > 0 {
        tracing::debug!(feed = %feed, skipped, "entries with unsupported media type skipped");
    }

    TmdbPage {
        page: raw.page,
        results,
        total_pages: raw.total_pages,
        total_results: raw.total_results,
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all, fields(feed = %feed, page))]
    async fn feed_page(&self, feed: &Feed, page: u32) -> Result<TmdbPage<MediaItem>> {
        if !(1..=MAX_PAGE).contains(&page) {
            bail!("page {page} is outside the TMDB range 1..={MAX_PAGE}");
        }

        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("include_adult", self.include_adult.to_string()),
        ];
        if let Some(ref region) = self.region {
            query.push(("region", region.clone()));
        }
        query.extend(feed.query_params());

        let raw: TmdbPage<RawMediaResult> = self.get_json(&feed.path(), &query).await?;
        Ok(normalize_page(raw, feed))
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails> {
        self.get_json(&format!("movie/{movie_id}"), &[]).await
    }

    #[instrument(skip_all)]
    async fn tv_details(&self, series_id: u64) -> Result<TmdbTvDetails> {
        self.get_json(&format!("tv/{series_id}"), &[]).await
    }

    #[instrument(skip_all)]
    async fn tv_season(&self, series_id: u64, season_number: u32) -> Result<TmdbTvSeason> {
        let path = format!("tv/{series_id}/season/{season_number}");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn person_details(&self, person_id: u64) -> Result<TmdbPersonDetails> {
        self.get_json(&format!("person/{person_id}"), &[]).await
    }

    #[instrument(skip_all)]
    async fn credits(&self, media_type: MediaType, id: u64) -> Result<TmdbCredits> {
        let path = match media_type {
            MediaType::Movie | MediaType::TvShow => {
                format!("{}/{id}/credits", media_type.as_path())
            }
            MediaType::Person => format!("person/{id}/combined_credits"),
        };
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn genres(&self, media_type: MediaType) -> Result<Vec<TmdbGenre>> {
        if media_type == MediaType::Person {
            bail!("genres exist for movie and tv only");
        }
        let path = format!("genre/{}/list", media_type.as_path());
        let list: TmdbGenreList = self.get_json(&path, &[]).await?;
        Ok(list.genres)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::tmdb::feed::{MovieList, SearchFeed, TimeWindow, TrendingScope};

    async fn client_for(mock_server: &wiremock::MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", mock_server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_credentials() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_token or api_key is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_token("test-token").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_key("key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.language(), "en-US");
        assert_eq!(client.max_retries, DEFAULT_MAX_RETRIES);
        assert!(!client.include_adult);
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_debug_masks_credentials() {
        // Arrange
        let client = TmdbClient::builder()
            .api_token("super-secret")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let debug = format!("{client:?}");

        // Assert
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_parse_movie_popular_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_popular_page1.json");

        // Act
        let raw: TmdbPage<RawMediaResult> = serde_json::from_str(json).unwrap();
        let page = normalize_page(raw, &Feed::Movies(MovieList::Popular));

        // Assert
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 10);
        assert_eq!(page.results.len(), 3);
        assert!(page.results.iter().all(|m| m.media_type == MediaType::Movie));
        assert_eq!(page.results[0].title, "Fight Club");
    }

    #[test]
    fn test_normalize_trending_skips_unknown_media_type() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/trending_all_week.json");
        let feed = Feed::Trending(TrendingScope::All, TimeWindow::Week);

        // Act
        let raw: TmdbPage<RawMediaResult> = serde_json::from_str(json).unwrap();
        let page = normalize_page(raw, &feed);

        // Assert: the collection entry is dropped, the rest keep their own type
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].media_type, MediaType::Movie);
        assert_eq!(page.results[1].media_type, MediaType::TvShow);
        assert_eq!(page.results[2].media_type, MediaType::Person);
    }

    #[test]
    fn test_parse_tv_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/tv_details_1399.json");

        // Act
        let details: TmdbTvDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 1399);
        assert_eq!(details.number_of_seasons, 8);
        assert!(!details.seasons.is_empty());
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_feed_page_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_popular_page1.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/popular"))
            .and(wiremock::matchers::query_param("page", "1"))
            .and(wiremock::matchers::query_param("language", "en-US"))
            .and(wiremock::matchers::header_exists("Authorization"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let page = client
            .feed_page(&Feed::Movies(MovieList::Popular), 1)
            .await
            .unwrap();

        // Assert
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.total_pages, 10);
    }

    #[tokio::test]
    async fn test_search_feed_sends_query() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_multi_alien.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/multi"))
            .and(wiremock::matchers::query_param("query", "alien"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let feed = Feed::Search(SearchFeed {
            query: String::from("alien"),
            media_type: None,
        });

        // Act
        let page = client.feed_page(&feed, 1).await.unwrap();

        // Assert
        assert!(!page.results.is_empty());
        assert_eq!(page.results[0].title, "Alien");
    }

    #[tokio::test]
    async fn test_api_key_is_sent_as_query_param() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/empty_page.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::query_param("api_key", "v3-key"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("v3-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap();

        // Act & Assert (mock expect(1) verifies the api_key parameter)
        let page = client.feed_page(&Feed::People, 1).await.unwrap();
        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn test_page_out_of_range_is_refused_locally() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
        let client = client_for(&mock_server).await;

        // Act
        let too_far = client
            .feed_page(&Feed::Movies(MovieList::Popular), MAX_PAGE + 1)
            .await;
        let zero = client.feed_page(&Feed::Movies(MovieList::Popular), 0).await;

        // Assert
        assert!(too_far.unwrap_err().to_string().contains("outside the TMDB range"));
        assert!(zero.is_err());
    }

    #[tokio::test]
    async fn test_movie_details_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_details_550.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/550"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let details = client.movie_details(550).await.unwrap();

        // Assert
        assert_eq!(details.id, 550);
        assert_eq!(details.runtime, Some(139));
        assert_eq!(details.genres.len(), 1);
    }

    #[tokio::test]
    async fn test_person_credits_use_combined_credits() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_credits_550.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/person/287/combined_credits"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act & Assert
        client.credits(MediaType::Person, 287).await.unwrap();
    }

    #[tokio::test]
    async fn test_tv_season_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/tv_season_1399_1.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/1399/season/1"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let season = client.tv_season(1399, 1).await.unwrap();

        // Assert
        assert_eq!(season.season_number, 1);
        assert_eq!(season.episodes.len(), 2);
    }

    #[tokio::test]
    async fn test_genres_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/genre_movie_list.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/genre/movie/list"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let genres = client.genres(MediaType::Movie).await.unwrap();
        let people = client.genres(MediaType::Person).await;

        // Assert
        assert_eq!(genres[0], TmdbGenre { id: 28, name: String::from("Action") });
        assert!(people.is_err());
    }

    #[tokio::test]
    async fn test_http_error_returns_tmdb_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let result = client.feed_page(&Feed::People, 1).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_without_envelope_keeps_body() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let err = client.tv_details(1).await.unwrap_err().to_string();

        // Assert
        assert!(err.contains("503"));
        assert!(err.contains("upstream down"));
    }

    #[tokio::test]
    async fn test_http_429_retries() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(429)
                    .insert_header("Retry-After", "0")
                    .set_body_string(error_body),
            )
            .expect(3)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .max_retries(2)
            .build()
            .unwrap();

        // Act
        let result = client.feed_page(&Feed::People, 1).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_rate_limiter_enforces_interval() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/empty_page.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(2)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        // Act
        let start = std::time::Instant::now();
        client.feed_page(&Feed::People, 1).await.unwrap();
        client.feed_page(&Feed::People, 2).await.unwrap();
        let elapsed = start.elapsed();

        // Assert: at least 100ms interval between two requests
        assert!(elapsed >= Duration::from_millis(100));
    }
}
