//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::feed::Feed;
use super::media::{MediaItem, MediaType};
use super::types::{
    TmdbCredits, TmdbGenre, TmdbMovieDetails, TmdbPage, TmdbPersonDetails, TmdbTvDetails,
    TmdbTvSeason,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches one page of a feed, normalised to [`MediaItem`]s.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is outside `1..=500`, or the HTTP
    /// request or JSON parsing fails.
    async fn feed_page(&self, feed: &Feed, page: u32) -> Result<TmdbPage<MediaItem>>;

    /// Fetches movie details.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails>;

    /// Fetches TV series details including season list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_details(&self, series_id: u64) -> Result<TmdbTvDetails>;

    /// Fetches TV season details including episode list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_season(&self, series_id: u64, season_number: u32) -> Result<TmdbTvSeason>;

    /// Fetches person details.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn person_details(&self, person_id: u64) -> Result<TmdbPersonDetails>;

    /// Fetches credits: cast/crew of a title, or combined credits of a person.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn credits(&self, media_type: MediaType, id: u64) -> Result<TmdbCredits>;

    /// Fetches the genre list for movies or TV.
    ///
    /// # Errors
    ///
    /// Returns an error for [`MediaType::Person`], or if the HTTP request or
    /// JSON parsing fails.
    async fn genres(&self, media_type: MediaType) -> Result<Vec<TmdbGenre>>;
}
