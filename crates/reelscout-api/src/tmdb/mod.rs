//! TMDB API client module.
//!
//! Fetches paged media lists, detail records, credits and genres from
//! TMDB v3 and normalises list entries into [`MediaItem`]s.

mod api;
mod client;
mod feed;
mod image;
mod media;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{MAX_PAGE, TmdbClient, TmdbClientBuilder};
pub use feed::{Discover, Feed, MovieList, SearchFeed, TimeWindow, TrendingScope, TvList};
pub use image::{IMAGE_BASE_URL, ImageSize, image_url};
pub use media::{MediaItem, MediaKey, MediaType, Route, TMDB_WEB_BASE_URL};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    RawMediaResult, TmdbCastCredit, TmdbCredits, TmdbCrewCredit, TmdbEpisode, TmdbGenre,
    TmdbMovieDetails, TmdbPage, TmdbPersonDetails, TmdbSeasonSummary, TmdbTvDetails,
    TmdbTvSeason,
};
