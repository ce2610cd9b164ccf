//! TMDB-backed data source for the controllers.

use anyhow::Result;
use reelscout_api::tmdb::{
    Feed, MediaItem, MediaKey, MediaType, Route, SearchFeed, TmdbApi, TmdbCredits,
    TmdbMovieDetails, TmdbPersonDetails, TmdbTvDetails,
};
use tracing::instrument;

use crate::list::{Identified, PageResult};
use crate::source::{PageSource, SearchSource};

impl Identified for MediaItem {
    type Id = MediaKey;

    fn id(&self) -> MediaKey {
        self.key()
    }
}

/// Detail record of one route, with its credits.
#[derive(Debug, Clone)]
pub enum MediaDetails {
    /// Movie details and cast/crew.
    Movie {
        /// Detail record.
        details: TmdbMovieDetails,
        /// Cast and crew.
        credits: TmdbCredits,
    },
    /// TV series details and cast/crew.
    TvShow {
        /// Detail record.
        details: TmdbTvDetails,
        /// Cast and crew.
        credits: TmdbCredits,
    },
    /// Person details and combined credits.
    Person {
        /// Detail record.
        details: TmdbPersonDetails,
        /// Works the person appears in.
        credits: TmdbCredits,
    },
}

impl MediaDetails {
    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Movie { details, .. } => &details.title,
            Self::TvShow { details, .. } => &details.name,
            Self::Person { details, .. } => &details.name,
        }
    }

    /// Route of the record.
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::Movie { details, .. } => Route::new(MediaType::Movie, details.id),
            Self::TvShow { details, .. } => Route::new(MediaType::TvShow, details.id),
            Self::Person { details, .. } => Route::new(MediaType::Person, details.id),
        }
    }

    /// Credits of the record.
    #[must_use]
    pub const fn credits(&self) -> &TmdbCredits {
        match self {
            Self::Movie { credits, .. }
            | Self::TvShow { credits, .. }
            | Self::Person { credits, .. } => credits,
        }
    }
}

/// Catalog of TMDB lists, searches and detail records.
#[derive(Debug)]
pub struct TmdbCatalog<A> {
    api: A,
}

impl<A> TmdbCatalog<A> {
    /// Wraps an API client.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Underlying API client.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }
}

impl<A: TmdbApi + Sync> TmdbCatalog<A> {
    /// Fetches the detail record and credits of `route` concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    #[instrument(skip_all, fields(route = %route.path()))]
    pub async fn details(&self, route: Route) -> Result<MediaDetails> {
        let id = route.id;
        let credits = self.api.credits(route.media_type, id);
        Ok(match route.media_type {
            MediaType::Movie => {
                let (details, credits) =
                    futures::try_join!(self.api.movie_details(id), credits)?;
                MediaDetails::Movie { details, credits }
            }
            MediaType::TvShow => {
                let (details, credits) = futures::try_join!(self.api.tv_details(id), credits)?;
                MediaDetails::TvShow { details, credits }
            }
            MediaType::Person => {
                let (details, credits) =
                    futures::try_join!(self.api.person_details(id), credits)?;
                MediaDetails::Person { details, credits }
            }
        })
    }
}

impl<A: TmdbApi + Sync> PageSource<Feed, MediaItem> for TmdbCatalog<A> {
    async fn fetch_page(&self, key: &Feed, page: u32) -> Result<PageResult<MediaItem>> {
        let response = self.api.feed_page(key, page).await?;
        Ok(PageResult {
            items: response.results,
            total_pages: response.total_pages,
            page_number: response.page,
        })
    }
}

impl<A: TmdbApi + Sync> SearchSource<MediaItem> for TmdbCatalog<A> {
    async fn search(&self, query: &str) -> Result<Vec<MediaItem>> {
        let feed = Feed::Search(SearchFeed {
            query: query.to_owned(),
            media_type: None,
        });
        let response = self.api.feed_page(&feed, 1).await?;
        Ok(response.results)
    }
}
