//! Normalised media records shared by every list.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate};

use super::types::RawMediaResult;

/// Base URL of the TMDB website (used for "open in browser").
pub const TMDB_WEB_BASE_URL: &str = "https://www.themoviedb.org";

/// Closed set of media categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaType {
    /// Feature film.
    Movie,
    /// TV series.
    TvShow,
    /// Cast or crew member.
    Person,
}

impl MediaType {
    /// All media types in display order.
    pub const ALL: [Self; 3] = [Self::Movie, Self::TvShow, Self::Person];

    /// TMDB path segment (`movie`, `tv`, `person`).
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::TvShow => "tv",
            Self::Person => "person",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::TvShow => "TV",
            Self::Person => "Person",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    /// Accepts the TMDB segment and the common plural/hyphenated spellings.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" | "film" | "films" => Ok(Self::Movie),
            "tv" | "tv-show" | "tv-shows" | "tv_show" | "tv_shows" | "tvshow" | "show"
            | "shows" => Ok(Self::TvShow),
            "person" | "people" | "persons" => Ok(Self::Person),
            other => bail!("unknown media type: {other}"),
        }
    }
}

/// Identity of a media record across mixed lists.
///
/// Movies and TV shows share the numeric id space, so the type is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaKey {
    /// Media category.
    pub media_type: MediaType,
    /// TMDB id within that category.
    pub id: u64,
}

/// Target of a detail view. The core never navigates; it only describes where to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    /// Media category.
    pub media_type: MediaType,
    /// TMDB id.
    pub id: u64,
}

impl Route {
    /// Creates a route.
    #[must_use]
    pub const fn new(media_type: MediaType, id: u64) -> Self {
        Self { media_type, id }
    }

    /// Detail route path, e.g. `/movie/550`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}/{}", self.media_type.as_path(), self.id)
    }

    /// TMDB website URL for this record.
    #[must_use]
    pub fn web_url(&self) -> String {
        format!("{TMDB_WEB_BASE_URL}{}", self.path())
    }
}

/// A list entry normalised from any TMDB list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    /// Media category (resolved at the fetch boundary).
    pub media_type: MediaType,
    /// TMDB id.
    pub id: u64,
    /// Display title (`title` for movies, `name` otherwise).
    pub title: String,
    /// Original-language title, if different data was supplied.
    pub original_title: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date or first air date (YYYY-MM-DD).
    pub date: Option<String>,
    /// Poster path (movies, shows) or profile path (people).
    pub image_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Vote average (absent for people).
    pub vote_average: Option<f64>,
    /// Popularity score.
    pub popularity: f64,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
    /// Department a person is known for.
    pub known_for_department: Option<String>,
}

impl MediaItem {
    /// Normalises a raw result.
    ///
    /// `fallback` is used when the payload carries no `media_type` field
    /// (category endpoints). Returns `None` for media types outside
    /// [`MediaType`] or records without any title.
    #[must_use]
    pub fn from_raw(raw: RawMediaResult, fallback: Option<MediaType>) -> Option<Self> {
        let media_type = match raw.media_type.as_deref() {
            Some(tag) => tag.parse().ok()?,
            None => fallback?,
        };

        let (title, original_title) = match media_type {
            MediaType::Movie => (raw.title.or(raw.name)?, raw.original_title),
            MediaType::TvShow | MediaType::Person => {
                (raw.name.or(raw.title)?, raw.original_name)
            }
        };

        let date = match media_type {
            MediaType::Movie => raw.release_date,
            MediaType::TvShow => raw.first_air_date,
            MediaType::Person => None,
        }
        .filter(|d| !d.is_empty());

        Some(Self {
            media_type,
            id: raw.id,
            title,
            original_title: original_title.filter(|t| !t.is_empty()),
            overview: raw.overview.filter(|o| !o.is_empty()),
            date,
            image_path: raw.poster_path.or(raw.profile_path),
            backdrop_path: raw.backdrop_path,
            vote_average: raw.vote_average,
            popularity: raw.popularity.unwrap_or_default(),
            genre_ids: raw.genre_ids,
            known_for_department: raw.known_for_department,
        })
    }

    /// Identity key used for deduplication.
    #[must_use]
    pub const fn key(&self) -> MediaKey {
        MediaKey {
            media_type: self.media_type,
            id: self.id,
        }
    }

    /// Detail route for this item.
    #[must_use]
    pub const fn route(&self) -> Route {
        Route::new(self.media_type, self.id)
    }

    /// Release / first-air year, if the date parses.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}
