//! List feeds: the filter keys of every paginated screen.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use super::media::MediaType;

/// Movie category lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieList {
    /// `movie/popular`.
    Popular,
    /// `movie/top_rated`.
    TopRated,
    /// `movie/now_playing`.
    NowPlaying,
    /// `movie/upcoming`.
    Upcoming,
}

impl MovieList {
    const fn as_path(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
            Self::NowPlaying => "now_playing",
            Self::Upcoming => "upcoming",
        }
    }
}

/// TV category lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvList {
    /// `tv/popular`.
    Popular,
    /// `tv/top_rated`.
    TopRated,
    /// `tv/on_the_air`.
    OnTheAir,
    /// `tv/airing_today`.
    AiringToday,
}

impl TvList {
    const fn as_path(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
            Self::OnTheAir => "on_the_air",
            Self::AiringToday => "airing_today",
        }
    }
}

/// Media restriction of a trending feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendingScope {
    /// Mixed movies, shows and people.
    All,
    /// A single media type.
    Only(MediaType),
}

/// Trending time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    Week,
}

impl TimeWindow {
    const fn as_path(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// Discover query (`discover/movie`, `discover/tv`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Discover {
    /// Movie or TV show. People cannot be discovered.
    pub media_type: MediaType,
    /// Sort order, e.g. `popularity.desc`.
    pub sort_by: String,
    /// Restrict to a genre ID.
    pub genre: Option<u32>,
}

impl Discover {
    /// Default sort order.
    pub const DEFAULT_SORT: &'static str = "popularity.desc";

    /// Creates a discover query sorted by popularity.
    ///
    /// # Errors
    ///
    /// Returns an error for [`MediaType::Person`].
    pub fn new(media_type: MediaType) -> Result<Self> {
        if media_type == MediaType::Person {
            bail!("discover supports movie and tv only");
        }
        Ok(Self {
            media_type,
            sort_by: String::from(Self::DEFAULT_SORT),
            genre: None,
        })
    }

    /// Sets the sort order.
    #[must_use]
    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    /// Sets the genre filter.
    #[must_use]
    pub const fn genre(mut self, genre: u32) -> Self {
        self.genre = Some(genre);
        self
    }
}

/// Paged search (`search/multi` or a single media type).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchFeed {
    /// Query text.
    pub query: String,
    /// Restrict to one media type; `None` searches all.
    pub media_type: Option<MediaType>,
}

/// Filter key of a paginated list screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feed {
    /// Movie category list.
    Movies(MovieList),
    /// TV category list.
    TvShows(TvList),
    /// Popular people.
    People,
    /// Trending list.
    Trending(TrendingScope, TimeWindow),
    /// Discover with sort/genre filters.
    Discover(Discover),
    /// Paged search results.
    Search(SearchFeed),
}

impl Feed {
    /// API path relative to the v3 base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Movies(list) => format!("movie/{}", list.as_path()),
            Self::TvShows(list) => format!("tv/{}", list.as_path()),
            Self::People => String::from("person/popular"),
            Self::Trending(scope, window) => {
                let scope = match scope {
                    TrendingScope::All => "all",
                    TrendingScope::Only(media) => media.as_path(),
                };
                format!("trending/{scope}/{}", window.as_path())
            }
            Self::Discover(d) => format!("discover/{}", d.media_type.as_path()),
            Self::Search(s) => format!(
                "search/{}",
                s.media_type.map_or("multi", MediaType::as_path)
            ),
        }
    }

    /// Extra query parameters beyond `page`, `language` and `include_adult`.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Discover(d) => {
                let mut params = vec![("sort_by", d.sort_by.clone())];
                if let Some(genre) = d.genre {
                    params.push(("with_genres", genre.to_string()));
                }
                params
            }
            Self::Search(s) => vec![("query", s.query.clone())],
            Self::Movies(_)
            | Self::TvShows(_)
            | Self::People
            | Self::Trending(..) => Vec::new(),
        }
    }

    /// Media type stamped on results that carry no `media_type` field.
    ///
    /// `None` for mixed feeds, where every result is tagged by the API.
    #[must_use]
    pub const fn default_media_type(&self) -> Option<MediaType> {
        match self {
            Self::Movies(_) => Some(MediaType::Movie),
            Self::TvShows(_) => Some(MediaType::TvShow),
            Self::People => Some(MediaType::Person),
            Self::Trending(TrendingScope::Only(media), _) => Some(*media),
            Self::Trending(TrendingScope::All, _) => None,
            Self::Discover(d) => Some(d.media_type),
            Self::Search(s) => s.media_type,
        }
    }

    /// Short tab label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Movies(list) => format!("Movies: {}", humanize(list.as_path())),
            Self::TvShows(list) => format!("TV: {}", humanize(list.as_path())),
            Self::People => String::from("People"),
            Self::Trending(scope, window) => {
                let scope = match scope {
                    TrendingScope::All => "All",
                    TrendingScope::Only(media) => media.label(),
                };
                format!("Trending {scope} ({})", window.as_path())
            }
            Self::Discover(d) => format!("Discover {}", d.media_type.label()),
            Self::Search(s) => format!("Search: {}", s.query),
        }
    }
}

/// `top_rated` -> `Top rated`.
fn humanize(segment: &str) -> String {
    let text = segment.replace('_', " ");
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Feed {
    type Err = anyhow::Error;

    /// Parses the path form: `movie/popular`, `tv/on_the_air`, `person/popular`,
    /// `trending/all/week`, `discover/movie`.
    ///
    /// Search feeds carry free text and are built directly instead.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().trim_matches('/').split('/').collect();
        let feed = match parts.as_slice() {
            [media, list] if media.parse::<MediaType>().ok() == Some(MediaType::Movie) => {
                Self::Movies(match *list {
                    "popular" => MovieList::Popular,
                    "top_rated" => MovieList::TopRated,
                    "now_playing" => MovieList::NowPlaying,
                    "upcoming" => MovieList::Upcoming,
                    other => bail!("unknown movie list: {other}"),
                })
            }
            [media, list] if media.parse::<MediaType>().ok() == Some(MediaType::TvShow) => {
                Self::TvShows(match *list {
                    "popular" => TvList::Popular,
                    "top_rated" => TvList::TopRated,
                    "on_the_air" => TvList::OnTheAir,
                    "airing_today" => TvList::AiringToday,
                    other => bail!("unknown tv list: {other}"),
                })
            }
            [media] | [media, "popular"]
                if media.parse::<MediaType>().ok() == Some(MediaType::Person) =>
            {
                Self::People
            }
            ["trending", scope, window] => {
                let scope = if *scope == "all" {
                    TrendingScope::All
                } else {
                    TrendingScope::Only(scope.parse().context("invalid trending scope")?)
                };
                let window = match *window {
                    "day" => TimeWindow::Day,
                    "week" => TimeWindow::Week,
                    other => bail!("unknown trending window: {other}"),
                };
                Self::Trending(scope, window)
            }
            ["discover", media] => Self::Discover(Discover::new(media.parse()?)?),
            _ => bail!("unknown feed: {s}"),
        };
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_category_feeds() {
        // Arrange & Act & Assert
        assert_eq!(
            "movie/popular".parse::<Feed>().unwrap(),
            Feed::Movies(MovieList::Popular)
        );
        assert_eq!(
            "movies/top_rated".parse::<Feed>().unwrap(),
            Feed::Movies(MovieList::TopRated)
        );
        assert_eq!(
            "tv-shows/on_the_air".parse::<Feed>().unwrap(),
            Feed::TvShows(TvList::OnTheAir)
        );
        assert_eq!("people".parse::<Feed>().unwrap(), Feed::People);
        assert_eq!("person/popular".parse::<Feed>().unwrap(), Feed::People);
    }

    #[test]
    fn test_parse_trending_and_discover() {
        // Arrange & Act
        let trending: Feed = "trending/tv/day".parse().unwrap();
        let discover: Feed = "discover/movie".parse().unwrap();

        // Assert
        assert_eq!(
            trending,
            Feed::Trending(TrendingScope::Only(MediaType::TvShow), TimeWindow::Day)
        );
        assert_eq!(discover.path(), "discover/movie");
        assert_eq!(
            discover.query_params(),
            vec![("sort_by", String::from("popularity.desc"))]
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        // Arrange & Act & Assert
        assert!("movie/latest".parse::<Feed>().is_err());
        assert!("discover/person".parse::<Feed>().is_err());
        assert!("nonsense".parse::<Feed>().is_err());
    }

    #[test]
    fn test_display_round_trips_path() {
        // Arrange
        let feeds = ["movie/now_playing", "tv/airing_today", "person/popular", "trending/all/week"];

        // Act & Assert
        for path in feeds {
            assert_eq!(path.parse::<Feed>().unwrap().to_string(), path);
        }
    }

    #[test]
    fn test_default_media_type() {
        // Arrange & Act & Assert
        assert_eq!(Feed::People.default_media_type(), Some(MediaType::Person));
        assert_eq!(
            Feed::Trending(TrendingScope::All, TimeWindow::Week).default_media_type(),
            None
        );
        let search = Feed::Search(SearchFeed {
            query: String::from("alien"),
            media_type: None,
        });
        assert_eq!(search.default_media_type(), None);
        assert_eq!(search.path(), "search/multi");
    }

    #[test]
    fn test_discover_with_genre_params() {
        // Arrange
        let feed = Feed::Discover(
            Discover::new(MediaType::TvShow)
                .unwrap()
                .sort_by("vote_average.desc")
                .genre(16),
        );

        // Act
        let params = feed.query_params();

        // Assert
        assert_eq!(params.len(), 2);
        assert!(params.contains(&("with_genres", String::from("16"))));
        assert_eq!(feed.label(), "Discover TV");
    }

    #[test]
    fn test_labels() {
        // Arrange & Act & Assert
        assert_eq!(Feed::Movies(MovieList::TopRated).label(), "Movies: Top rated");
        assert_eq!(
            Feed::Trending(TrendingScope::All, TimeWindow::Day).label(),
            "Trending All (day)"
        );
    }
}
