//! Image URL resolution against the TMDB image host.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

/// Default image host template prefix.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Fixed width buckets served by the image host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    /// 92px wide.
    W92,
    /// 154px wide.
    W154,
    /// 185px wide (posters in lists, profiles).
    W185,
    /// 342px wide.
    W342,
    /// 500px wide (detail posters).
    W500,
    /// 780px wide (backdrops).
    W780,
    /// 632px high (large profiles).
    H632,
    /// Source resolution.
    Original,
}

impl ImageSize {
    /// URL segment for this bucket.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W92 => "w92",
            Self::W154 => "w154",
            Self::W185 => "w185",
            Self::W342 => "w342",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::H632 => "h632",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "w92" => Self::W92,
            "w154" => Self::W154,
            "w185" => Self::W185,
            "w342" => Self::W342,
            "w500" => Self::W500,
            "w780" => Self::W780,
            "h632" => Self::H632,
            "original" => Self::Original,
            other => bail!("unknown image size: {other}"),
        })
    }
}

/// Resolves a relative image path (e.g. `/abc.jpg`) to a full URL.
///
/// Returns `None` for missing or empty paths so callers can fall back.
#[must_use]
pub fn image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    let path = path.strip_prefix('/').unwrap_or(path);
    Some(format!("{IMAGE_BASE_URL}{size}/{path}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_image_url_with_leading_slash() {
        // Arrange & Act
        let url = image_url(Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"), ImageSize::W500);

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
        );
    }

    #[test]
    fn test_image_url_without_leading_slash() {
        // Arrange & Act
        let url = image_url(Some("abc.png"), ImageSize::Original);

        // Assert
        assert_eq!(url.as_deref(), Some("https://image.tmdb.org/t/p/original/abc.png"));
    }

    #[test]
    fn test_image_url_missing_path() {
        // Arrange & Act & Assert
        assert!(image_url(None, ImageSize::W185).is_none());
        assert!(image_url(Some("  "), ImageSize::W185).is_none());
    }

    #[test]
    fn test_image_size_parse() {
        // Arrange & Act & Assert
        assert_eq!("h632".parse::<ImageSize>().unwrap(), ImageSize::H632);
        assert!("w1000".parse::<ImageSize>().is_err());
    }
}
