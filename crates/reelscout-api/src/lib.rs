//! API client library for reelscout.
//!
//! Provides the TMDB API client and the normalised media model shared by
//! the browse controllers and the CLI.

/// TMDB API client.
pub mod tmdb;
