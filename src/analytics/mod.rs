//! Rating aggregation and catalog analytics.
//!
//! Every function here is a pure transformation over record snapshots that
//! were loaded beforehand. Nothing is cached: an aggregate exists only for
//! the duration of the response that carries it.
//!
//! Rounding uses [`f64::round`], which rounds half away from zero. Means are
//! never negative, so this matches half-up rounding for every input.

pub mod listing;

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{MAX_RATING, MIN_RATING, MovieId};
use crate::models::movie::Movie;
use crate::models::review::Review;

/// Number of entries returned by [`top_rated`] when the caller gives no limit.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Label used for movies without a genre.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Anything carrying a star rating.
pub trait Rated {
    fn rating(&self) -> i32;
}

impl Rated for i32 {
    fn rating(&self) -> i32 {
        *self
    }
}

impl Rated for Review {
    fn rating(&self) -> i32 {
        self.rating
    }
}

impl<T: Rated + ?Sized> Rated for &T {
    fn rating(&self) -> i32 {
        (**self).rating()
    }
}

/// Mean rating and review count for one movie (or for the whole corpus).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: usize,
}

/// A movie together with its derived rating summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub average_rating: f64,
    pub total_reviews: usize,
}

impl RatedMovie {
    #[must_use]
    pub fn new(movie: Movie, summary: RatingSummary) -> Self {
        Self {
            movie,
            average_rating: summary.average_rating,
            total_reviews: summary.total_reviews,
        }
    }
}

/// One bar of the rating histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingBucket {
    pub name: String,
    pub value: usize,
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub name: String,
    pub count: usize,
}

/// Rounds to one decimal place: multiply by ten, round, divide by ten.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes the mean rating (one decimal) and count of `reviews`.
///
/// An empty slice yields a mean of `0.0` and a count of `0`.
///
/// ```
/// use reelrate::analytics::aggregate;
///
/// let summary = aggregate(&[1, 2]);
/// assert_eq!(summary.average_rating, 1.5);
/// assert_eq!(summary.total_reviews, 2);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate<R: Rated>(reviews: &[R]) -> RatingSummary {
    if reviews.is_empty() {
        return RatingSummary::default();
    }

    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating())).sum();
    let count = reviews.len();

    RatingSummary {
        average_rating: round_to_tenth(sum as f64 / count as f64),
        total_reviews: count,
    }
}

/// Joins `movies` with `reviews` and computes a summary for every movie,
/// keeping the input movie order. Movies without reviews get `(0.0, 0)`.
#[must_use]
pub fn summarize_by_movie(movies: &[Movie], reviews: &[Review]) -> Vec<RatedMovie> {
    let mut by_movie: HashMap<MovieId, Vec<&Review>> = HashMap::new();
    for review in reviews {
        by_movie.entry(review.movie_id).or_default().push(review);
    }

    movies
        .iter()
        .map(|movie| {
            let summary = by_movie
                .get(&movie.id)
                .map_or_else(RatingSummary::default, |rs| aggregate(rs));
            RatedMovie::new(movie.clone(), summary)
        })
        .collect()
}

/// Ranks reviewed movies by mean rating, then by review count.
///
/// Movies without reviews are dropped. The sort is stable, so movies tied on
/// both keys keep their relative input order. At most `limit` entries are
/// returned.
#[must_use]
pub fn top_rated(movies: &[Movie], reviews: &[Review], limit: usize) -> Vec<RatedMovie> {
    let mut ranked: Vec<RatedMovie> = summarize_by_movie(movies, reviews)
        .into_iter()
        .filter(|m| m.total_reviews > 0)
        .collect();

    ranked.sort_by(|a, b| {
        b.average_rating
            .total_cmp(&a.average_rating)
            .then_with(|| b.total_reviews.cmp(&a.total_reviews))
    });
    ranked.truncate(limit);
    ranked
}

/// Counts reviews per star value. All five buckets are always present,
/// ordered from one star to five. Ratings outside `1..=5` are ignored.
#[must_use]
pub fn rating_distribution<R: Rated>(reviews: &[R]) -> [RatingBucket; 5] {
    let mut counts = [0usize; 5];

    for review in reviews {
        let rating = review.rating();
        if (MIN_RATING..=MAX_RATING).contains(&rating)
            && let Ok(idx) = usize::try_from(rating - MIN_RATING)
        {
            counts[idx] += 1;
        }
    }

    std::array::from_fn(|idx| {
        let rating = MIN_RATING + i32::try_from(idx).unwrap_or_default();
        RatingBucket {
            name: star_label(rating),
            value: counts[idx],
            rating,
        }
    })
}

fn star_label(rating: i32) -> String {
    if rating == 1 {
        "1 Star".to_string()
    } else {
        format!("{rating} Stars")
    }
}

/// Genre label used for grouping; a missing or blank genre counts as
/// [`UNKNOWN_GENRE`].
#[must_use]
pub fn genre_label(genre: Option<&str>) -> &str {
    match genre {
        Some(g) if !g.is_empty() => g,
        _ => UNKNOWN_GENRE,
    }
}

/// Counts movies per genre, most common first.
///
/// Genres with equal counts keep the order in which they were first seen.
/// Callers should not rely on that order.
#[must_use]
pub fn genre_counts(movies: &[Movie]) -> Vec<GenreCount> {
    let mut counts: Vec<GenreCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for movie in movies {
        let label = genre_label(movie.genre.as_deref());
        match index.get(label) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                index.insert(label, counts.len());
                counts.push(GenreCount {
                    name: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
