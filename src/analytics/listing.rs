//! Server-side search, filtering and ordering for the movie list.

use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;
use std::str::FromStr;

use super::RatedMovie;

/// Sort orders accepted by `GET /movies?sort=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovieSort {
    /// Repository order, which is newest first.
    #[default]
    #[serde(alias = "date-newest")]
    Newest,
    DateOldest,
    RatingHigh,
    RatingLow,
    TitleAsc,
    TitleDesc,
    ReleaseNewest,
    ReleaseOldest,
    ReviewsMost,
    ReviewsLeast,
}

/// Minimum-rating filter (`4+` .. `1+`) or `no-rating` for unreviewed movies.
///
/// The `+` is optional: an unescaped `+` in a query string decodes to a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum RatingFilter {
    AtLeast(u8),
    Unrated,
}

impl RatingFilter {
    #[must_use]
    pub fn matches(&self, average_rating: f64) -> bool {
        match self {
            Self::AtLeast(min) => average_rating >= f64::from(*min),
            Self::Unrated => average_rating == 0.0,
        }
    }
}

impl FromStr for RatingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "no-rating" => Ok(Self::Unrated),
            other => other
                .strip_suffix('+')
                .unwrap_or(other)
                .parse::<u8>()
                .ok()
                .filter(|n| (1..=4).contains(n))
                .map(Self::AtLeast)
                .ok_or_else(|| format!("invalid rating filter: {other}")),
        }
    }
}

impl TryFrom<String> for RatingFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// `all` and an empty value mean no rating filter.
fn deserialize_rating_filter<'de, D>(deserializer: D) -> Result<Option<RatingFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("" | "all") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Query parameters for the movie list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieFilter {
    /// Case-insensitive substring of title or director.
    pub search: Option<String>,
    /// Exact genre; `all` disables the filter.
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "deserialize_rating_filter")]
    pub rating: Option<RatingFilter>,
    #[serde(default)]
    pub sort: MovieSort,
}

impl MovieFilter {
    fn accepts(&self, entry: &RatedMovie) -> bool {
        if let Some(query) = self.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let in_title = entry.movie.title.to_lowercase().contains(&query);
            let in_director = entry.movie.director.to_lowercase().contains(&query);
            if !in_title && !in_director {
                return false;
            }
        }

        if let Some(genre) = self
            .genre
            .as_deref()
            .filter(|g| !g.is_empty() && *g != "all")
            && entry.movie.genre.as_deref() != Some(genre)
        {
            return false;
        }

        self.rating
            .is_none_or(|filter| filter.matches(entry.average_rating))
    }
}

/// Applies `filter` to `movies` and orders the survivors.
///
/// All orderings are stable; `created_at` values are RFC 3339 UTC strings, so
/// comparing them lexically compares the instants.
#[must_use]
pub fn apply(movies: Vec<RatedMovie>, filter: &MovieFilter) -> Vec<RatedMovie> {
    let mut out: Vec<RatedMovie> = movies.into_iter().filter(|m| filter.accepts(m)).collect();

    match filter.sort {
        MovieSort::Newest => {}
        MovieSort::DateOldest => out.sort_by(|a, b| a.movie.created_at.cmp(&b.movie.created_at)),
        MovieSort::RatingHigh => out.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating)),
        MovieSort::RatingLow => out.sort_by(|a, b| a.average_rating.total_cmp(&b.average_rating)),
        MovieSort::TitleAsc => out.sort_by(title_cmp),
        MovieSort::TitleDesc => out.sort_by(|a, b| title_cmp(b, a)),
        MovieSort::ReleaseNewest => {
            out.sort_by(|a, b| b.movie.release_date.cmp(&a.movie.release_date));
        }
        MovieSort::ReleaseOldest => {
            out.sort_by(|a, b| a.movie.release_date.cmp(&b.movie.release_date));
        }
        MovieSort::ReviewsMost => out.sort_by(|a, b| b.total_reviews.cmp(&a.total_reviews)),
        MovieSort::ReviewsLeast => out.sort_by(|a, b| a.total_reviews.cmp(&b.total_reviews)),
    }

    out
}

fn title_cmp(a: &RatedMovie, b: &RatedMovie) -> Ordering {
    a.movie
        .title
        .to_lowercase()
        .cmp(&b.movie.title.to_lowercase())
        .then_with(|| a.movie.title.cmp(&b.movie.title))
}

/// Distinct non-empty genres, sorted alphabetically.
#[must_use]
pub fn distinct_genres(movies: &[RatedMovie]) -> Vec<String> {
    let mut genres: Vec<String> = movies
        .iter()
        .filter_map(|m| m.movie.genre.clone())
        .filter(|g| !g.is_empty())
        .collect();
    genres.sort();
    genres.dedup();
    genres
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::summarize_by_movie;
    use crate::analytics::tests::{movie, review};

    fn catalog() -> Vec<RatedMovie> {
        let mut dark = movie(1, "The Dark Knight", Some("Action"));
        dark.director = "Christopher Nolan".to_string();
        let mut inception = movie(2, "Inception", Some("Sci-Fi"));
        inception.director = "Christopher Nolan".to_string();
        let mut gump = movie(3, "Forrest Gump", Some("Drama"));
        gump.release_date = chrono::NaiveDate::from_ymd_opt(1994, 7, 6).unwrap();

        let reviews = vec![
            review(1, 1, 1, 5),
            review(2, 1, 2, 4),
            review(3, 2, 1, 3),
        ];
        summarize_by_movie(&[dark, inception, gump], &reviews)
    }

    fn titles(movies: &[RatedMovie]) -> Vec<&str> {
        movies.iter().map(|m| m.movie.title.as_str()).collect()
    }

    #[test]
    fn default_filter_keeps_order() {
        let out = apply(catalog(), &MovieFilter::default());
        assert_eq!(
            titles(&out),
            vec!["The Dark Knight", "Inception", "Forrest Gump"]
        );
    }

    #[test]
    fn search_matches_title_or_director() {
        let filter = MovieFilter {
            search: Some("nolan".to_string()),
            ..Default::default()
        };
        assert_eq!(
            titles(&apply(catalog(), &filter)),
            vec!["The Dark Knight", "Inception"]
        );

        let filter = MovieFilter {
            search: Some("GUMP".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&apply(catalog(), &filter)), vec!["Forrest Gump"]);
    }

    #[test]
    fn genre_filter_and_all() {
        let filter = MovieFilter {
            genre: Some("Drama".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&apply(catalog(), &filter)), vec!["Forrest Gump"]);

        let filter = MovieFilter {
            genre: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(apply(catalog(), &filter).len(), 3);
    }

    #[test]
    fn rating_filters() {
        let filter = MovieFilter {
            rating: Some(RatingFilter::AtLeast(4)),
            ..Default::default()
        };
        assert_eq!(titles(&apply(catalog(), &filter)), vec!["The Dark Knight"]);

        let filter = MovieFilter {
            rating: Some(RatingFilter::Unrated),
            ..Default::default()
        };
        assert_eq!(titles(&apply(catalog(), &filter)), vec!["Forrest Gump"]);
    }

    #[test]
    fn parses_rating_filters() {
        assert_eq!("3+".parse::<RatingFilter>(), Ok(RatingFilter::AtLeast(3)));
        assert_eq!("no-rating".parse::<RatingFilter>(), Ok(RatingFilter::Unrated));
        assert_eq!("2 ".parse::<RatingFilter>(), Ok(RatingFilter::AtLeast(2)));
        assert!("5+".parse::<RatingFilter>().is_err());
        assert!("abc".parse::<RatingFilter>().is_err());
    }

    #[test]
    fn rating_all_and_empty_mean_no_filter() {
        let parse = |json: &str| serde_json::from_str::<MovieFilter>(json).unwrap().rating;

        assert_eq!(parse(r#"{"rating":"all"}"#), None);
        assert_eq!(parse(r#"{"rating":""}"#), None);
        assert_eq!(parse("{}"), None);
        assert_eq!(parse(r#"{"rating":"3+"}"#), Some(RatingFilter::AtLeast(3)));
        assert!(serde_json::from_str::<MovieFilter>(r#"{"rating":"best"}"#).is_err());
    }

    #[test]
    fn sort_orders() {
        let by = |sort| {
            let filter = MovieFilter {
                sort,
                ..Default::default()
            };
            apply(catalog(), &filter)
                .into_iter()
                .map(|m| m.movie.title)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            by(MovieSort::RatingHigh),
            vec!["The Dark Knight", "Inception", "Forrest Gump"]
        );
        assert_eq!(
            by(MovieSort::TitleAsc),
            vec!["Forrest Gump", "Inception", "The Dark Knight"]
        );
        assert_eq!(
            by(MovieSort::ReleaseOldest)[0],
            "Forrest Gump".to_string()
        );
        assert_eq!(
            by(MovieSort::ReviewsLeast),
            vec!["Forrest Gump", "Inception", "The Dark Knight"]
        );
        assert_eq!(
            by(MovieSort::DateOldest),
            vec!["The Dark Knight", "Inception", "Forrest Gump"]
        );
    }

    #[test]
    fn sort_deserializes_from_query_values() {
        let filter: MovieFilter =
            serde_json::from_str(r#"{"sort":"reviews-most","rating":"2+"}"#).unwrap();
        assert_eq!(filter.sort, MovieSort::ReviewsMost);
        assert_eq!(filter.rating, Some(RatingFilter::AtLeast(2)));

        let filter: MovieFilter = serde_json::from_str(r#"{"sort":"date-newest"}"#).unwrap();
        assert_eq!(filter.sort, MovieSort::Newest);
    }

    #[test]
    fn genres_are_distinct_and_sorted() {
        assert_eq!(
            distinct_genres(&catalog()),
            vec!["Action", "Drama", "Sci-Fi"]
        );
    }
}
