use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::MovieId;

/// A catalog entry as stored, without any derived rating data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,

    pub title: String,

    pub description: String,

    pub genre: Option<String>,

    pub director: String,

    pub release_date: NaiveDate,

    /// Poster URL.
    pub image_url: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

/// Body of `POST /movies`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub genre: String,

    #[serde(default)]
    pub director: String,

    pub release_date: NaiveDate,

    pub image_url: Option<String>,
}

/// Body of `PUT /movies/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieUpdate {
    pub title: Option<String>,

    pub description: Option<String>,

    pub genre: Option<String>,

    pub director: Option<String>,

    pub release_date: Option<NaiveDate>,

    pub image_url: Option<String>,
}

/// The slice of a movie embedded in review responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieRef {
    pub id: MovieId,
    pub title: String,
}

impl From<&Movie> for MovieRef {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_movie_reads_camel_case() {
        let json = r#"{
            "title": "Whiplash",
            "description": "Drums.",
            "genre": "Drama",
            "director": "Damien Chazelle",
            "releaseDate": "2014-10-15",
            "imageUrl": "https://example.com/whiplash.jpg"
        }"#;

        let movie: NewMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(2014, 10, 15).unwrap());
        assert_eq!(movie.image_url.as_deref(), Some("https://example.com/whiplash.jpg"));
    }

    #[test]
    fn movie_serializes_camel_case() {
        let movie = Movie {
            id: MovieId::new(3),
            title: "Get Out".to_string(),
            description: String::new(),
            genre: Some("Horror".to_string()),
            director: "Jordan Peele".to_string(),
            release_date: NaiveDate::from_ymd_opt(2017, 2, 24).unwrap(),
            image_url: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["releaseDate"], "2017-02-24");
        assert!(value["imageUrl"].is_null());
        assert!(value.get("created_at").is_none());
    }
}
