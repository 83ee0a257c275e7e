//! Seed command handler
//!
//! Fills an empty catalog with a handful of well-known movies, sample users
//! and randomly rated reviews. Existing users are reused; movies are only
//! inserted when the catalog is empty.

use anyhow::Context;
use chrono::NaiveDate;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::Config;
use crate::db::Store;
use crate::domain::Role;
use crate::models::movie::NewMovie;

const SAMPLE_PASSWORD: &str = "password123";

const SAMPLE_MOVIES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "The Dark Knight",
        "When the menace known as the Joker wreaks havoc on Gotham, Batman must accept one of the greatest tests of his ability to fight injustice.",
        "Action",
        "Christopher Nolan",
        "2008-07-18",
    ),
    (
        "Inception",
        "A skilled thief is given a chance at redemption if he can plant an idea in a target's subconscious.",
        "Sci-Fi",
        "Christopher Nolan",
        "2010-07-16",
    ),
    (
        "The Shawshank Redemption",
        "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
        "Drama",
        "Frank Darabont",
        "1994-09-23",
    ),
    (
        "Pulp Fiction",
        "The lives of two mob hitmen, a boxer, a gangster and his wife, and a pair of diner bandits intertwine in four tales of violence and redemption.",
        "Crime",
        "Quentin Tarantino",
        "1994-10-14",
    ),
    (
        "The Matrix",
        "A computer hacker learns from mysterious rebels about the true nature of his reality.",
        "Sci-Fi",
        "The Wachowskis",
        "1999-03-31",
    ),
    (
        "Forrest Gump",
        "Decades of American history unfold through the perspective of an Alabama man with an IQ of 75.",
        "Drama",
        "Robert Zemeckis",
        "1994-07-06",
    ),
    (
        "The Godfather",
        "The aging patriarch of an organized crime dynasty transfers control of his empire to his reluctant son.",
        "Crime",
        "Francis Ford Coppola",
        "1972-03-24",
    ),
    (
        "Interstellar",
        "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.",
        "Sci-Fi",
        "Christopher Nolan",
        "2014-11-07",
    ),
    (
        "Parasite",
        "Greed and class discrimination threaten the relationship between the wealthy Park family and the destitute Kim clan.",
        "Thriller",
        "Bong Joon-ho",
        "2019-05-30",
    ),
    (
        "The Lion King",
        "Lion prince Simba and his father are targeted by his bitter uncle, who wants to ascend the throne himself.",
        "Animation",
        "Roger Allers",
        "1994-06-24",
    ),
];

const SAMPLE_USERS: &[(&str, &str)] = &[
    ("John Doe", "john@example.com"),
    ("Jane Smith", "jane@example.com"),
    ("Mike Johnson", "mike@example.com"),
    ("Sarah Williams", "sarah@example.com"),
    ("David Brown", "david@example.com"),
    ("Emily Davis", "emily@example.com"),
];

const SAMPLE_COMMENTS: &[&str] = &[
    "Absolutely fantastic! One of the best movies I've ever seen.",
    "Great storyline and amazing performances by the cast.",
    "Good movie but could have been better in some parts.",
    "Not my favorite, but still worth watching.",
    "The plot was engaging and kept me on the edge of my seat.",
    "Overrated in my opinion, but still decent.",
    "One of the classics that never gets old.",
    "The ending was unexpected and brilliant!",
];

/// A review to insert, by index into the seeded users and movies.
struct PlannedReview {
    movie: usize,
    user: usize,
    rating: i32,
    comment: &'static str,
}

/// Each movie gets 3 to 6 reviews from random users. Collisions on the same
/// user are skipped at insert time by the unique index.
fn plan_reviews(movie_count: usize, user_count: usize) -> Vec<PlannedReview> {
    let mut rng = rand::rng();
    let users: Vec<usize> = (0..user_count).collect();
    let mut planned = Vec::new();

    for movie in 0..movie_count {
        let count = rng.random_range(3..=6);
        for _ in 0..count {
            let (Some(&user), Some(&comment)) =
                (users.choose(&mut rng), SAMPLE_COMMENTS.choose(&mut rng))
            else {
                continue;
            };
            planned.push(PlannedReview {
                movie,
                user,
                rating: rng.random_range(1..=5),
                comment,
            });
        }
    }

    planned
}

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    println!("Creating users...");
    let mut users = Vec::with_capacity(SAMPLE_USERS.len());
    for (name, email) in SAMPLE_USERS {
        let user = match store.get_user_by_email(email).await? {
            Some(user) => user,
            None => {
                store
                    .create_user(name, email, SAMPLE_PASSWORD, Role::User, &config.security)
                    .await?
            }
        };
        users.push(user);
    }
    println!("  {} users available", users.len());

    if store.count_movies().await? > 0 {
        println!("Catalog already has movies, skipping movies and reviews.");
        return Ok(());
    }

    println!("Creating movies...");
    let mut movies = Vec::with_capacity(SAMPLE_MOVIES.len());
    for (title, description, genre, director, released) in SAMPLE_MOVIES {
        let release_date = NaiveDate::parse_from_str(released, "%Y-%m-%d")
            .with_context(|| format!("Invalid release date for {title}"))?;
        let movie = store
            .add_movie(NewMovie {
                title: (*title).to_string(),
                description: (*description).to_string(),
                genre: (*genre).to_string(),
                director: (*director).to_string(),
                release_date,
                image_url: None,
            })
            .await?;
        movies.push(movie);
    }
    println!("  {} movies created", movies.len());

    println!("Creating reviews...");
    let mut created = 0;
    for review in plan_reviews(movies.len(), users.len()) {
        let inserted = store
            .add_review(
                movies[review.movie].id,
                users[review.user].id,
                review.rating,
                review.comment,
            )
            .await?;
        if inserted.is_some() {
            created += 1;
        }
    }
    println!("  {created} reviews created");

    println!();
    println!("Database seeded. Sample users log in with '{SAMPLE_PASSWORD}'.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MAX_RATING, MIN_RATING};

    #[test]
    fn test_plan_reviews_stays_in_bounds() {
        let planned = plan_reviews(4, 3);
        assert!(planned.len() >= 12 && planned.len() <= 24);
        for review in &planned {
            assert!(review.movie < 4);
            assert!(review.user < 3);
            assert!((MIN_RATING..=MAX_RATING).contains(&review.rating));
        }
    }

    #[test]
    fn test_plan_reviews_without_users_is_empty() {
        assert!(plan_reviews(3, 0).is_empty());
    }

    #[test]
    fn test_sample_dates_parse() {
        for (_, _, _, _, released) in SAMPLE_MOVIES {
            assert!(NaiveDate::parse_from_str(released, "%Y-%m-%d").is_ok());
        }
    }
}
