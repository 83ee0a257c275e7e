//! Stats command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_stats(config: &Config, limit: Option<&str>) -> anyhow::Result<()> {
    let limit = config.analytics.resolve_top_limit(limit);
    let state = SharedState::new(config.clone()).await?;
    let analytics = &state.analytics_service;

    let overview = analytics.overview().await?;
    println!("Catalog");
    println!("{:-<50}", "");
    println!("  Movies:         {}", overview.total_movies);
    println!("  Reviews:        {}", overview.total_reviews);
    println!("  Users:          {}", overview.total_users);
    println!("  Average rating: {:.1}", overview.average_rating);
    println!();

    println!("Ratings");
    println!("{:-<50}", "");
    for bucket in analytics.rating_distribution().await? {
        println!("  {:<8} {:>5}", bucket.name, bucket.value);
    }
    println!();

    let top = analytics.top_movies(limit).await?;
    if top.is_empty() {
        println!("No reviewed movies yet.");
        return Ok(());
    }

    println!("Top {} movies", top.len());
    println!("{:-<50}", "");
    for (rank, entry) in top.iter().enumerate() {
        println!(
            "{:>3}. {} ({:.1}, {} reviews)",
            rank + 1,
            entry.movie.title,
            entry.average_rating,
            entry.total_reviews
        );
    }

    Ok(())
}
