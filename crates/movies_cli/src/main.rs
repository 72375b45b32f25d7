//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise `movies_core` end to end: store bootstrap, cascading saves and
//!   every read use-case.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `movies_cli [DB_PATH]`. Without a path an in-memory store is used.
//! `MOVIES_LOG_DIR` (absolute) enables file logging at `MOVIES_LOG_LEVEL`.

use chrono::NaiveDate;
use movies_core::{
    default_log_level, init_logging, Actor, Movie, MovieService, RepoError, Store, Studio,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("MOVIES_LOG_DIR") {
        let level = std::env::var("MOVIES_LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    let store = match std::env::args().nth(1) {
        Some(path) => Store::open(path)?,
        None => Store::open_in_memory()?,
    };
    let service = MovieService::new(store);
    println!("movies_core version={}", movies_core::core_version());

    let bruce = service.save_actor(&Actor::new("Bruce", "Willis"))?;
    let travolta = service.save_actor(&Actor::new("John", "Travolta"))?;

    let mut pulp_fiction = Movie::new("Pulp Fiction", date(1994, 10, 14)?);
    pulp_fiction.plays_role(bruce.clone()).plays_role(travolta);
    let mut die_hard = Movie::new("Die Hard", date(1988, 7, 15)?);
    die_hard.plays_role(bruce);

    let mut studio = Studio::new("Miramax");
    studio.produced(pulp_fiction).produced(die_hard);
    let studio = service.save_studio(&studio)?;
    println!(
        "saved studio id={:?} movies={}",
        studio.id,
        studio.movies.len()
    );

    println!(
        "released_in_year(1994) count={}",
        service.released_in_year(1994)?.len()
    );
    println!(
        "find_by_at_least_number_of_movies(2) count={}",
        service.find_by_at_least_number_of_movies(2)?.len()
    );
    println!(
        "find_by_studio count={}",
        service.find_by_studio(&studio)?.len()
    );
    println!(
        "find_actor_by_name(Willis) count={}",
        service.find_actor_by_name("Willis")?.len()
    );
    match service.find_all() {
        Err(RepoError::NotImplemented(op)) => println!("{op} not implemented"),
        Err(err) => return Err(err.into()),
        Ok(movies) => println!("find_all count={}", movies.len()),
    }

    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, String> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("invalid date {year}-{month:02}-{day:02}"))
}
