use chrono::NaiveDate;
use movies_core::{Actor, Movie, Studio};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn new_entities_are_transient() {
    let movie = Movie::new("Pulp Fiction", date(1994, 10, 14));
    let actor = Actor::new("Bruce", "Willis");
    let studio = Studio::new("Miramax");

    assert!(!movie.is_persisted());
    assert!(!actor.is_persisted());
    assert!(!studio.is_persisted());
    assert!(movie.studio.is_none());
    assert!(movie.actors.is_empty());
    assert!(studio.movies.is_empty());
}

#[test]
fn equality_is_by_identity_only() {
    let mut matrix = Movie::new("Matrix", date(1999, 3, 31));
    matrix.id = Some(7);
    let mut renamed = Movie::undated("Something else");
    renamed.id = Some(7);
    let mut other = Movie::new("Matrix", date(1999, 3, 31));
    other.id = Some(8);

    assert_eq!(matrix, renamed);
    assert_ne!(matrix, other);
}

#[test]
fn unsaved_entities_only_equal_themselves() {
    let first = Actor::new("Bruce", "Willis");
    let twin = first.clone();
    let same = &first;

    assert_eq!(first, *same);
    assert_ne!(first, twin);

    let mut saved = first.clone();
    saved.id = Some(1);
    assert_ne!(first, saved);
}

#[test]
fn hash_is_constant_across_field_changes() {
    let mut studio = Studio::new("Sony");
    let before = hash_of(&studio);
    studio.id = Some(3);
    studio.name = "Columbia".to_string();

    assert_eq!(hash_of(&studio), before);
    assert_eq!(hash_of(&Actor::new("A", "B")), hash_of(&Actor::new("C", "D")));
}

#[test]
fn plays_role_chains_and_skips_identity_duplicates() {
    let mut bruce = Actor::new("Bruce", "Willis");
    bruce.id = Some(1);
    let mut travolta = Actor::new("John", "Travolta");
    travolta.id = Some(2);

    let mut movie = Movie::new("Pulp Fiction", date(1994, 10, 14));
    movie
        .plays_role(bruce.clone())
        .plays_role(travolta)
        .plays_role(bruce);

    assert_eq!(movie.actors.len(), 2);
}

#[test]
fn plays_role_keeps_distinct_transient_actors() {
    let mut movie = Movie::new("Pulp Fiction", date(1994, 10, 14));
    movie
        .plays_role(Actor::new("Bruce", "Willis"))
        .plays_role(Actor::new("Bruce", "Willis"));

    assert_eq!(movie.actors.len(), 2);
}

#[test]
fn produced_updates_both_sides() {
    let mut studio = Studio::new("Sony");
    studio.id = Some(5);
    studio
        .produced(Movie::new("Matrix", date(1999, 3, 31)))
        .produced(Movie::new("Fight Club", date(1999, 10, 15)));

    assert_eq!(studio.movies.len(), 2);
    for movie in &studio.movies {
        let back_ref = movie.studio.as_ref().unwrap();
        assert_eq!(back_ref, &studio);
        assert_eq!(back_ref.name, "Sony");
        assert!(back_ref.movies.is_empty());
    }
}

#[test]
fn with_studio_sets_owning_side_only() {
    let mut studio = Studio::new("Sony");
    studio.id = Some(9);
    let movie = Movie::new("Die Hard", date(1988, 7, 15)).with_studio(&studio);

    assert_eq!(movie.studio.as_ref(), Some(&studio));
    assert!(studio.movies.is_empty());
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let mut actor = Actor::new("Bruce", "Willis");
    actor.id = Some(11);
    let mut studio = Studio::new("Sony");
    studio.id = Some(3);
    let mut movie = Movie::new("Die Hard", date(1988, 7, 15)).with_studio(&studio);
    movie.id = Some(21);
    movie.plays_role(actor);

    let json = serde_json::to_value(&movie).unwrap();
    assert_eq!(json["id"], 21);
    assert_eq!(json["title"], "Die Hard");
    assert_eq!(json["release_date"], "1988-07-15");
    assert_eq!(json["studio"]["id"], 3);
    assert_eq!(json["studio"]["name"], "Sony");
    assert_eq!(json["actors"][0]["first_name"], "Bruce");
    assert_eq!(json["actors"][0]["last_name"], "Willis");

    let decoded: Movie = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, movie);
    assert_eq!(decoded.release_date, Some(date(1988, 7, 15)));
}
