//! Tests for the deterministic fixture generators.

use std::collections::HashSet;

use conduit_bench::fixtures::{rand_string, seed_articles, SimpleRng};

#[test]
fn rng_is_deterministic() {
    let mut a = SimpleRng::new(42);
    let mut b = SimpleRng::new(42);
    for _ in 0..100 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn zero_seed_still_advances() {
    let mut rng = SimpleRng::new(0);
    assert_ne!(rng.next_u64(), 0);
}

#[test]
fn next_below_stays_in_range() {
    let mut rng = SimpleRng::new(7);
    assert_eq!(rng.next_below(0), 0);
    for _ in 0..1000 {
        assert!(rng.next_below(6) < 6);
    }
}

#[test]
fn rand_string_is_alphanumeric_of_requested_length() {
    for len in [0, 1, 16, 200] {
        let s = rand_string(len);
        assert_eq!(s.len(), len);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

#[test]
fn seeded_strings_repeat() {
    assert_eq!(SimpleRng::new(9).string(32), SimpleRng::new(9).string(32));
    assert_ne!(SimpleRng::new(9).string(32), SimpleRng::new(10).string(32));
}

#[test]
fn seed_articles_have_unique_titles_and_tags() {
    let articles = seed_articles(&mut SimpleRng::new(3), 50);
    assert_eq!(articles.len(), 50);

    let titles: HashSet<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles.len(), 50);

    for article in &articles {
        assert!(!article.tags.is_empty() && article.tags.len() <= 2);
        assert!(article.title.len() >= 4);
    }
}
