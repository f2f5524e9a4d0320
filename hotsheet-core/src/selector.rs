//! Picks the posts that are still featured.

use chrono::{DateTime, Utc};

use crate::models::{CategoryFilter, FeaturedLink, Post};

/// Select the posts to list in the widget.
///
/// A post qualifies when it has a `feature_until` timestamp that is at or
/// after `now` (whole seconds, inclusive) and it passes `filter`. Qualifying
/// posts come back ordered by `feature_until` ascending. Posts sharing a
/// timestamp keep their input order.
///
/// The input order is never trusted, even when the host already sorted it.
pub fn select(posts: &[Post], filter: CategoryFilter, now: DateTime<Utc>) -> Vec<FeaturedLink> {
    let now = now.timestamp();

    let mut qualifying: Vec<(i64, &Post)> = posts
        .iter()
        .filter_map(|post| {
            let until = post.feature_until?.timestamp();
            (until >= now && filter.matches(&post.categories)).then_some((until, post))
        })
        .collect();

    // sort_by_key is stable
    qualifying.sort_by_key(|(until, _)| *until);

    qualifying
        .into_iter()
        .map(|(_, post)| FeaturedLink {
            title: post.title.clone(),
            url: post.url.clone(),
        })
        .collect()
}
