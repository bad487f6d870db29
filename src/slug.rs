//! URL slugs derived from titles, and collision-free slug allocation.

use std::future::Future;

use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;

use crate::db::{StoreError, StoreResult};

/// Upper bound on write attempts when concurrent writers keep taking our candidate.
const MAX_SLUG_ATTEMPTS: usize = 16;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Lowercases `title`, collapses every run of non-alphanumeric characters into a
/// single hyphen and trims hyphens from both ends. May return an empty string.
pub fn generate_slug(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Slug for `title`, or `{prefix}-{epoch-ms}` when the title has nothing usable.
pub fn base_slug(title: &str, prefix: &str) -> String {
    let slug = generate_slug(title);
    if slug.is_empty() {
        let ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        format!("{prefix}-{ms}")
    } else {
        slug
    }
}

/// True when `slug` came from the blank-title fallback of [`base_slug`],
/// with or without a `-n` suffix.
pub fn is_fallback(slug: &str, prefix: &str) -> bool {
    slug.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|rest| rest.split('-').next())
        .is_some_and(|ms| ms.len() >= 13 && ms.bytes().all(|b| b.is_ascii_digit()))
}

/// First of `base`, `base-1`, `base-2`, ... not present in `taken`.
pub fn next_available(base: &str, taken: &[String]) -> String {
    let is_taken = |candidate: &str| taken.iter().any(|s| s == candidate);
    if !is_taken(base) {
        return base.to_string();
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}-{n}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Writes a record under the smallest free slug derived from `base`.
///
/// `taken` is the store's view of slugs already in use. A unique-index conflict
/// from `write` marks that candidate as taken and the next one is tried.
pub async fn write_with_unique_slug<T, F, Fut>(
    base: &str,
    mut taken: Vec<String>,
    mut write: F,
) -> StoreResult<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    let mut last_err = None;
    for _ in 0..MAX_SLUG_ATTEMPTS {
        let candidate = next_available(base, &taken);
        match write(candidate.clone()).await {
            Err(StoreError::Conflict { constraint }) => {
                tracing::debug!(slug = %candidate, %constraint, "slug taken concurrently, retrying");
                taken.push(candidate);
                last_err = Some(StoreError::Conflict { constraint });
            }
            other => return other,
        }
    }
    Err(last_err.unwrap_or(StoreError::Conflict {
        constraint: "slug".into(),
    }))
}

/// Matches `base` itself or `base-<digits>`.
pub fn is_derived_from(slug: &str, base: &str) -> bool {
    slug == base
        || slug
            .strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}
