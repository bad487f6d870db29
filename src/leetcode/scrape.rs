//! Fills in title, number and difficulty from a LeetCode problem page.

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::leetcode::{dto::ScrapeResponse, repo_types::Difficulty};

lazy_static! {
    static ref PROBLEM_URL: Regex =
        Regex::new(r"^https?://(?:www\.)?leetcode\.com/problems/([a-z0-9-]+)(?:[/?#].*)?$")
            .unwrap();
    static ref TITLE_TAG: Regex = Regex::new(r"(?s)<title>\s*(.*?)\s*</title>").unwrap();
    static ref QUESTION_TITLE: Regex = Regex::new(r#""questionTitle"\s*:\s*"([^"]+)""#).unwrap();
    static ref QUESTION_ID: Regex =
        Regex::new(r#""questionFrontendId"\s*:\s*"(\d+)""#).unwrap();
    static ref NUMBERED_TITLE: Regex = Regex::new(r"^(\d+)\.\s*(.+)$").unwrap();
    static ref DIFFICULTY: Regex =
        Regex::new(r#""difficulty"\s*:\s*"(Easy|Medium|Hard)""#).unwrap();
}

/// Problem slug of a `leetcode.com/problems/{slug}` URL.
pub fn problem_slug(url: &str) -> Option<&str> {
    PROBLEM_URL
        .captures(url.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `two-sum` -> `Two Sum`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts what it can from the page; `None` when not even a title is present.
pub fn parse_problem_page(html: &str) -> Option<ScrapeResponse> {
    let mut number = QUESTION_ID
        .captures(html)
        .and_then(|c| c[1].parse::<i32>().ok());

    let mut title = QUESTION_TITLE.captures(html).map(|c| c[1].to_string());
    if title.is_none() {
        // "1. Two Sum - LeetCode"
        let raw = TITLE_TAG.captures(html)?[1].to_string();
        let raw = raw.trim_end_matches("- LeetCode").trim().to_string();
        if let Some(c) = NUMBERED_TITLE.captures(&raw) {
            number = number.or_else(|| c[1].parse().ok());
            title = Some(c[2].trim().to_string());
        } else if !raw.is_empty() {
            title = Some(raw);
        }
    }

    let difficulty = DIFFICULTY
        .captures(html)
        .and_then(|c| Difficulty::parse(&c[1]))
        .unwrap_or_default();

    Some(ScrapeResponse {
        title: title?,
        number,
        difficulty,
        warning: None,
    })
}

fn fallback(slug: &str, reason: &str) -> ScrapeResponse {
    ScrapeResponse {
        title: title_from_slug(slug),
        number: None,
        difficulty: Difficulty::Medium,
        warning: Some(format!(
            "Could not read the problem page ({reason}); title guessed from the URL"
        )),
    }
}

/// Fetches the page behind `url`. Network or parse failures degrade to a
/// slug-derived guess instead of an error; only non-problem URLs are rejected.
pub async fn scrape_problem(
    http: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> ApiResult<ScrapeResponse> {
    let slug = problem_slug(url)
        .ok_or_else(|| ApiError::validation("url must be a leetcode.com/problems/... link"))?;

    let html = match fetch(http, url.trim(), timeout).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, %slug, "leetcode fetch failed");
            return Ok(fallback(slug, "fetch failed"));
        }
    };

    match parse_problem_page(&html) {
        Some(found) => Ok(found),
        None => {
            warn!(%slug, "leetcode page had no recognisable title");
            Ok(fallback(slug, "unrecognised page"))
        }
    }
}

async fn fetch(http: &reqwest::Client, url: &str, timeout: Duration) -> reqwest::Result<String> {
    http.get(url)
        .header(reqwest::header::USER_AGENT, "Mozilla/5.0 (portfolio scraper)")
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}
