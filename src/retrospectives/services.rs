use time::Month;
use tracing::info;
use uuid::Uuid;

use crate::content::assemble_content;
use crate::error::{ApiError, ApiResult};
use crate::forms::non_blank;
use crate::retrospectives::{
    dto::{RetrospectiveRequest, RetrospectiveSections, SectionItem},
    repo::RetrospectiveStore,
    repo_types::{NewRetrospectivePost, RetrospectivePost},
};

const ENTITY: &str = "Retrospective";

/// Accepts `3`, `"3"`, `"March"` or `"mar"`.
pub fn parse_month(raw: &serde_json::Value) -> Option<Month> {
    let from_number = |n: u64| u8::try_from(n).ok().and_then(|n| Month::try_from(n).ok());
    match raw {
        serde_json::Value::Number(n) => n.as_u64().and_then(from_number),
        serde_json::Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            if let Ok(n) = s.parse::<u64>() {
                return from_number(n);
            }
            (1..=12u8).filter_map(|n| Month::try_from(n).ok()).find(|m| {
                let name = m.to_string().to_ascii_lowercase();
                s == name || (s.len() == 3 && name.starts_with(&s))
            })
        }
        _ => None,
    }
}

fn title_for(req: &RetrospectiveRequest) -> ApiResult<String> {
    if let Some(title) = non_blank(req.title.clone()) {
        return Ok(title);
    }
    let month = req.month.as_ref().and_then(parse_month);
    match (month, req.year) {
        (Some(month), Some(year)) if year > 0 => Ok(format!("{month} {year} Retrospective")),
        _ => Err(ApiError::validation(
            "title, or a valid month and year, is required",
        )),
    }
}

/// `- text` bullets, each followed by its image when there is one.
fn render_items(items: &[SectionItem]) -> String {
    items
        .iter()
        .filter_map(|item| {
            let text = non_blank(item.text.clone())?;
            Some(match non_blank(item.image_url.clone()) {
                Some(url) => format!("- {text}\n\n  ![{text}]({url})"),
                None => format!("- {text}"),
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section_content(sections: &RetrospectiveSections) -> String {
    let text = |s: &Option<String>| s.clone().unwrap_or_default();
    let pairs = [
        ("Achievements", render_items(&sections.achievements)),
        ("Challenges", render_items(&sections.challenges)),
        ("Key Learnings", text(&sections.learnings)),
        ("Areas for Improvement", text(&sections.improvements)),
        ("Goals for Next Month", text(&sections.goals)),
        ("Reflection", text(&sections.reflection)),
    ];
    assemble_content(pairs.iter().map(|(h, t)| (*h, t.as_str())))
}

/// `stored_thumbnail` is kept when the payload has no `thumbnail` key.
pub fn validate(
    req: RetrospectiveRequest,
    stored_thumbnail: Option<String>,
) -> ApiResult<NewRetrospectivePost> {
    let title = title_for(&req)?;

    let content = match non_blank(req.content) {
        Some(content) => content,
        None => req.sections.as_ref().map(section_content).unwrap_or_default(),
    };
    if content.is_empty() {
        return Err(ApiError::validation("content is required"));
    }

    let thumbnail = match req.thumbnail {
        Some(sent) => non_blank(sent),
        None => stored_thumbnail,
    };

    Ok(NewRetrospectivePost {
        title,
        content,
        tags: req.tags,
        thumbnail,
    })
}

pub async fn list_posts(store: &dyn RetrospectiveStore) -> ApiResult<Vec<RetrospectivePost>> {
    Ok(store.list().await?)
}

pub async fn get_post(store: &dyn RetrospectiveStore, id: Uuid) -> ApiResult<RetrospectivePost> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(ENTITY))
}

pub async fn create_post(
    store: &dyn RetrospectiveStore,
    req: RetrospectiveRequest,
) -> ApiResult<RetrospectivePost> {
    let record = validate(req, None)?;
    let post = store.insert(&record).await?;
    info!(post_id = %post.id, title = %post.title, "retrospective created");
    Ok(post)
}

pub async fn update_post(
    store: &dyn RetrospectiveStore,
    id: Uuid,
    req: RetrospectiveRequest,
) -> ApiResult<RetrospectivePost> {
    let existing = get_post(store, id).await?;
    let record = validate(req, existing.thumbnail)?;
    let post = store
        .update(id, &record)
        .await?
        .ok_or_else(|| ApiError::not_found(ENTITY))?;
    info!(post_id = %post.id, "retrospective updated");
    Ok(post)
}

pub async fn delete_post(store: &dyn RetrospectiveStore, id: Uuid) -> ApiResult<()> {
    if !store.delete(id).await? {
        return Err(ApiError::not_found(ENTITY));
    }
    info!(post_id = %id, "retrospective deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrospectives::repo::MemoryRetrospectiveStore;
    use serde_json::json;

    fn request() -> RetrospectiveRequest {
        RetrospectiveRequest {
            month: Some(json!(3)),
            year: Some(2024),
            content: Some("notes".into()),
            ..Default::default()
        }
    }

    #[test]
    fn months_from_numbers_and_names() {
        assert_eq!(parse_month(&json!(1)), Some(Month::January));
        assert_eq!(parse_month(&json!("12")), Some(Month::December));
        assert_eq!(parse_month(&json!("march")), Some(Month::March));
        assert_eq!(parse_month(&json!(" Sep ")), Some(Month::September));
        assert_eq!(parse_month(&json!(13)), None);
        assert_eq!(parse_month(&json!(0)), None);
        assert_eq!(parse_month(&json!("Smarch")), None);
        assert_eq!(parse_month(&json!(null)), None);
    }

    #[test]
    fn title_derived_from_month_and_year() {
        assert_eq!(validate(request(), None).unwrap().title, "March 2024 Retrospective");

        let explicit = RetrospectiveRequest {
            title: Some("Spring review".into()),
            ..request()
        };
        assert_eq!(validate(explicit, None).unwrap().title, "Spring review");

        let missing_year = RetrospectiveRequest {
            year: None,
            ..request()
        };
        assert!(matches!(validate(missing_year, None), Err(ApiError::Validation(_))));
    }

    #[test]
    fn sections_render_bullets_and_images() {
        let req = RetrospectiveRequest {
            content: None,
            sections: Some(RetrospectiveSections {
                achievements: vec![
                    SectionItem {
                        text: Some("Shipped v2".into()),
                        image_url: Some("/uploads/v2.png".into()),
                    },
                    SectionItem {
                        text: Some("Wrote tests".into()),
                        image_url: None,
                    },
                    SectionItem::default(),
                ],
                reflection: Some("Good month".into()),
                ..Default::default()
            }),
            ..request()
        };
        let content = validate(req, None).unwrap().content;
        assert_eq!(
            content,
            "## Achievements\n\n- Shipped v2\n\n  ![Shipped v2](/uploads/v2.png)\n- Wrote tests\n\n## Reflection\n\nGood month"
        );
        assert!(!content.contains("## Challenges"));
    }

    #[test]
    fn empty_sections_are_rejected() {
        let req = RetrospectiveRequest {
            content: None,
            sections: Some(RetrospectiveSections::default()),
            ..request()
        };
        assert!(matches!(validate(req, None), Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn thumbnail_only_changes_when_sent() {
        let store = MemoryRetrospectiveStore::default();
        let created = create_post(
            &store,
            RetrospectiveRequest {
                thumbnail: Some(Some("/uploads/t.png".into())),
                ..request()
            },
        )
        .await
        .unwrap();
        assert_eq!(created.thumbnail.as_deref(), Some("/uploads/t.png"));

        let kept = update_post(&store, created.id, request()).await.unwrap();
        assert_eq!(kept.thumbnail.as_deref(), Some("/uploads/t.png"));

        let cleared = update_post(
            &store,
            created.id,
            RetrospectiveRequest {
                thumbnail: Some(None),
                ..request()
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.thumbnail, None);
    }

    #[tokio::test]
    async fn missing_posts_are_not_found() {
        let store = MemoryRetrospectiveStore::default();
        let id = Uuid::new_v4();
        assert!(matches!(update_post(&store, id, request()).await, Err(ApiError::NotFound(_))));
        assert!(matches!(delete_post(&store, id).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryRetrospectiveStore::default();
        let a = create_post(&store, request()).await.unwrap();
        let b = create_post(&store, request()).await.unwrap();
        let ids: Vec<_> = list_posts(&store).await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn get_of_unknown_id_is_not_found() {
        let store = MemoryRetrospectiveStore::default();
        create_post(&store, request()).await.unwrap();
        let missing = get_post(&store, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }
}
