use tracing::info;
use uuid::Uuid;

use crate::content::assemble_content;
use crate::dsa::{
    dto::{DsaRequest, DsaSections, PracticeQuestionInput},
    repo::DsaStore,
    repo_types::{DsaPost, NewDsaPost, PracticeQuestion},
};
use crate::error::{ApiError, ApiResult};
use crate::forms::{non_blank, require_text};
use crate::slug::{base_slug, generate_slug, write_with_unique_slug};

const ENTITY: &str = "Post";
const DEFAULT_READ_TIME: i32 = 5;

fn section_content(sections: &DsaSections) -> String {
    let text = |s: &Option<String>| s.clone().unwrap_or_default();
    let pairs = [
        ("Introduction", text(&sections.introduction)),
        ("Approach", text(&sections.approach)),
        ("Complexity Analysis", text(&sections.complexity)),
        ("Examples", text(&sections.examples)),
        ("Conclusion", text(&sections.conclusion)),
    ];
    assemble_content(pairs.iter().map(|(h, t)| (*h, t.as_str())))
}

fn practice_question(n: usize, q: PracticeQuestionInput) -> ApiResult<PracticeQuestion> {
    let question = non_blank(q.question)
        .ok_or_else(|| ApiError::validation(format!("practiceQuestions[{n}].question is required")))?;
    if q.options.len() < 2 || q.options.iter().any(|o| o.trim().is_empty()) {
        return Err(ApiError::validation(format!(
            "practiceQuestions[{n}] needs at least two non-empty options"
        )));
    }
    let correct_answer_index = q
        .correct_answer_index
        .and_then(|i| usize::try_from(i).ok())
        .filter(|i| *i < q.options.len())
        .ok_or_else(|| {
            ApiError::validation(format!(
                "practiceQuestions[{n}].correctAnswerIndex is out of range"
            ))
        })?;

    Ok(PracticeQuestion {
        question,
        options: q.options.into_iter().map(|o| o.trim().to_string()).collect(),
        correct_answer_index,
        explanation: non_blank(q.explanation),
    })
}

/// Validates the form; returns the record (slug unset) and the slug base.
pub fn validate(req: DsaRequest) -> ApiResult<(NewDsaPost, String)> {
    let title = require_text("title", req.title)?;
    let description = require_text("description", req.description)?;

    let content = match non_blank(req.content) {
        Some(content) => content,
        None => req.sections.as_ref().map(section_content).unwrap_or_default(),
    };
    if content.is_empty() {
        return Err(ApiError::validation("content is required"));
    }

    let practice_questions = req
        .practice_questions
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(n, q)| practice_question(n, q))
        .collect::<ApiResult<Vec<_>>>()?;

    let slug_source = non_blank(req.slug)
        .filter(|s| !generate_slug(s).is_empty())
        .unwrap_or_else(|| title.clone());
    let base = base_slug(&slug_source, "dsa");

    let post = NewDsaPost {
        title: title.trim().to_string(),
        slug: String::new(),
        description,
        content,
        category: req.category.unwrap_or_default().trim().to_string(),
        tags: req.tags,
        read_time: req.read_time.filter(|m| *m > 0).unwrap_or(DEFAULT_READ_TIME),
        practice_questions,
    };
    Ok((post, base))
}

pub async fn list_posts(store: &dyn DsaStore) -> ApiResult<Vec<DsaPost>> {
    Ok(store.list().await?)
}

pub async fn get_post(store: &dyn DsaStore, id: Uuid) -> ApiResult<DsaPost> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(ENTITY))
}

pub async fn get_post_by_slug(store: &dyn DsaStore, slug: &str) -> ApiResult<DsaPost> {
    store
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::not_found(ENTITY))
}

pub async fn create_post(store: &dyn DsaStore, req: DsaRequest) -> ApiResult<DsaPost> {
    let (draft, base) = validate(req)?;
    let taken = store.slugs_derived_from(&base, None).await?;

    let post = write_with_unique_slug(&base, taken, |slug| {
        let record = NewDsaPost {
            slug,
            ..draft.clone()
        };
        async move { store.insert(&record).await }
    })
    .await?;

    info!(post_id = %post.id, slug = %post.slug, "dsa post created");
    Ok(post)
}

pub async fn update_post(store: &dyn DsaStore, id: Uuid, req: DsaRequest) -> ApiResult<DsaPost> {
    let (draft, base) = validate(req)?;
    let taken = store.slugs_derived_from(&base, Some(id)).await?;

    let post = write_with_unique_slug(&base, taken, |slug| {
        let record = NewDsaPost {
            slug,
            ..draft.clone()
        };
        async move { store.update(id, &record).await }
    })
    .await?
    .ok_or_else(|| ApiError::not_found(ENTITY))?;

    info!(post_id = %post.id, slug = %post.slug, "dsa post updated");
    Ok(post)
}

pub async fn delete_post(store: &dyn DsaStore, id: Uuid) -> ApiResult<()> {
    if !store.delete(id).await? {
        return Err(ApiError::not_found(ENTITY));
    }
    info!(post_id = %id, "dsa post deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsa::repo::MemoryDsaStore;

    fn request(title: &str) -> DsaRequest {
        DsaRequest {
            title: Some(title.into()),
            description: Some("d".into()),
            content: Some("body".into()),
            ..Default::default()
        }
    }

    fn question(options: &[&str], index: i32) -> PracticeQuestionInput {
        PracticeQuestionInput {
            question: Some("Which?".into()),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer_index: Some(index),
            explanation: None,
        }
    }

    #[test]
    fn content_assembled_from_sections() {
        let req = DsaRequest {
            content: None,
            sections: Some(DsaSections {
                introduction: Some("".into()),
                approach: Some("X".into()),
                ..Default::default()
            }),
            ..request("Binary Search")
        };
        let (post, _) = validate(req).unwrap();
        assert!(post.content.contains("## Approach"));
        assert!(!post.content.contains("## Introduction"));
    }

    #[test]
    fn content_or_sections_required() {
        let req = DsaRequest {
            content: Some("  ".into()),
            sections: Some(DsaSections::default()),
            ..request("Empty")
        };
        assert!(matches!(validate(req), Err(ApiError::Validation(_))));
    }

    #[test]
    fn read_time_defaults_to_five() {
        assert_eq!(validate(request("a")).unwrap().0.read_time, 5);
        let req = DsaRequest {
            read_time: Some(12),
            ..request("a")
        };
        assert_eq!(validate(req).unwrap().0.read_time, 12);
        let req = DsaRequest {
            read_time: Some(0),
            ..request("a")
        };
        assert_eq!(validate(req).unwrap().0.read_time, 5);
    }

    #[test]
    fn practice_questions_are_checked() {
        let ok = DsaRequest {
            practice_questions: Some(vec![question(&["O(n)", "O(log n)"], 1)]),
            ..request("a")
        };
        let (post, _) = validate(ok).unwrap();
        assert_eq!(post.practice_questions[0].correct_answer_index, 1);

        for bad in [
            question(&["only one"], 0),
            question(&["a", " "], 0),
            question(&["a", "b"], 2),
            question(&["a", "b"], -1),
            PracticeQuestionInput {
                question: Some(" ".into()),
                ..question(&["a", "b"], 0)
            },
        ] {
            let req = DsaRequest {
                practice_questions: Some(vec![bad]),
                ..request("a")
            };
            assert!(matches!(validate(req), Err(ApiError::Validation(_))));
        }
    }

    #[test]
    fn explicit_slug_wins_over_title() {
        let req = DsaRequest {
            slug: Some("Custom Slug".into()),
            ..request("Title")
        };
        assert_eq!(validate(req).unwrap().1, "custom-slug");
        assert_eq!(validate(request("Title")).unwrap().1, "title");
        let (_, base) = validate(request("???")).unwrap();
        assert!(base.starts_with("dsa-"));
    }

    #[tokio::test]
    async fn slugs_are_unique_and_resolvable() {
        let store = MemoryDsaStore::default();
        let a = create_post(&store, request("Graphs")).await.unwrap();
        let b = create_post(&store, request("Graphs")).await.unwrap();
        assert_eq!(a.slug, "graphs");
        assert_eq!(b.slug, "graphs-1");
        assert_eq!(get_post_by_slug(&store, "graphs-1").await.unwrap().id, b.id);
        assert!(matches!(
            get_post_by_slug(&store, "trees").await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_missing_post_is_not_found() {
        let store = MemoryDsaStore::default();
        let err = update_post(&store, Uuid::new_v4(), request("x")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = MemoryDsaStore::default();
        let post = create_post(&store, request("Heaps")).await.unwrap();
        delete_post(&store, post.id).await.unwrap();
        assert!(matches!(get_post(&store, post.id).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryDsaStore::default();
        let a = create_post(&store, request("Graphs")).await.unwrap();
        let b = create_post(&store, request("Tries")).await.unwrap();
        let ids: Vec<_> = list_posts(&store).await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }
}
