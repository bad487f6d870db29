use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::forms::{non_blank, require_text};
use crate::leetcode::{
    dto::LeetcodeRequest,
    repo::LeetcodeStore,
    repo_types::{Difficulty, LeetcodeSolution, NewLeetcodeSolution},
};

const ENTITY: &str = "Solution";

pub fn validate(req: LeetcodeRequest) -> ApiResult<NewLeetcodeSolution> {
    let title = require_text("title", req.title)?;
    let description = require_text("description", req.description)?;
    let solution = require_text("solution", req.solution)?;

    let difficulty = match non_blank(req.difficulty) {
        None => Difficulty::default(),
        Some(raw) => Difficulty::parse(&raw).ok_or_else(|| {
            ApiError::validation("difficulty must be one of Easy, Medium, Hard")
        })?,
    };

    Ok(NewLeetcodeSolution {
        title: title.trim().to_string(),
        number: req.number.unwrap_or(0),
        difficulty,
        category: req.category.unwrap_or_default().trim().to_string(),
        description,
        approach: req.approach.unwrap_or_default(),
        solution,
        python_solution: non_blank(req.python_solution),
        java_solution: non_blank(req.java_solution),
        cpp_solution: non_blank(req.cpp_solution),
        javascript_solution: non_blank(req.javascript_solution),
        time_complexity: req.time_complexity.unwrap_or_default().trim().to_string(),
        space_complexity: req.space_complexity.unwrap_or_default().trim().to_string(),
        time_complexity_explanation: non_blank(req.time_complexity_explanation),
        space_complexity_explanation: non_blank(req.space_complexity_explanation),
        tags: req.tags,
        leetcode_url: non_blank(req.leetcode_url),
    })
}

pub async fn list_solutions(store: &dyn LeetcodeStore) -> ApiResult<Vec<LeetcodeSolution>> {
    Ok(store.list().await?)
}

pub async fn get_solution(store: &dyn LeetcodeStore, id: Uuid) -> ApiResult<LeetcodeSolution> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(ENTITY))
}

pub async fn create_solution(
    store: &dyn LeetcodeStore,
    req: LeetcodeRequest,
) -> ApiResult<LeetcodeSolution> {
    let record = validate(req)?;
    let created = store.insert(&record).await?;
    info!(solution_id = %created.id, number = created.number, "leetcode solution created");
    Ok(created)
}

pub async fn update_solution(
    store: &dyn LeetcodeStore,
    id: Uuid,
    req: LeetcodeRequest,
) -> ApiResult<LeetcodeSolution> {
    let record = validate(req)?;
    let updated = store
        .update(id, &record)
        .await?
        .ok_or_else(|| ApiError::not_found(ENTITY))?;
    info!(solution_id = %updated.id, "leetcode solution updated");
    Ok(updated)
}

pub async fn delete_solution(store: &dyn LeetcodeStore, id: Uuid) -> ApiResult<()> {
    if !store.delete(id).await? {
        return Err(ApiError::not_found(ENTITY));
    }
    info!(solution_id = %id, "leetcode solution deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leetcode::repo::MemoryLeetcodeStore;

    fn request() -> LeetcodeRequest {
        LeetcodeRequest {
            title: Some("Two Sum".into()),
            description: Some("find two numbers".into()),
            solution: Some("fn two_sum() {}".into()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_number_and_difficulty() {
        let s = validate(request()).unwrap();
        assert_eq!(s.number, 0);
        assert_eq!(s.difficulty, Difficulty::Medium);
        assert_eq!(s.python_solution, None);
    }

    #[test]
    fn difficulty_is_case_insensitive() {
        for (raw, want) in [("easy", Difficulty::Easy), ("HARD", Difficulty::Hard), (" Medium ", Difficulty::Medium)] {
            let req = LeetcodeRequest {
                difficulty: Some(raw.into()),
                ..request()
            };
            assert_eq!(validate(req).unwrap().difficulty, want);
        }
        let bad = LeetcodeRequest {
            difficulty: Some("brutal".into()),
            ..request()
        };
        assert!(matches!(validate(bad), Err(ApiError::Validation(_))));
    }

    #[test]
    fn number_coerced_from_json() {
        let req: LeetcodeRequest = serde_json::from_value(serde_json::json!({
            "title": "t", "description": "d", "solution": "s", "number": "42"
        }))
        .unwrap();
        assert_eq!(validate(req).unwrap().number, 42);

        let req: LeetcodeRequest = serde_json::from_value(serde_json::json!({
            "title": "t", "description": "d", "solution": "s", "number": "forty-two"
        }))
        .unwrap();
        assert_eq!(validate(req).unwrap().number, 0);
    }

    #[test]
    fn requires_title_description_and_solution() {
        for req in [
            LeetcodeRequest { title: None, ..request() },
            LeetcodeRequest { description: Some("".into()), ..request() },
            LeetcodeRequest { solution: Some("  ".into()), ..request() },
        ] {
            assert!(matches!(validate(req), Err(ApiError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn same_problem_number_may_repeat() {
        let store = MemoryLeetcodeStore::default();
        let req = LeetcodeRequest {
            number: Some(1),
            ..request()
        };
        create_solution(&store, req.clone()).await.unwrap();
        create_solution(&store, req).await.unwrap();
        assert_eq!(list_solutions(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let store = MemoryLeetcodeStore::default();
        let created = create_solution(&store, request()).await.unwrap();

        let req = LeetcodeRequest {
            title: Some("Two Sum II".into()),
            python_solution: Some("def f(): pass".into()),
            ..request()
        };
        let updated = update_solution(&store, created.id, req).await.unwrap();
        assert_eq!(updated.title, "Two Sum II");
        assert_eq!(updated.python_solution.as_deref(), Some("def f(): pass"));
        assert_eq!(updated.created_at, created.created_at);

        delete_solution(&store, created.id).await.unwrap();
        assert!(matches!(
            get_solution(&store, created.id).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            update_solution(&store, created.id, request()).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryLeetcodeStore::default();
        let a = create_solution(&store, request()).await.unwrap();
        let b = create_solution(&store, request()).await.unwrap();
        let ids: Vec<_> = list_solutions(&store).await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }
}
