use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::forms::{non_blank, require_present, require_text};
use crate::projects::{
    dto::ProjectRequest,
    repo::ProjectStore,
    repo_types::{NewProject, Project},
};
use crate::slug::{base_slug, generate_slug, is_fallback, write_with_unique_slug};

const ENTITY: &str = "Project";

/// Validates the form and builds the record; `slug` is filled in later.
///
/// `stored_thumbnail` is what an update keeps when the payload omits `thumbnailUrl`.
pub fn validate(req: ProjectRequest, stored_thumbnail: Option<String>) -> ApiResult<NewProject> {
    let title = require_present("title", req.title)?;
    let description = require_text("description", req.description)?;
    let content = require_text("content", req.content)?;

    let thumbnail_url = match req.thumbnail_url {
        Some(explicit) => {
            let thumb = non_blank(explicit);
            if let Some(url) = &thumb {
                if !req.image_urls.contains(url) {
                    return Err(ApiError::validation("thumbnailUrl must be one of imageUrls"));
                }
            }
            thumb
        }
        None => stored_thumbnail.filter(|url| req.image_urls.contains(url)),
    };

    Ok(NewProject {
        title: title.trim().to_string(),
        slug: String::new(),
        description,
        content,
        technologies: req.technologies,
        image_urls: req.image_urls,
        thumbnail_url,
        github_url: non_blank(req.github_url),
        live_url: non_blank(req.live_url),
        featured: req.featured,
    })
}

pub async fn list_projects(store: &dyn ProjectStore) -> ApiResult<Vec<Project>> {
    Ok(store.list().await?)
}

/// Looks `key` up as an id first, then as a slug.
pub async fn get_project(store: &dyn ProjectStore, key: &str) -> ApiResult<Project> {
    if let Ok(id) = Uuid::parse_str(key) {
        if let Some(project) = store.find_by_id(id).await? {
            return Ok(project);
        }
    }
    store
        .find_by_slug(key)
        .await?
        .ok_or_else(|| ApiError::not_found(ENTITY))
}

pub async fn create_project(store: &dyn ProjectStore, req: ProjectRequest) -> ApiResult<Project> {
    let draft = validate(req, None)?;
    let base = base_slug(&draft.title, "project");
    let taken = store.slugs_derived_from(&base, None).await?;

    let project = write_with_unique_slug(&base, taken, |slug| {
        let record = NewProject {
            slug,
            ..draft.clone()
        };
        async move { store.insert(&record).await }
    })
    .await?;

    info!(project_id = %project.id, slug = %project.slug, "project created");
    Ok(project)
}

pub async fn update_project(
    store: &dyn ProjectStore,
    id: Uuid,
    req: ProjectRequest,
) -> ApiResult<Project> {
    let existing = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(ENTITY))?;

    let draft = validate(req, existing.thumbnail_url)?;
    // A still-blank title keeps its placeholder instead of minting a new one.
    let base = if generate_slug(&draft.title).is_empty() && is_fallback(&existing.slug, "project") {
        existing.slug
    } else {
        base_slug(&draft.title, "project")
    };
    let taken = store.slugs_derived_from(&base, Some(id)).await?;

    let updated = write_with_unique_slug(&base, taken, |slug| {
        let record = NewProject {
            slug,
            ..draft.clone()
        };
        async move { store.update(id, &record).await }
    })
    .await?
    .ok_or_else(|| ApiError::not_found(ENTITY))?;

    info!(project_id = %updated.id, slug = %updated.slug, "project updated");
    Ok(updated)
}

pub async fn delete_project(store: &dyn ProjectStore, id: Uuid) -> ApiResult<()> {
    if !store.delete(id).await? {
        return Err(ApiError::not_found(ENTITY));
    }
    info!(project_id = %id, "project deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::repo::MemoryProjectStore;

    fn request(title: &str) -> ProjectRequest {
        ProjectRequest {
            title: Some(title.into()),
            description: Some("d".into()),
            content: Some("c".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn colliding_titles_get_numeric_suffixes() {
        let store = MemoryProjectStore::default();
        let a = create_project(&store, request("My Cool App")).await.unwrap();
        let b = create_project(&store, request("My Cool App")).await.unwrap();
        let c = create_project(&store, request("my cool app!")).await.unwrap();
        assert_eq!(a.slug, "my-cool-app");
        assert_eq!(b.slug, "my-cool-app-1");
        assert_eq!(c.slug, "my-cool-app-2");
    }

    #[tokio::test]
    async fn blank_title_gets_placeholder_slug() {
        let store = MemoryProjectStore::default();
        let p = create_project(&store, request("   ")).await.unwrap();
        let re = regex::Regex::new(r"^project-\d+$").unwrap();
        assert!(re.is_match(&p.slug), "unexpected slug {}", p.slug);
    }

    #[tokio::test]
    async fn blank_title_keeps_placeholder_on_update() {
        let store = MemoryProjectStore::default();
        let p = create_project(&store, request("   ")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let resaved = update_project(&store, p.id, request("")).await.unwrap();
        assert_eq!(resaved.slug, p.slug);

        let named = update_project(&store, p.id, request("Now Named")).await.unwrap();
        assert_eq!(named.slug, "now-named");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let store = MemoryProjectStore::default();
        for req in [
            ProjectRequest {
                title: None,
                ..request("x")
            },
            ProjectRequest {
                description: Some(" ".into()),
                ..request("x")
            },
            ProjectRequest {
                content: None,
                ..request("x")
            },
        ] {
            let err = create_project(&store, req).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_accepts_id_or_slug() {
        let store = MemoryProjectStore::default();
        let p = create_project(&store, request("Dual Lookup")).await.unwrap();
        let by_id = get_project(&store, &p.id.to_string()).await.unwrap();
        let by_slug = get_project(&store, "dual-lookup").await.unwrap();
        assert_eq!(by_id.id, by_slug.id);

        let missing = get_project(&store, &Uuid::new_v4().to_string()).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_keeps_own_slug_and_skips_others() {
        let store = MemoryProjectStore::default();
        let first = create_project(&store, request("Alpha")).await.unwrap();
        let second = create_project(&store, request("Beta")).await.unwrap();

        // Renaming onto an existing title picks the next free suffix.
        let renamed = update_project(&store, second.id, request("Alpha")).await.unwrap();
        assert_eq!(renamed.slug, "alpha-1");

        // Re-saving without changes keeps the slug.
        let resaved = update_project(&store, first.id, request("Alpha")).await.unwrap();
        assert_eq!(resaved.slug, "alpha");
        assert_eq!(resaved.created_at, first.created_at);
    }

    #[tokio::test]
    async fn update_of_missing_project_is_not_found() {
        let store = MemoryProjectStore::default();
        let err = update_project(&store, Uuid::new_v4(), request("x")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn thumbnail_must_be_one_of_the_images() {
        let store = MemoryProjectStore::default();
        let mut req = request("Gallery");
        req.image_urls = vec!["/uploads/a.png".into(), "/uploads/b.png".into()];
        req.thumbnail_url = Some(Some("/uploads/c.png".into()));
        let err = create_project(&store, req.clone()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        req.thumbnail_url = Some(Some("/uploads/b.png".into()));
        let p = create_project(&store, req.clone()).await.unwrap();
        assert_eq!(p.thumbnail_url.as_deref(), Some("/uploads/b.png"));

        // Omitted thumbnail survives while the image is still listed...
        req.thumbnail_url = None;
        let kept = update_project(&store, p.id, req.clone()).await.unwrap();
        assert_eq!(kept.thumbnail_url.as_deref(), Some("/uploads/b.png"));

        // ...and is dropped once it is not.
        req.image_urls = vec!["/uploads/a.png".into()];
        let dropped = update_project(&store, p.id, req).await.unwrap();
        assert_eq!(dropped.thumbnail_url, None);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let store = MemoryProjectStore::default();
        let p = create_project(&store, request("Gone")).await.unwrap();
        delete_project(&store, p.id).await.unwrap();
        let err = delete_project(&store, p.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryProjectStore::default();
        let a = create_project(&store, request("One")).await.unwrap();
        let b = create_project(&store, request("Two")).await.unwrap();
        let ids: Vec<_> = list_projects(&store).await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }
}
