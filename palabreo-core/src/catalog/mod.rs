//! In-memory catalog of profiles, works and interactions
//!
//! The catalog is a plain serialisable value; callers decide where it lives
//! and how it is persisted.

mod query;

pub use query::{Page, WorkQuery, WorkSort, DEFAULT_PER_PAGE, MAX_PER_PAGE};

use crate::error::CatalogError;
use crate::types::{Chapter, Comment, Genre, InteractionSet, Profile, Work, MAX_COMMENT_CHARS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Longest accepted work title, in characters
pub const MAX_TITLE_CHARS: usize = 200;

type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Input for a new profile
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Input for a new work
#[derive(Debug, Clone, Deserialize)]
pub struct NewWork {
    pub author_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub genre: Genre,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// Edits to an existing work; `None` fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkChanges {
    pub title: Option<String>,
    pub genre: Option<Genre>,
    pub content: Option<String>,
    pub chapters: Option<Vec<Chapter>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    profiles: HashMap<Uuid, Profile>,
    #[serde(default)]
    works: HashMap<Uuid, Work>,
    #[serde(default)]
    likes: InteractionSet,
    #[serde(default)]
    bookmarks: InteractionSet,
    #[serde(default)]
    follows: InteractionSet,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn work_count(&self) -> usize {
        self.works.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    // --- Profiles ---

    pub fn create_profile(&mut self, input: NewProfile) -> CatalogResult<Profile> {
        let username = input.username.trim();
        if !Profile::is_valid_username(username) {
            return Err(CatalogError::InvalidInput(format!(
                "invalid username: {username}"
            )));
        }
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput("name must not be blank".to_string()));
        }
        if self.profile_by_username(username).is_some() {
            return Err(CatalogError::UsernameTaken(username.to_string()));
        }
        if self.profiles.values().any(|p| p.user_id == input.user_id) {
            return Err(CatalogError::AccountHasProfile(input.user_id));
        }

        let mut profile = Profile::new(input.user_id, name, username);
        profile.bio = input.bio.map(|b| b.trim().to_string()).filter(|b| !b.is_empty());
        self.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    pub fn profile(&self, id: Uuid) -> Option<&Profile> {
        self.profiles.get(&id)
    }

    pub fn profile_by_username(&self, username: &str) -> Option<&Profile> {
        self.profiles.values().find(|p| p.matches_username(username))
    }

    // --- Works ---

    pub fn create_work(&mut self, input: NewWork) -> CatalogResult<Work> {
        let work = Work::new(input.author_id, input.title, input.genre)
            .with_content(input.content)
            .with_chapters(input.chapters);
        self.add_work(work)
    }

    /// Insert a fully built work (e.g. an imported manuscript)
    pub fn add_work(&mut self, mut work: Work) -> CatalogResult<Work> {
        if !self.profiles.contains_key(&work.author_id) {
            return Err(CatalogError::ProfileNotFound(work.author_id.to_string()));
        }
        work.title = validate_title(&work.title)?;
        self.works.insert(work.id, work.clone());
        Ok(work)
    }

    pub fn work(&self, id: Uuid) -> Option<&Work> {
        self.works.get(&id)
    }

    pub fn update_work(&mut self, id: Uuid, changes: WorkChanges) -> CatalogResult<Work> {
        let title = changes.title.as_deref().map(validate_title).transpose()?;
        self.modify_work(id, |work| {
            if let Some(title) = title {
                work.title = title;
            }
            if let Some(genre) = changes.genre {
                work.genre = genre;
            }
            if let Some(content) = changes.content {
                work.content = content;
            }
            if let Some(chapters) = changes.chapters {
                work.chapters = chapters;
            }
        })
    }

    /// Remove a work together with its likes, bookmarks and comments
    pub fn delete_work(&mut self, id: Uuid) -> CatalogResult<Work> {
        let work = self.works.remove(&id).ok_or(CatalogError::WorkNotFound(id))?;
        self.likes.purge(id);
        self.bookmarks.purge(id);
        self.comments.retain(|c| c.work_id != id);
        Ok(work)
    }

    pub fn publish(&mut self, id: Uuid) -> CatalogResult<Work> {
        self.modify_work(id, |w| w.published = true)
    }

    pub fn unpublish(&mut self, id: Uuid) -> CatalogResult<Work> {
        self.modify_work(id, |w| w.published = false)
    }

    pub fn archive(&mut self, id: Uuid) -> CatalogResult<Work> {
        self.modify_work(id, |w| w.archived = true)
    }

    pub fn unarchive(&mut self, id: Uuid) -> CatalogResult<Work> {
        self.modify_work(id, |w| w.archived = false)
    }

    /// Count one view; returns the new total
    pub fn record_view(&mut self, id: Uuid) -> CatalogResult<u64> {
        let work = self.works.get_mut(&id).ok_or(CatalogError::WorkNotFound(id))?;
        work.views = work.views.saturating_add(1);
        Ok(work.views)
    }

    /// Published, non-archived works matching the query
    pub fn public_works(&self, query: &WorkQuery) -> Page<Work> {
        let needle = query.needle();
        let mut works: Vec<&Work> = self
            .works
            .values()
            .filter(|w| w.is_listed())
            .filter(|w| match &needle {
                Some(needle) => {
                    w.title.to_lowercase().contains(needle) || w.genre.as_str().contains(needle)
                }
                None => true,
            })
            .collect();

        match query.sort {
            WorkSort::Recent => works.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| a.title.cmp(&b.title))
            }),
            WorkSort::Popular => works.sort_by(|a, b| {
                b.likes
                    .cmp(&a.likes)
                    .then_with(|| b.views.cmp(&a.views))
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }

        Page::paginate(
            works.into_iter().cloned().collect(),
            query.effective_page(),
            query.effective_per_page(),
        )
    }

    /// Works owned by a profile, newest first
    pub fn works_by_author(&self, author_id: Uuid, include_unlisted: bool) -> Vec<Work> {
        let mut works: Vec<Work> = self
            .works
            .values()
            .filter(|w| w.author_id == author_id && (include_unlisted || w.is_listed()))
            .cloned()
            .collect();
        works.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        works
    }

    // --- Likes and bookmarks ---

    /// Like a work. Returns false when the user already liked it.
    pub fn like(&mut self, user_id: Uuid, work_id: Uuid) -> CatalogResult<bool> {
        self.require_work(work_id)?;
        let added = self.likes.insert(user_id, work_id);
        self.sync_like_count(work_id);
        Ok(added)
    }

    /// Remove a like. Returns false when there was none.
    pub fn unlike(&mut self, user_id: Uuid, work_id: Uuid) -> CatalogResult<bool> {
        self.require_work(work_id)?;
        let removed = self.likes.remove(user_id, work_id);
        self.sync_like_count(work_id);
        Ok(removed)
    }

    pub fn has_liked(&self, user_id: Uuid, work_id: Uuid) -> bool {
        self.likes.contains(user_id, work_id)
    }

    pub fn bookmark(&mut self, user_id: Uuid, work_id: Uuid) -> CatalogResult<bool> {
        self.require_work(work_id)?;
        Ok(self.bookmarks.insert(user_id, work_id))
    }

    pub fn unbookmark(&mut self, user_id: Uuid, work_id: Uuid) -> CatalogResult<bool> {
        self.require_work(work_id)?;
        Ok(self.bookmarks.remove(user_id, work_id))
    }

    /// Bookmarked works still in the catalog, oldest bookmark first
    pub fn bookmarks_of(&self, user_id: Uuid) -> Vec<Work> {
        self.bookmarks
            .targets_of(user_id)
            .into_iter()
            .filter_map(|id| self.works.get(&id).cloned())
            .collect()
    }

    // --- Follows ---

    pub fn follow(&mut self, follower_id: Uuid, followed_id: Uuid) -> CatalogResult<bool> {
        if follower_id == followed_id {
            return Err(CatalogError::SelfFollow);
        }
        self.require_profile(follower_id)?;
        self.require_profile(followed_id)?;
        Ok(self.follows.insert(follower_id, followed_id))
    }

    pub fn unfollow(&mut self, follower_id: Uuid, followed_id: Uuid) -> CatalogResult<bool> {
        self.require_profile(followed_id)?;
        Ok(self.follows.remove(follower_id, followed_id))
    }

    pub fn followers_of(&self, profile_id: Uuid) -> Vec<Uuid> {
        self.follows.users_of(profile_id)
    }

    pub fn following_of(&self, profile_id: Uuid) -> Vec<Uuid> {
        self.follows.targets_of(profile_id)
    }

    // --- Comments ---

    /// Append a comment. Bodies are trimmed and must be non-blank.
    pub fn add_comment(
        &mut self,
        work_id: Uuid,
        user_id: Uuid,
        body: &str,
    ) -> CatalogResult<Comment> {
        self.require_work(work_id)?;
        let body = body.trim();
        if body.is_empty() {
            return Err(CatalogError::InvalidInput("comment must not be blank".to_string()));
        }
        if body.chars().count() > MAX_COMMENT_CHARS {
            return Err(CatalogError::InvalidInput(format!(
                "comment exceeds {MAX_COMMENT_CHARS} characters"
            )));
        }
        let comment = Comment::new(work_id, user_id, body);
        self.comments.push(comment.clone());
        Ok(comment)
    }

    /// Comments on a work, oldest first
    pub fn comments_for(&self, work_id: Uuid) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.work_id == work_id)
            .cloned()
            .collect()
    }

    // --- Helpers ---

    fn modify_work(&mut self, id: Uuid, f: impl FnOnce(&mut Work)) -> CatalogResult<Work> {
        let work = self.works.get_mut(&id).ok_or(CatalogError::WorkNotFound(id))?;
        f(work);
        work.touch();
        Ok(work.clone())
    }

    fn require_work(&self, id: Uuid) -> CatalogResult<()> {
        if self.works.contains_key(&id) {
            Ok(())
        } else {
            Err(CatalogError::WorkNotFound(id))
        }
    }

    fn require_profile(&self, id: Uuid) -> CatalogResult<()> {
        if self.profiles.contains_key(&id) {
            Ok(())
        } else {
            Err(CatalogError::ProfileNotFound(id.to_string()))
        }
    }

    fn sync_like_count(&mut self, work_id: Uuid) {
        let count = self.likes.count_for(work_id) as u64;
        if let Some(work) = self.works.get_mut(&work_id) {
            work.likes = count;
        }
    }
}

fn validate_title(title: &str) -> CatalogResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CatalogError::InvalidInput("title must not be blank".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(CatalogError::InvalidInput(format!(
            "title exceeds {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_author() -> (Catalog, Profile) {
        let mut catalog = Catalog::new();
        let author = catalog
            .create_profile(NewProfile {
                user_id: Uuid::new_v4(),
                name: "Alfonsina".to_string(),
                username: "alfonsina".to_string(),
                bio: None,
            })
            .unwrap();
        (catalog, author)
    }

    fn new_work(author: &Profile, title: &str) -> NewWork {
        NewWork {
            author_id: author.id,
            title: title.to_string(),
            genre: Genre::Poem,
            content: "verso".to_string(),
            chapters: Vec::new(),
        }
    }

    #[test]
    fn test_usernames_unique_case_insensitive() {
        let (mut catalog, _) = catalog_with_author();
        let err = catalog
            .create_profile(NewProfile {
                user_id: Uuid::new_v4(),
                name: "Otra".to_string(),
                username: "ALFONSINA".to_string(),
                bio: None,
            })
            .unwrap_err();
        assert!(matches!(err, CatalogError::UsernameTaken(_)));
    }

    #[test]
    fn test_one_profile_per_account() {
        let (mut catalog, author) = catalog_with_author();
        let err = catalog
            .create_profile(NewProfile {
                user_id: author.user_id,
                name: "Alter".to_string(),
                username: "alter_ego".to_string(),
                bio: None,
            })
            .unwrap_err();
        assert!(matches!(err, CatalogError::AccountHasProfile(_)));
    }

    #[test]
    fn test_work_requires_author_and_title() {
        let (mut catalog, author) = catalog_with_author();

        let mut orphan = new_work(&author, "Huérfana");
        orphan.author_id = Uuid::new_v4();
        assert!(matches!(
            catalog.create_work(orphan),
            Err(CatalogError::ProfileNotFound(_))
        ));

        assert!(matches!(
            catalog.create_work(new_work(&author, "   ")),
            Err(CatalogError::InvalidInput(_))
        ));

        let work = catalog.create_work(new_work(&author, "  Tú me quieres blanca ")).unwrap();
        assert_eq!(work.title, "Tú me quieres blanca");
    }

    #[test]
    fn test_archived_works_never_listed() {
        let (mut catalog, author) = catalog_with_author();
        let listed = catalog.create_work(new_work(&author, "Visible")).unwrap();
        let hidden = catalog.create_work(new_work(&author, "Oculta")).unwrap();
        let draft = catalog.create_work(new_work(&author, "Borrador")).unwrap();

        catalog.publish(listed.id).unwrap();
        catalog.publish(hidden.id).unwrap();
        catalog.archive(hidden.id).unwrap();

        let page = catalog.public_works(&WorkQuery::default());
        let ids: Vec<Uuid> = page.items.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![listed.id]);
        assert!(!ids.contains(&draft.id));

        assert_eq!(catalog.works_by_author(author.id, false).len(), 1);
        assert_eq!(catalog.works_by_author(author.id, true).len(), 3);
    }

    #[test]
    fn test_search_and_popular_sort() {
        let (mut catalog, author) = catalog_with_author();
        let a = catalog.create_work(new_work(&author, "La lluvia")).unwrap();
        let b = catalog.create_work(new_work(&author, "El mar")).unwrap();
        catalog.publish(a.id).unwrap();
        catalog.publish(b.id).unwrap();
        catalog.like(Uuid::new_v4(), b.id).unwrap();

        let page = catalog.public_works(&WorkQuery::default().with_sort(WorkSort::Popular));
        assert_eq!(page.items[0].id, b.id);

        let page = catalog.public_works(&WorkQuery::default().with_search("LLUVIA"));
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, a.id);

        let page = catalog.public_works(&WorkQuery::default().with_search("poem"));
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_likes_are_idempotent_and_counted() {
        let (mut catalog, author) = catalog_with_author();
        let work = catalog.create_work(new_work(&author, "Peso ancestral")).unwrap();
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(catalog.like(u1, work.id).unwrap());
        assert!(!catalog.like(u1, work.id).unwrap());
        assert!(catalog.like(u2, work.id).unwrap());
        assert_eq!(catalog.work(work.id).unwrap().likes, 2);

        assert!(catalog.unlike(u1, work.id).unwrap());
        assert!(!catalog.unlike(u1, work.id).unwrap());
        assert_eq!(catalog.work(work.id).unwrap().likes, 1);
        assert!(catalog.has_liked(u2, work.id));
    }

    #[test]
    fn test_bookmarks() {
        let (mut catalog, author) = catalog_with_author();
        let work = catalog.create_work(new_work(&author, "Ocre")).unwrap();
        let reader = Uuid::new_v4();

        assert!(catalog.bookmark(reader, work.id).unwrap());
        assert!(!catalog.bookmark(reader, work.id).unwrap());
        assert_eq!(catalog.bookmarks_of(reader).len(), 1);

        catalog.delete_work(work.id).unwrap();
        assert!(catalog.bookmarks_of(reader).is_empty());
    }

    #[test]
    fn test_follows() {
        let (mut catalog, author) = catalog_with_author();
        let reader = catalog
            .create_profile(NewProfile {
                user_id: Uuid::new_v4(),
                name: "Lectora".to_string(),
                username: "lectora".to_string(),
                bio: Some("  ".to_string()),
            })
            .unwrap();
        assert_eq!(reader.bio, None);

        assert!(matches!(
            catalog.follow(author.id, author.id),
            Err(CatalogError::SelfFollow)
        ));
        assert!(catalog.follow(reader.id, author.id).unwrap());
        assert!(!catalog.follow(reader.id, author.id).unwrap());
        assert_eq!(catalog.followers_of(author.id), vec![reader.id]);
        assert_eq!(catalog.following_of(reader.id), vec![author.id]);

        assert!(catalog.unfollow(reader.id, author.id).unwrap());
        assert!(catalog.followers_of(author.id).is_empty());
    }

    #[test]
    fn test_comments_append_only_and_validated() {
        let (mut catalog, author) = catalog_with_author();
        let work = catalog.create_work(new_work(&author, "Irremediablemente")).unwrap();
        let reader = Uuid::new_v4();

        catalog.add_comment(work.id, reader, "  primero ").unwrap();
        catalog.add_comment(work.id, reader, "segundo").unwrap();
        assert!(catalog.add_comment(work.id, reader, " \n ").is_err());
        assert!(catalog
            .add_comment(work.id, reader, &"x".repeat(MAX_COMMENT_CHARS + 1))
            .is_err());

        let bodies: Vec<String> = catalog
            .comments_for(work.id)
            .into_iter()
            .map(|c| c.body)
            .collect();
        assert_eq!(bodies, vec!["primero", "segundo"]);
    }

    #[test]
    fn test_update_and_views() {
        let (mut catalog, author) = catalog_with_author();
        let work = catalog.create_work(new_work(&author, "Antes")).unwrap();

        let updated = catalog
            .update_work(
                work.id,
                WorkChanges {
                    title: Some("Después".to_string()),
                    chapters: Some(vec![Chapter::new("Uno")]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Después");
        assert_eq!(updated.chapters.len(), 1);
        assert!(updated.updated_at >= work.updated_at);

        assert_eq!(catalog.record_view(work.id).unwrap(), 1);
        assert_eq!(catalog.record_view(work.id).unwrap(), 2);
        assert!(matches!(
            catalog.record_view(Uuid::new_v4()),
            Err(CatalogError::WorkNotFound(_))
        ));
    }

    #[test]
    fn test_catalog_serialization() {
        let (mut catalog, author) = catalog_with_author();
        let work = catalog.create_work(new_work(&author, "Persistente")).unwrap();
        catalog.like(Uuid::new_v4(), work.id).unwrap();

        let json = serde_json::to_string(&catalog).unwrap();
        let restored: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.work(work.id).unwrap().likes, 1);
        assert_eq!(restored.profile_count(), 1);
    }
}
