use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostWithAuthor, User};
use crate::error::RepoError;

/// Generic repository trait shared by every table.
///
/// Rows are insert-only: nothing in the service updates or deletes them.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return the stored row.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Count rows at query time.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// User repository with account lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find any user holding either the email or the username.
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, RepoError>;

    /// All users, most recently created first.
    async fn list_newest_first(&self) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts joined with their author, most recent first, optionally capped.
    async fn list_with_authors(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<PostWithAuthor>, RepoError>;
}
