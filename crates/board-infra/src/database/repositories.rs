//! SQL repository implementations (PostgreSQL and SQLite via SeaORM).

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use board_core::domain::{Post, PostWithAuthor, User};
use board_core::error::RepoError;
use board_core::ports::{PostRepository, UserRepository};

use super::base::{SeaOrmRepository, map_db_err};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// SQL user repository.
pub type SqlUserRepository = SeaOrmRepository<UserEntity>;

/// SQL post repository.
pub type SqlPostRepository = SeaOrmRepository<PostEntity>;

/// Mask an email for logging to avoid PII in logs.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let mut chars = local.chars();
            match (chars.next(), chars.next()) {
                (Some(first), Some(_)) => format!("{first}***@{domain}"),
                _ => format!("***@{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_newest_first(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn list_with_authors(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        let mut query = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::CreatedAt);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query.all(self.db.as_ref()).await.map_err(map_db_err)?;

        // Inner-join semantics: a post without a resolvable author is skipped.
        Ok(rows
            .into_iter()
            .filter_map(|(post, author)| {
                author.map(|author| PostWithAuthor {
                    post: Post::from(post),
                    username: author.username,
                })
            })
            .collect())
    }
}
