use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, SqlErr,
};
use uuid::Uuid;

use board_core::error::RepoError;
use board_core::ports::BaseRepository;

/// Generic SeaORM repository, shared by the PostgreSQL and SQLite backends.
///
/// Repositories built from the same `Arc` share one connection pool.
pub struct SeaOrmRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: Arc<DatabaseConnection>,
    _entity: PhantomData<E>,
}

impl<E> SeaOrmRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Translate a SeaORM error into the repository taxonomy.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => return RepoError::Unique(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            return RepoError::ForeignKey(detail);
        }
        _ => {}
    }

    match err {
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::RecordNotFound(_) => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl<E, T> BaseRepository<T, Uuid> for SeaOrmRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(self.db.as_ref()).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.insert(self.db.as_ref()).await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        E::find().count(self.db.as_ref()).await.map_err(map_db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_connection_errors_are_classified() {
        let err = DbErr::Conn(RuntimeErr::Internal("refused".to_string()));
        assert!(matches!(map_db_err(err), RepoError::Connection(_)));
    }

    #[test]
    fn test_other_errors_become_query_errors() {
        let err = DbErr::Custom("boom".to_string());
        assert!(matches!(map_db_err(err), RepoError::Query(msg) if msg.contains("boom")));
    }

    #[test]
    fn test_missing_record() {
        let err = DbErr::RecordNotFound("users".to_string());
        assert!(matches!(map_db_err(err), RepoError::NotFound));
    }
}
