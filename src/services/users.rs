use crate::{
    auth::Role,
    db::DbPool,
    entities::user,
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub role: Role,
}

/// Admin-facing user management
#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<user::Model>, ServiceError> {
        let db = &*self.db_pool;
        let users = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i32) -> Result<Option<user::Model>, ServiceError> {
        let db = &*self.db_pool;
        let found = user::Entity::find_by_id(id).one(db).await?;
        Ok(found)
    }

    /// Creates a user from an already-hashed password
    #[instrument(skip(self, password_hash))]
    pub async fn create_user(
        &self,
        email: String,
        password_hash: String,
        name: String,
        role: Role,
    ) -> Result<user::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "User with email {} already exists",
                email
            )));
        }

        let model = user::ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(role.as_str().to_string()),
            name: Set(name),
            ..Default::default()
        };

        let inserted = model.insert(db).await?;
        Ok(inserted)
    }

    #[instrument(skip(self, req))]
    pub async fn update_user(
        &self,
        id: i32,
        req: UpdateUserRequest,
    ) -> Result<user::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = user::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))?;

        let mut model: user::ActiveModel = existing.into();
        model.email = Set(req.email);
        model.name = Set(req.name);
        model.role = Set(req.role.as_str().to_string());

        let updated = model.update(db).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = user::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))?;

        existing.delete(db).await?;
        Ok(())
    }
}
