use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::Utc;
use rand::rngs::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use common::{pagination::Pagination, types::Page};
use models::audit_log::AuditAction;
use models::user::{self, UserRole};
use models::user_credentials;
use crate::{audit_service, errors::ServiceError};

pub const MIN_PASSWORD_LEN: usize = 8;
const PASSWORD_ALGORITHM: &str = "argon2";

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub phone: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

fn check_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(hashing_failed)
}

fn hashing_failed(e: argon2::password_hash::Error) -> ServiceError {
    ServiceError::Internal(format!("password hashing failed: {e}"))
}

pub fn verify_hash(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// Create a user together with its argon2 credentials.
#[instrument(skip(db, input), fields(email = %input.email, role = ?input.role))]
pub async fn create_user(db: &DatabaseConnection, actor: Option<Uuid>, input: NewUser) -> Result<user::Model, ServiceError> {
    check_password(&input.password)?;
    user::validate_email(&input.email)?;
    let email = user::normalize_email(&input.email);
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ServiceError::Conflict(format!("email {email} already registered")));
    }
    let hash = hash_password(&input.password)?;

    let txn = db.begin().await?;
    let created = user::create(&txn, &email, &input.name, input.role, input.phone).await?;
    user_credentials::upsert_password(&txn, created.id, hash, PASSWORD_ALGORITHM).await?;
    audit_service::record(
        &txn,
        actor,
        AuditAction::Create,
        "user",
        created.id,
        Some(serde_json::json!({ "email": created.email, "role": created.role })),
    )
    .await?;
    txn.commit().await?;

    info!(user_id = %created.id, "user created");
    Ok(created)
}

pub async fn get_user<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))
}

/// The user `id` if it may carry out maintenance work.
pub async fn require_assignable<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<user::Model, ServiceError> {
    let found = get_user(db, id).await?;
    if !found.is_assignable() {
        return Err(ServiceError::Validation(format!(
            "user {} cannot be assigned: must be an active technician or supervisor",
            found.id
        )));
    }
    Ok(found)
}

/// Non-deleted users matching `filter`, ordered by name.
pub async fn list_users<C: ConnectionTrait>(db: &C, filter: UserFilter, opts: Pagination) -> Result<Page<user::Model>, ServiceError> {
    let mut q = user::Entity::find().filter(user::Column::DeletedAt.is_null());
    if let Some(role) = filter.role {
        q = q.filter(user::Column::Role.eq(role));
    }
    if let Some(active) = filter.active {
        q = q.filter(user::Column::Active.eq(active));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        q = q.filter(
            Condition::any()
                .add(user::Column::Name.contains(search))
                .add(user::Column::Email.contains(search.to_ascii_lowercase())),
        );
    }
    crate::fetch_page(db, q.order_by_asc(user::Column::Name), opts).await
}

#[instrument(skip(db, changes))]
pub async fn update_user(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid, changes: UserUpdate) -> Result<user::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = get_user(&txn, id).await?;
    if current.deleted_at.is_some() {
        return Err(ServiceError::not_found("user"));
    }
    let mut am: user::ActiveModel = current.into();
    if let Some(name) = changes.name.as_deref() {
        user::validate_name(name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(role) = changes.role {
        am.role = Set(role);
    }
    if let Some(phone) = changes.phone {
        am.phone = Set(Some(phone).filter(|p| !p.trim().is_empty()));
    }
    if let Some(active) = changes.active {
        am.active = Set(active);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    audit_service::record(
        &txn,
        actor,
        AuditAction::Update,
        "user",
        id,
        Some(serde_json::json!({ "name": updated.name, "role": updated.role, "active": updated.active })),
    )
    .await?;
    txn.commit().await?;
    Ok(updated)
}

/// Replace the password after checking the current one.
#[instrument(skip(db, current_password, new_password))]
pub async fn change_password(
    db: &DatabaseConnection,
    actor: Option<Uuid>,
    id: Uuid,
    current_password: &str,
    new_password: &str,
) -> Result<(), ServiceError> {
    check_password(new_password)?;
    get_user(db, id).await?;
    let matches = user_credentials::verify_password(db, id, |hash| verify_hash(current_password, hash)).await?;
    if !matches {
        return Err(ServiceError::Unauthorized);
    }
    let hash = hash_password(new_password)?;

    let txn = db.begin().await?;
    user_credentials::upsert_password(&txn, id, hash, PASSWORD_ALGORITHM).await?;
    audit_service::record(&txn, actor, AuditAction::Update, "user", id, Some(serde_json::json!({ "password": "changed" }))).await?;
    txn.commit().await?;
    info!(user_id = %id, "password changed");
    Ok(())
}

/// Soft delete by default; `hard` removes the row and its credentials.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, actor: Option<Uuid>, id: Uuid, hard: bool) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    get_user(&txn, id).await?;
    if hard {
        user::hard_delete(&txn, id).await?;
    } else {
        user::soft_delete(&txn, id).await?;
    }
    audit_service::record(&txn, actor, AuditAction::Delete, "user", id, Some(serde_json::json!({ "hard": hard }))).await?;
    txn.commit().await?;
    info!(user_id = %id, hard, "user deleted");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_support::get_db;

    pub(crate) async fn technician(db: &DatabaseConnection, email: &str) -> Result<user::Model, anyhow::Error> {
        Ok(create_user(db, None, NewUser {
            email: email.into(),
            name: "Tech".into(),
            role: UserRole::Technician,
            phone: None,
            password: "s3cure-pass".into(),
        })
        .await?)
    }

    #[test]
    fn hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_hash("correct horse", &hash));
        assert!(!verify_hash("wrong horse", &hash));
        assert!(!verify_hash("anything", "not-a-phc-string"));
    }

    #[test]
    fn hashing_failure_is_internal() {
        let err = hashing_failed(argon2::password_hash::Error::Password);
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let actor = Uuid::new_v4();

        let u = create_user(&db, Some(actor), NewUser {
            email: "Maria@Hospital.org".into(),
            name: "Maria".into(),
            role: UserRole::Supervisor,
            phone: Some("555-0101".into()),
            password: "password123".into(),
        })
        .await?;
        assert_eq!(u.email, "maria@hospital.org");

        let dup = create_user(&db, None, NewUser {
            email: "maria@hospital.org".into(),
            name: "Other".into(),
            role: UserRole::Viewer,
            phone: None,
            password: "password123".into(),
        })
        .await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let short = create_user(&db, None, NewUser {
            email: "short@hospital.org".into(),
            name: "Short".into(),
            role: UserRole::Viewer,
            phone: None,
            password: "1234".into(),
        })
        .await;
        assert!(matches!(short, Err(ServiceError::Validation(_))));

        let updated = update_user(&db, Some(actor), u.id, UserUpdate { name: Some("Maria P.".into()), active: Some(false), ..Default::default() }).await?;
        assert_eq!(updated.name, "Maria P.");
        assert!(!updated.active);

        let listed = list_users(&db, UserFilter { active: Some(false), ..Default::default() }, Pagination::default()).await?;
        assert_eq!(listed.total, 1);
        let searched = list_users(&db, UserFilter { search: Some("maria".into()), ..Default::default() }, Pagination::default()).await?;
        assert_eq!(searched.total, 1);

        delete_user(&db, Some(actor), u.id, false).await?;
        assert!(get_user(&db, u.id).await?.deleted_at.is_some());
        assert_eq!(list_users(&db, UserFilter::default(), Pagination::default()).await?.total, 0);

        delete_user(&db, Some(actor), u.id, true).await?;
        assert!(matches!(get_user(&db, u.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn change_password_checks_current() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = technician(&db, "pw@hospital.org").await?;

        let wrong = change_password(&db, None, u.id, "not-the-password", "new-password-1").await;
        assert!(matches!(wrong, Err(ServiceError::Unauthorized)));

        change_password(&db, None, u.id, "s3cure-pass", "new-password-1").await?;
        let ok = user_credentials::verify_password(&db, u.id, |h| verify_hash("new-password-1", h)).await?;
        assert!(ok);
        Ok(())
    }

    #[tokio::test]
    async fn only_active_field_staff_are_assignable() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let tech = technician(&db, "field@hospital.org").await?;
        assert!(require_assignable(&db, tech.id).await.is_ok());

        let viewer = create_user(&db, None, NewUser {
            email: "viewer@hospital.org".into(),
            name: "Viewer".into(),
            role: UserRole::Viewer,
            phone: None,
            password: "password123".into(),
        })
        .await?;
        assert!(matches!(require_assignable(&db, viewer.id).await, Err(ServiceError::Validation(_))));

        update_user(&db, None, tech.id, UserUpdate { active: Some(false), ..Default::default() }).await?;
        assert!(require_assignable(&db, tech.id).await.is_err());
        Ok(())
    }
}
