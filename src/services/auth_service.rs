//! Credential service: registration, login and the admin user operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{generate_token, Claims};
use crate::database::with_transaction;
use crate::error::{ApiError, FieldError};
use crate::models::user::{LoginRequest, RegisterRequest, User, UserRole};

/// Message returned for every credential failure that must not reveal
/// whether the email exists.
const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Successful register/login: the issued token plus the account it asserts.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an account and issue a token. The uniqueness checks and the
    /// insert run in one transaction; email is checked before username, and
    /// the first hit wins the error message.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthOutcome, ApiError> {
        if let Err(errors) = request.validate() {
            return Err(ApiError::validation("Validation error", errors));
        }

        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();
        let password_hash = hash_password(&request.password)?;

        let user = with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let email_taken: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                        .bind(&email)
                        .fetch_one(&mut **tx)
                        .await?;
                if email_taken {
                    return Err(ApiError::conflict(
                        "This email is already in use",
                        vec![FieldError::new("email", "This value already exists")],
                    ));
                }

                let username_taken: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                        .bind(&username)
                        .fetch_one(&mut **tx)
                        .await?;
                if username_taken {
                    return Err(ApiError::conflict(
                        "This username is already taken",
                        vec![FieldError::new("username", "This value already exists")],
                    ));
                }

                let user = sqlx::query_as::<_, User>(
                    "INSERT INTO users (id, username, email, password_hash) \
                     VALUES ($1, $2, $3, $4) RETURNING *",
                )
                .bind(Uuid::new_v4())
                .bind(&username)
                .bind(&email)
                .bind(&password_hash)
                .fetch_one(&mut **tx)
                .await?;

                Ok(user)
            })
        })
        .await?;

        let token = generate_token(&Claims::new(user.id, user.email.clone(), user.role))?;
        Ok(AuthOutcome { token, user })
    }

    /// Verify credentials and issue a token. Unknown email and wrong
    /// password produce the same response; a deactivated account gets its
    /// own message, but only after the email matched.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthOutcome, ApiError> {
        if let Err(errors) = request.validate() {
            return Err(ApiError::validation("Validation error", errors));
        }

        let email = request.email.trim().to_lowercase();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::unauthorized(BAD_CREDENTIALS))?;

        if !user.is_active {
            return Err(ApiError::unauthorized("This account has been deactivated"));
        }

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        }

        let token = generate_token(&Claims::new(user.id, user.email.clone(), user.role))?;
        Ok(AuthOutcome { token, user })
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn change_role(&self, user_id: Uuid, role: UserRole) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET role = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(role.as_str())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(user)
    }

    /// Deactivated accounts keep their row but can no longer log in.
    pub async fn deactivate(&self, user_id: Uuid) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = false, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(user)
    }
}
