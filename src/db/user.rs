use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use color_eyre::Result;
use ulid::Ulid;

use super::models::AuthUser;
use super::Db;
use crate::services::auth::AuthRepository;

impl Db {
    pub async fn get_user_by_session(&self, session_id: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT u.id, u.org_id, u.email, u.display_name, u.is_admin
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Seed the admin account on startup when configured and missing.
    pub async fn ensure_admin_user(&self, email: &str, password: &str) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        let user_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, display_name, is_admin)
            VALUES ($1, $2, 'Administrator', TRUE)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("admin user created: id={user_id}, email={email}");
        Ok(())
    }
}

impl AuthRepository for Db {
    fn email_exists(&self, email: &str) -> impl std::future::Future<Output = Result<bool>> + Send {
        async move {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                    .bind(email)
                    .fetch_one(&self.pool)
                    .await?;
            Ok(exists)
        }
    }

    /// Creates the organization and its first user atomically.
    fn create_partner(
        &self,
        org_name: &str,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> impl std::future::Future<Output = Result<i64>> + Send {
        async move {
            let password_hash = hash_password(password)?;
            let mut tx = self.pool.begin().await?;

            let org_id: i64 =
                sqlx::query_scalar("INSERT INTO organizations (name) VALUES ($1) RETURNING id")
                    .bind(org_name)
                    .fetch_one(&mut *tx)
                    .await?;

            let user_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO users (org_id, email, password_hash, display_name)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(org_id)
            .bind(email)
            .bind(&password_hash)
            .bind(display_name)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;

            tracing::info!("new partner created: user_id={user_id}, org_id={org_id}, email={email}");
            Ok(user_id)
        }
    }

    fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send {
        async move {
            let stored_hash: Option<String> =
                sqlx::query_scalar("SELECT password_hash FROM users WHERE email = $1")
                    .bind(email)
                    .fetch_optional(&self.pool)
                    .await?;

            match stored_hash {
                Some(hash) => Ok(verify_password(password, &hash)),
                None => Ok(false),
            }
        }
    }

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<AuthUser>>> + Send {
        async move {
            let user = sqlx::query_as::<_, AuthUser>(
                "SELECT id, org_id, email, display_name, is_admin FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
            Ok(user)
        }
    }

    fn create_user_session(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<String>> + Send {
        async move {
            let session = Ulid::new().to_string();

            sqlx::query("INSERT INTO user_sessions (id, user_id) VALUES ($1, $2)")
                .bind(&session)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

            tracing::info!("new user session created for user_id={user_id}");
            Ok(session)
        }
    }

    fn delete_user_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            sqlx::query("DELETE FROM user_sessions WHERE id = $1")
                .bind(session_id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }
    }

    fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send {
        async move {
            let stored_hash: Option<String> =
                sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
                    .bind(user_id)
                    .fetch_optional(&self.pool)
                    .await?;

            let Some(hash) = stored_hash else {
                return Ok(false);
            };

            if !verify_password(current_password, &hash) {
                return Ok(false);
            }

            let new_hash = hash_password(new_password)?;
            sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
                .bind(&new_hash)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

            tracing::info!("password changed for user_id={user_id}");
            Ok(true)
        }
    }

    fn update_display_name(
        &self,
        user_id: i64,
        display_name: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            sqlx::query("UPDATE users SET display_name = $1 WHERE id = $2")
                .bind(display_name)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }
    }
}

/// Run argon2 hashing on a dedicated thread with a large stack to avoid
/// stack overflow in debug builds.
fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024) // 4 MB stack
        .spawn(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::default();
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| color_eyre::eyre::eyre!("failed to hash password: {e}"))
        })?
        .join()
        .map_err(|_| color_eyre::eyre::eyre!("hash thread panicked"))?
}

fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024)
        .spawn(move || {
            let parsed_hash = match PasswordHash::new(&hash) {
                Ok(h) => h,
                Err(_) => return false,
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .map(|h| h.join().unwrap_or(false))
        .unwrap_or(false)
}
