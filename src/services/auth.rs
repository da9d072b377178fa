use color_eyre::Result;

use crate::db::models::AuthUser;
use crate::db::Db;

// ---------------------------------------------------------------------------
// AuthRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AuthRepository: Send + Sync {
    fn email_exists(&self, email: &str) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Creates the partner organization and its first user atomically.
    fn create_partner(
        &self,
        org_name: &str,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> impl std::future::Future<Output = Result<i64>> + Send;

    fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<AuthUser>>> + Send;

    fn create_user_session(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn delete_user_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn update_display_name(
        &self,
        user_id: i64,
        display_name: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// Outcome enums
// ---------------------------------------------------------------------------

pub enum RegisterOutcome {
    /// Partner created and session started. Contains the session token.
    LoggedIn(String),
    /// Required fields were empty.
    EmptyFields,
    /// Email already in use.
    EmailTaken,
    /// Password does not meet minimum requirements.
    WeakPassword,
}

pub enum LoginOutcome {
    /// Login succeeded. Contains the session token.
    Success(String),
    /// Password was incorrect (or email not found).
    InvalidCredentials,
}

pub enum ChangePasswordOutcome {
    Success,
    EmptyFields,
    WeakPassword,
    IncorrectPassword,
}

pub enum UpdateProfileOutcome {
    Success,
    EmptyName,
}

const MIN_PASSWORD_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

pub struct AuthService<R: AuthRepository = Db> {
    repo: R,
}

impl<R: AuthRepository + Clone> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let verified = self.repo.verify_user_password(email, password).await?;

        if !verified {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let user =
            self.repo.find_user_by_email(email).await?.ok_or_else(|| {
                color_eyre::eyre::eyre!("user not found after password verification")
            })?;

        let session_token = self.repo.create_user_session(user.id).await?;

        Ok(LoginOutcome::Success(session_token))
    }

    pub async fn register(
        &self,
        org_name: &str,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<RegisterOutcome> {
        if org_name.is_empty() || email.is_empty() || password.is_empty() || display_name.is_empty()
        {
            return Ok(RegisterOutcome::EmptyFields);
        }

        if password.len() < MIN_PASSWORD_LENGTH {
            return Ok(RegisterOutcome::WeakPassword);
        }

        let exists = self.repo.email_exists(email).await?;
        if exists {
            return Ok(RegisterOutcome::EmailTaken);
        }

        let user_id = self
            .repo
            .create_partner(org_name, email, password, display_name)
            .await?;
        let session_token = self.repo.create_user_session(user_id).await?;

        Ok(RegisterOutcome::LoggedIn(session_token))
    }

    pub async fn logout(&self, session_id: &str) -> Result<()> {
        self.repo.delete_user_session(session_id).await
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<ChangePasswordOutcome> {
        if current_password.is_empty() || new_password.is_empty() {
            return Ok(ChangePasswordOutcome::EmptyFields);
        }

        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Ok(ChangePasswordOutcome::WeakPassword);
        }

        let changed = self
            .repo
            .change_password(user_id, current_password, new_password)
            .await?;

        if changed {
            Ok(ChangePasswordOutcome::Success)
        } else {
            Ok(ChangePasswordOutcome::IncorrectPassword)
        }
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        display_name: &str,
    ) -> Result<UpdateProfileOutcome> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Ok(UpdateProfileOutcome::EmptyName);
        }

        self.repo.update_display_name(user_id, display_name).await?;
        Ok(UpdateProfileOutcome::Success)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(mock_repo: MockAuthRepository) -> AuthService<MockAuthRepository> {
        AuthService::new(mock_repo)
    }

    // ----- login tests -----

    #[tokio::test]
    async fn login_success_returns_session_token() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_user_password()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        mock.expect_find_user_by_email().returning(|_| {
            Box::pin(async {
                Ok(Some(AuthUser {
                    id: 1,
                    org_id: Some(1),
                    email: "partner@example.com".to_string(),
                    display_name: "Partner".to_string(),
                    is_admin: false,
                }))
            })
        });
        mock.expect_create_user_session()
            .returning(|_| Box::pin(async { Ok("session-token-123".to_string()) }));

        let svc = service(mock);
        let outcome = svc.login("partner@example.com", "password").await.unwrap();

        assert!(matches!(outcome, LoginOutcome::Success(ref t) if t == "session-token-123"));
    }

    #[tokio::test]
    async fn login_wrong_password_returns_invalid_credentials() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_user_password()
            .returning(|_, _| Box::pin(async { Ok(false) }));

        let svc = service(mock);
        let outcome = svc.login("partner@example.com", "wrong").await.unwrap();

        assert!(matches!(outcome, LoginOutcome::InvalidCredentials));
    }

    // ----- register tests -----

    #[tokio::test]
    async fn register_empty_fields_returns_empty_fields() {
        let mock = MockAuthRepository::new();
        let svc = service(mock);

        let outcome = svc.register("", "a@b.com", "password123", "name").await.unwrap();
        assert!(matches!(outcome, RegisterOutcome::EmptyFields));

        let mock = MockAuthRepository::new();
        let svc = service(mock);
        let outcome = svc.register("Acme", "", "password123", "name").await.unwrap();
        assert!(matches!(outcome, RegisterOutcome::EmptyFields));

        let mock = MockAuthRepository::new();
        let svc = service(mock);
        let outcome = svc.register("Acme", "a@b.com", "password123", "").await.unwrap();
        assert!(matches!(outcome, RegisterOutcome::EmptyFields));
    }

    #[tokio::test]
    async fn register_short_password_returns_weak_password() {
        let mock = MockAuthRepository::new();
        let svc = service(mock);

        let outcome = svc.register("Acme", "a@b.com", "short", "name").await.unwrap();
        assert!(matches!(outcome, RegisterOutcome::WeakPassword));
    }

    #[tokio::test]
    async fn register_email_taken_returns_email_taken() {
        let mut mock = MockAuthRepository::new();
        mock.expect_email_exists()
            .returning(|_| Box::pin(async { Ok(true) }));

        let svc = service(mock);
        let outcome = svc
            .register("Acme", "taken@example.com", "password123", "name")
            .await
            .unwrap();

        assert!(matches!(outcome, RegisterOutcome::EmailTaken));
    }

    #[tokio::test]
    async fn register_success_creates_partner_and_session() {
        let mut mock = MockAuthRepository::new();
        mock.expect_email_exists()
            .returning(|_| Box::pin(async { Ok(false) }));
        mock.expect_create_partner()
            .returning(|_, _, _, _| Box::pin(async { Ok(7) }));
        mock.expect_create_user_session()
            .withf(|user_id| *user_id == 7)
            .returning(|_| Box::pin(async { Ok("session-abc".to_string()) }));

        let svc = service(mock);
        let outcome = svc
            .register("Acme Corp", "new@example.com", "password123", "Ada")
            .await
            .unwrap();

        assert!(matches!(outcome, RegisterOutcome::LoggedIn(ref t) if t == "session-abc"));
    }

    // ----- change password tests -----

    #[tokio::test]
    async fn change_password_empty_fields() {
        let mock = MockAuthRepository::new();
        let svc = service(mock);

        let outcome = svc.change_password(1, "", "newpassword").await.unwrap();
        assert!(matches!(outcome, ChangePasswordOutcome::EmptyFields));
    }

    #[tokio::test]
    async fn change_password_weak_new_password() {
        let mock = MockAuthRepository::new();
        let svc = service(mock);

        let outcome = svc.change_password(1, "current", "short").await.unwrap();
        assert!(matches!(outcome, ChangePasswordOutcome::WeakPassword));
    }

    #[tokio::test]
    async fn change_password_wrong_current_password() {
        let mut mock = MockAuthRepository::new();
        mock.expect_change_password()
            .returning(|_, _, _| Box::pin(async { Ok(false) }));

        let svc = service(mock);
        let outcome = svc
            .change_password(1, "wrong", "newpassword123")
            .await
            .unwrap();

        assert!(matches!(outcome, ChangePasswordOutcome::IncorrectPassword));
    }

    #[tokio::test]
    async fn change_password_success() {
        let mut mock = MockAuthRepository::new();
        mock.expect_change_password()
            .returning(|_, _, _| Box::pin(async { Ok(true) }));

        let svc = service(mock);
        let outcome = svc
            .change_password(1, "current", "newpassword123")
            .await
            .unwrap();

        assert!(matches!(outcome, ChangePasswordOutcome::Success));
    }

    // ----- profile tests -----

    #[tokio::test]
    async fn update_profile_rejects_blank_name() {
        let mock = MockAuthRepository::new();
        let svc = service(mock);

        let outcome = svc.update_profile(1, "   ").await.unwrap();
        assert!(matches!(outcome, UpdateProfileOutcome::EmptyName));
    }

    #[tokio::test]
    async fn update_profile_trims_and_saves() {
        let mut mock = MockAuthRepository::new();
        mock.expect_update_display_name()
            .withf(|_, name| name == "Ada Lovelace")
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let svc = service(mock);
        let outcome = svc.update_profile(1, "  Ada Lovelace  ").await.unwrap();

        assert!(matches!(outcome, UpdateProfileOutcome::Success));
    }
}
