use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, LoginInput, SignupInput};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token::TokenService;

/// Token lifetime policy. Login tokens are deliberately shorter-lived than
/// signup tokens.
#[derive(Clone)]
pub struct AuthPolicy {
    pub signup_ttl: chrono::Duration,
    pub login_ttl: chrono::Duration,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            signup_ttl: chrono::Duration::hours(1),
            login_ttl: chrono::Duration::minutes(30),
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    tokens: TokenService,
    policy: AuthPolicy,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenService, policy: AuthPolicy) -> Self {
        Self { repo, tokens, policy }
    }

    /// Register a new user with a hashed password and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthPolicy}, repository::mock::MockAuthRepository, token::TokenService};
    /// use service::auth::domain::SignupInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, TokenService::new("secret"), AuthPolicy::default());
    /// let input = SignupInput { name: "Ann".into(), email: "ann@x.com".into(), password: "secret1".into(), image: "uploads/ann.png".into() };
    /// let session = tokio_test::block_on(svc.signup(input)).unwrap();
    /// assert_eq!(session.email, "ann@x.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn signup(&self, input: SignupInput) -> Result<AuthSession, AuthError> {
        models::user::validate_name(&input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        models::user::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        if input.password.len() < 6 {
            return Err(AuthError::Validation("password too short (>=6)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self.repo.create_user(&input.email, &input.name, &input.image).await?;
        let _cred = self.repo.upsert_password(user.id, hash, "argon2".to_string()).await?;

        let token = self.tokens.issue(user.id, &user.email, self.policy.signup_ttl)?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(AuthSession { user_id: user.id, email: user.email, token })
    }

    /// Authenticate a user and issue a session token.
    ///
    /// Unknown email and wrong password yield the same error so callers
    /// cannot probe which addresses are registered.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthPolicy}, repository::mock::MockAuthRepository, token::TokenService};
    /// use service::auth::domain::{SignupInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, TokenService::new("secret"), AuthPolicy::default());
    /// let _ = tokio_test::block_on(svc.signup(SignupInput { name: "N".into(), email: "u@e.com".into(), password: "Passw0rd".into(), image: String::new() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.email, "u@e.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.tokens.issue(user.id, &user.email, self.policy.login_ttl)?;
        info!(user_id = %user.id, email = %user.email, "user_logged_in");
        Ok(AuthSession { user_id: user.id, email: user.email, token })
    }

    /// List all users. Password hashes live behind the credentials store and
    /// never appear on `AuthUser`.
    pub async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError> {
        self.repo.list_users().await
    }

    /// Access to the token codec for gate-side verification.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            TokenService::new("test-secret"),
            AuthPolicy::default(),
        )
    }

    fn signup_input(email: &str) -> SignupInput {
        SignupInput {
            name: "Ann".into(),
            email: email.into(),
            password: "secret1".into(),
            image: "uploads/ann.png".into(),
        }
    }

    #[tokio::test]
    async fn signup_token_round_trips_to_user_id() {
        let svc = svc();
        let session = svc.signup(signup_input("ann@x.com")).await.unwrap();
        let claims = svc.tokens().verify(&session.token).unwrap();
        assert_eq!(claims.uid, session.user_id);
        assert_eq!(claims.sub, "ann@x.com");
    }

    #[tokio::test]
    async fn signup_rejects_invalid_fields() {
        let svc = svc();
        let mut bad_name = signup_input("a@x.com");
        bad_name.name = "  ".into();
        assert!(matches!(svc.signup(bad_name).await, Err(AuthError::Validation(_))));

        let mut bad_email = signup_input("not-an-email");
        bad_email.email = "not-an-email".into();
        assert!(matches!(svc.signup(bad_email).await, Err(AuthError::Validation(_))));

        let mut short_pw = signup_input("b@x.com");
        short_pw.password = "five5".into();
        assert!(matches!(svc.signup(short_pw).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn signup_duplicate_email_conflicts() {
        let svc = svc();
        svc.signup(signup_input("dup@x.com")).await.unwrap();
        assert!(matches!(svc.signup(signup_input("dup@x.com")).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn login_flow_and_non_distinguishing_failures() {
        let svc = svc();
        svc.signup(signup_input("ann@x.com")).await.unwrap();

        // wrong password
        let wrong = svc
            .login(LoginInput { email: "ann@x.com".into(), password: "wrong".into() })
            .await
            .unwrap_err();
        // unknown email
        let unknown = svc
            .login(LoginInput { email: "ghost@x.com".into(), password: "secret1".into() })
            .await
            .unwrap_err();
        assert!(matches!(wrong, AuthError::Unauthorized));
        assert!(matches!(unknown, AuthError::Unauthorized));
        assert_eq!(wrong.to_string(), unknown.to_string());

        // correct password succeeds
        let ok = svc
            .login(LoginInput { email: "ann@x.com".into(), password: "secret1".into() })
            .await
            .unwrap();
        assert!(!ok.token.is_empty());
    }

    #[tokio::test]
    async fn listed_users_never_carry_password_material() {
        let svc = svc();
        svc.signup(signup_input("one@x.com")).await.unwrap();
        svc.signup(signup_input("two@x.com")).await.unwrap();
        let users = svc.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        // AuthUser has no password field at all; spot-check the JSON too.
        let json = serde_json::to_string(&users).unwrap();
        assert!(!json.contains("password"));
    }
}
