use crate::error::{SessionError, ValidationError};
use crate::store::LocalCache;
use catalog_api::AccountBackend;
use catalog_models::{ProfileUpdate, Registration, SessionUser, UserPatch, DEMO_USER_ID};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

pub const MIN_PASSWORD_LEN: usize = 4;

/// The logged-in user (if any), persisted under the `user` cache key
pub struct Session {
    backend: Arc<dyn AccountBackend>,
    cache: LocalCache,
    current: RwLock<Option<SessionUser>>,
}

impl Session {
    /// Resume whatever session the cache holds
    pub fn restore(backend: Arc<dyn AccountBackend>, cache: LocalCache) -> Self {
        let current = cache.user();
        match &current {
            Some(user) => debug!("Restored session for {} (id {})", user.username, user.user_id),
            None => debug!("No stored session, using demo user id {}", DEMO_USER_ID),
        }
        Self {
            backend,
            cache,
            current: RwLock::new(current),
        }
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in_id().is_some()
    }

    pub fn logged_in_id(&self) -> Option<i64> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|u| u.user_id)
    }

    /// Id used for reviews and search logs: the logged-in user, else the demo id
    pub fn user_id(&self) -> i64 {
        self.logged_in_id().unwrap_or(DEMO_USER_ID)
    }

    pub fn username(&self) -> Option<String> {
        self.current_user().map(|u| u.username)
    }

    fn set_current(&self, user: SessionUser) -> Result<SessionUser, SessionError> {
        self.cache.set_user(&user)?;
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(user.clone());
        Ok(user)
    }

    pub async fn login(&self, identifier: &str, password: &str) -> Result<SessionUser, SessionError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }

        let user = self.backend.login(identifier, password).await?;
        info!("Logged in as {} (id {})", user.username, user.user_id);
        self.set_current(user)
    }

    pub async fn register(&self, registration: Registration) -> Result<SessionUser, SessionError> {
        let registration = Registration {
            username: registration.username.trim().to_string(),
            email: registration.email.trim().to_string(),
            password: registration.password,
            display_name: non_blank(registration.display_name),
        };
        if registration.username.is_empty()
            || registration.email.is_empty()
            || registration.password.is_empty()
        {
            return Err(ValidationError::MissingCredentials.into());
        }
        check_password(&registration.password)?;

        let user = self.backend.register(&registration).await?;
        info!("Registered {} (id {})", user.username, user.user_id);
        self.set_current(user)
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.cache.clear_user()?;
        let previous = self.current.write().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(user) = previous {
            info!("Logged out {}", user.username);
        }
        Ok(())
    }

    /// Blank fields are left unchanged
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<SessionUser, SessionError> {
        let user_id = self.logged_in_id().ok_or(SessionError::NotLoggedIn)?;
        let update = ProfileUpdate {
            display_name: non_blank(update.display_name),
            bio: non_blank(update.bio),
            password: update.password.filter(|p| !p.is_empty()),
        };
        if update.is_empty() {
            return Err(SessionError::NothingToUpdate);
        }
        if let Some(password) = &update.password {
            check_password(password)?;
        }

        let user = self.backend.update_profile(user_id, &update).await?;
        info!("Updated profile for {}", user.username);
        self.set_current(user)
    }

    fn require_admin(&self) -> Result<SessionUser, SessionError> {
        let user = self.current_user().ok_or(SessionError::NotLoggedIn)?;
        if !user.is_admin {
            return Err(SessionError::NotAdmin);
        }
        Ok(user)
    }

    fn require_other_user(&self, target: i64) -> Result<(), SessionError> {
        let admin = self.require_admin()?;
        if admin.user_id == target {
            return Err(SessionError::SelfModification);
        }
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<SessionUser>, SessionError> {
        self.require_admin()?;
        Ok(self.backend.list_users().await?)
    }

    pub async fn update_user(&self, user_id: i64, patch: &UserPatch) -> Result<SessionUser, SessionError> {
        self.require_other_user(user_id)?;
        if patch.is_empty() {
            return Err(SessionError::NothingToUpdate);
        }
        let updated = self.backend.update_user(user_id, patch).await?;
        info!(
            "Updated user {}: admin={}, active={}",
            updated.user_id, updated.is_admin, updated.is_active
        );
        Ok(updated)
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), SessionError> {
        self.require_other_user(user_id)?;
        self.backend.delete_user(user_id).await?;
        info!("Deleted user {}", user_id);
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user, FakeBackend};

    fn session_with(backend: Arc<FakeBackend>, cache: LocalCache) -> Session {
        Session::restore(backend, cache)
    }

    fn backend_with_users() -> Arc<FakeBackend> {
        let backend = Arc::new(FakeBackend::new());
        backend
            .users
            .lock()
            .unwrap()
            .extend([user(1, "root", true), user(2, "ana", false)]);
        backend
    }

    #[tokio::test]
    async fn test_logged_out_uses_demo_id() {
        let session = session_with(Arc::new(FakeBackend::new()), LocalCache::in_memory());
        assert!(!session.is_logged_in());
        assert_eq!(session.user_id(), DEMO_USER_ID);
    }

    #[tokio::test]
    async fn test_login_persists_user_and_restores() {
        let backend = backend_with_users();
        let cache = LocalCache::in_memory();
        let session = session_with(backend.clone(), cache.clone());

        let logged_in = session.login("ana", "secret").await.unwrap();
        assert_eq!(logged_in.user_id, 2);
        assert_eq!(session.user_id(), 2);

        let restored = session_with(backend, cache.clone());
        assert_eq!(restored.user_id(), 2);

        restored.logout().unwrap();
        assert_eq!(restored.user_id(), DEMO_USER_ID);
        assert!(cache.user().is_none());
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let backend = backend_with_users();
        let session = session_with(backend, LocalCache::in_memory());

        let err = session.login("ana", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_validation_happens_before_network() {
        let backend = backend_with_users();
        let session = session_with(backend.clone(), LocalCache::in_memory());

        let err = session.login("  ", "secret").await.unwrap_err();
        assert!(matches!(err, SessionError::Invalid(ValidationError::MissingCredentials)));

        let err = session
            .register(Registration {
                username: "bo".to_string(),
                email: "bo@example.com".to_string(),
                password: "abc".to_string(),
                display_name: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Invalid(ValidationError::PasswordTooShort { min: 4 })
        ));

        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_register_logs_in() {
        let backend = backend_with_users();
        let session = session_with(backend, LocalCache::in_memory());

        let created = session
            .register(Registration {
                username: " bo ".to_string(),
                email: "bo@example.com".to_string(),
                password: "abcd".to_string(),
                display_name: Some("  ".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(created.username, "bo");
        assert_eq!(created.display_name, None);
        assert_eq!(session.user_id(), created.user_id);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let backend = backend_with_users();
        let cache = LocalCache::in_memory();
        let session = session_with(backend, cache.clone());

        let err = session.update_profile(ProfileUpdate::default()).await.unwrap_err();
        assert!(matches!(err, SessionError::NotLoggedIn));

        session.login("ana", "secret").await.unwrap();
        let err = session
            .update_profile(ProfileUpdate {
                bio: Some(" ".to_string()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NothingToUpdate));

        let updated = session
            .update_profile(ProfileUpdate {
                display_name: Some("Ana B.".to_string()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.label(), "Ana B.");
        assert_eq!(cache.user().unwrap().display_name.as_deref(), Some("Ana B."));
    }

    #[tokio::test]
    async fn test_admin_checks() {
        let backend = backend_with_users();
        let session = session_with(backend.clone(), LocalCache::in_memory());

        assert!(matches!(session.list_users().await, Err(SessionError::NotLoggedIn)));

        session.login("ana", "secret").await.unwrap();
        assert!(matches!(session.list_users().await, Err(SessionError::NotAdmin)));

        session.login("root", "secret").await.unwrap();
        assert_eq!(session.list_users().await.unwrap().len(), 2);

        let patch = UserPatch {
            is_admin: Some(false),
            is_active: None,
        };
        assert!(matches!(
            session.update_user(1, &patch).await,
            Err(SessionError::SelfModification)
        ));
        assert!(matches!(session.delete_user(1).await, Err(SessionError::SelfModification)));

        let promoted = session
            .update_user(
                2,
                &UserPatch {
                    is_admin: Some(true),
                    is_active: None,
                },
            )
            .await
            .unwrap();
        assert!(promoted.is_admin);

        session.delete_user(2).await.unwrap();
        assert_eq!(backend.users.lock().unwrap().len(), 1);
    }
}
