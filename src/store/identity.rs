use crate::auth::password::{hash_password, verify_password};
use crate::error::Error;
use crate::model::role::Role;
use crate::model::user::User;
use crate::storage::SlotFile;
use anyhow::Result;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// Username/password registry plus the process-wide session pointer.
/// Both persist across restarts in their own slots.
pub struct IdentityStore {
    users_slot: SlotFile,
    session_slot: SlotFile,
    users: Mutex<Vec<User>>,
    session: Mutex<Option<String>>,
}

impl IdentityStore {
    pub fn open(users_slot: SlotFile, session_slot: SlotFile) -> Result<Self> {
        let users = users_slot.load::<Vec<User>>()?.unwrap_or_default();
        let session = session_slot.load::<Option<String>>()?.unwrap_or_default();
        Ok(Self {
            users_slot,
            session_slot,
            users: Mutex::new(users),
            session: Mutex::new(session),
        })
    }

    fn lock_users(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<String>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Creates and persists a new identity, then signs the caller in.
    /// Fails without any state change when the name is taken.
    pub fn register(&self, name: &str, password: &str, role: Role) -> Result<User, Error> {
        let mut users = self.lock_users();
        if users.iter().any(|u| u.name == name) {
            return Err(Error::DuplicateName(name.to_string()));
        }

        let user = User {
            name: name.to_string(),
            password_hash: hash_password(password)?,
            role,
        };

        let mut next = users.clone();
        next.push(user.clone());
        self.users_slot
            .store(&next)
            .map_err(|cause| Error::persistence("identity registry", cause))?;
        *users = next;
        drop(users);

        info!(name, role = %role, "registered new user");
        self.set_session(&user.name)?;
        Ok(user)
    }

    /// Exact name+password match against a stored identity.
    pub fn authenticate(&self, name: &str, password: &str) -> Result<User, Error> {
        let users = self.lock_users();
        let user = users
            .iter()
            .find(|u| u.name == name)
            .ok_or(Error::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(Error::InvalidCredentials);
        }
        Ok(user.clone())
    }

    pub fn user_count(&self) -> usize {
        self.lock_users().len()
    }

    /// The currently signed-in user, if any.
    pub fn current_session(&self) -> Option<User> {
        let name = self.lock_session().clone()?;
        self.lock_users().iter().find(|u| u.name == name).cloned()
    }

    pub fn set_session(&self, name: &str) -> Result<(), Error> {
        let mut session = self.lock_session();
        let next = Some(name.to_string());
        self.session_slot
            .store(&next)
            .map_err(|cause| Error::persistence("session", cause))?;
        *session = next;
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), Error> {
        let mut session = self.lock_session();
        self.session_slot
            .store(&None::<String>)
            .map_err(|cause| Error::persistence("session", cause))?;
        *session = None;
        Ok(())
    }
}
