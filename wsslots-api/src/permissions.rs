//! Edit and create permission checks, run before the coordinator.

use crate::config::PermissionsConfig;
use thiserror::Error;
use wsslots_types::{ActorId, Title};

/// A right an edit requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Create,
}

impl Action {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Create => "create",
        }
    }

    /// Rights needed to save to a page: creating also needs `create`.
    #[must_use]
    pub fn for_page(exists: bool) -> &'static [Action] {
        if exists {
            &[Action::Edit]
        } else {
            &[Action::Edit, Action::Create]
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("You have been blocked from editing.")]
    Blocked,

    #[error("You must be logged in to {action} \"{title}\".")]
    NotLoggedIn { action: Action, title: Title },

    #[error("You do not have permission to {action} \"{title}\".")]
    Denied { action: Action, title: Title },
}

impl PermissionError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::NotLoggedIn { .. } => "notloggedin",
            Self::Denied { .. } => "permissiondenied",
        }
    }
}

/// Decides whether an actor may perform actions on a page.
pub trait PermissionChecker: Send + Sync {
    fn check(&self, actor: &ActorId, title: &Title, actions: &[Action])
    -> Result<(), PermissionError>;
}

/// Permissions driven by the `[permissions]` config section.
pub struct ConfigPermissions {
    config: PermissionsConfig,
}

impl ConfigPermissions {
    pub fn new(config: PermissionsConfig) -> Self {
        Self { config }
    }

    fn is_blocked(&self, actor: &ActorId) -> bool {
        match actor {
            ActorId::Anonymous => false,
            ActorId::User(name) => self.config.blocked.iter().any(|b| b == name),
        }
    }
}

impl PermissionChecker for ConfigPermissions {
    fn check(
        &self,
        actor: &ActorId,
        title: &Title,
        actions: &[Action],
    ) -> Result<(), PermissionError> {
        if self.is_blocked(actor) {
            return Err(PermissionError::Blocked);
        }

        for &action in actions {
            let allowed = match (actor, action) {
                (ActorId::Anonymous, Action::Edit) => self.config.anonymous_edit,
                (ActorId::Anonymous, Action::Create) => self.config.anonymous_create,
                (ActorId::User(_), Action::Edit) => true,
                (ActorId::User(name), Action::Create) => {
                    !self.config.no_create.iter().any(|n| n == name)
                }
            };
            if !allowed {
                let title = title.clone();
                return Err(if actor.is_anonymous() {
                    PermissionError::NotLoggedIn { action, title }
                } else {
                    PermissionError::Denied { action, title }
                });
            }
        }
        Ok(())
    }
}
