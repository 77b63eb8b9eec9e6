//! Pure authorization decisions. Nothing in here touches the database or
//! the request; callers load whatever resource context the rule needs and
//! get back an allow/deny they must enforce before mutating anything.

use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateProperty,
    UpdateProperty,
    DeleteProperty,
    MarkSold,
    ManageUserRole,
    ViewDashboardStats,
    ViewAuditLog,
    ListAllUsers,
    AddFavorite,
    RemoveFavorite,
    ListOwnFavorites,
}

#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl From<&AuthUser> for Actor {
    fn from(user: &AuthUser) -> Self {
        Actor {
            id: user.id,
            role: user.role,
        }
    }
}

/// Resource context for actions whose rules depend on the target.
#[derive(Debug, Clone, Copy)]
pub enum Target {
    /// A property, identified by its owning agent.
    Property { agent_id: Uuid },
    /// A user account, for role management.
    User { id: Uuid },
}

/// Internal deny tags. Logged server-side; callers surface a generic
/// permission error regardless of which rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    AdminsCannotCreateListings,
    NotOwnerOrAdmin,
    NotOwner,
    AdminOnly,
    OwnRoleImmutable,
    MissingTarget,
}

pub fn authorize(action: Action, actor: &Actor, target: Option<&Target>) -> Result<(), DenyReason> {
    match action {
        // Any authenticated role may list a property, except admins, who
        // moderate but never own.
        Action::CreateProperty => match actor.role {
            Role::Admin => Err(DenyReason::AdminsCannotCreateListings),
            Role::Customer | Role::Agent => Ok(()),
        },

        // Owner or admin override.
        Action::UpdateProperty | Action::DeleteProperty => match target {
            Some(Target::Property { agent_id }) => {
                if actor.role == Role::Admin || actor.id == *agent_id {
                    Ok(())
                } else {
                    Err(DenyReason::NotOwnerOrAdmin)
                }
            }
            _ => Err(DenyReason::MissingTarget),
        },

        // Ownership is mandatory here; there is no admin override for
        // closing a sale. (The caller additionally re-verifies the owner's
        // password before transitioning.)
        Action::MarkSold => match target {
            Some(Target::Property { agent_id }) => {
                if actor.id == *agent_id {
                    Ok(())
                } else {
                    Err(DenyReason::NotOwner)
                }
            }
            _ => Err(DenyReason::MissingTarget),
        },

        // Admins assign roles, but never their own.
        Action::ManageUserRole => match (actor.role, target) {
            (Role::Admin, Some(Target::User { id })) => {
                if *id == actor.id {
                    Err(DenyReason::OwnRoleImmutable)
                } else {
                    Ok(())
                }
            }
            (Role::Admin, _) => Err(DenyReason::MissingTarget),
            _ => Err(DenyReason::AdminOnly),
        },

        Action::ViewDashboardStats | Action::ViewAuditLog | Action::ListAllUsers => {
            match actor.role {
                Role::Admin => Ok(()),
                Role::Customer | Role::Agent => Err(DenyReason::AdminOnly),
            }
        }

        // Favorites are always scoped to the actor's own identity taken
        // from the token, so any authenticated role may manage them.
        Action::AddFavorite | Action::RemoveFavorite | Action::ListOwnFavorites => Ok(()),
    }
}

/// Convenience wrapper: logs the deny reason and converts it into the
/// generic permission error handlers return.
pub fn enforce(action: Action, actor: &Actor, target: Option<&Target>) -> Result<(), ApiError> {
    authorize(action, actor, target).map_err(|reason| {
        log::warn!(
            "policy denied {:?} for actor {} ({:?}): {:?}",
            action,
            actor.id,
            actor.role,
            reason
        );
        ApiError::Authorization
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn admins_may_never_create_listings() {
        assert_eq!(
            authorize(Action::CreateProperty, &actor(Role::Admin), None),
            Err(DenyReason::AdminsCannotCreateListings)
        );
    }

    #[test]
    fn agents_and_customers_may_create_listings() {
        assert_eq!(authorize(Action::CreateProperty, &actor(Role::Agent), None), Ok(()));
        assert_eq!(
            authorize(Action::CreateProperty, &actor(Role::Customer), None),
            Ok(())
        );
    }

    #[test]
    fn owner_may_update_and_delete() {
        let owner = actor(Role::Agent);
        let target = Target::Property { agent_id: owner.id };
        assert_eq!(authorize(Action::UpdateProperty, &owner, Some(&target)), Ok(()));
        assert_eq!(authorize(Action::DeleteProperty, &owner, Some(&target)), Ok(()));
    }

    #[test]
    fn admin_override_applies_to_update_and_delete() {
        let admin = actor(Role::Admin);
        let target = Target::Property {
            agent_id: Uuid::new_v4(),
        };
        assert_eq!(authorize(Action::UpdateProperty, &admin, Some(&target)), Ok(()));
        assert_eq!(authorize(Action::DeleteProperty, &admin, Some(&target)), Ok(()));
    }

    #[test]
    fn strangers_are_denied_update_and_delete() {
        let other = actor(Role::Agent);
        let target = Target::Property {
            agent_id: Uuid::new_v4(),
        };
        assert_eq!(
            authorize(Action::UpdateProperty, &other, Some(&target)),
            Err(DenyReason::NotOwnerOrAdmin)
        );
        assert_eq!(
            authorize(Action::DeleteProperty, &other, Some(&target)),
            Err(DenyReason::NotOwnerOrAdmin)
        );
    }

    #[test]
    fn mark_sold_has_no_admin_override() {
        let admin = actor(Role::Admin);
        let target = Target::Property {
            agent_id: Uuid::new_v4(),
        };
        assert_eq!(
            authorize(Action::MarkSold, &admin, Some(&target)),
            Err(DenyReason::NotOwner)
        );
    }

    #[test]
    fn mark_sold_requires_ownership() {
        let owner = actor(Role::Agent);
        let own = Target::Property { agent_id: owner.id };
        let foreign = Target::Property {
            agent_id: Uuid::new_v4(),
        };
        assert_eq!(authorize(Action::MarkSold, &owner, Some(&own)), Ok(()));
        assert_eq!(
            authorize(Action::MarkSold, &owner, Some(&foreign)),
            Err(DenyReason::NotOwner)
        );
    }

    #[test]
    fn role_management_is_admin_only() {
        let target = Target::User { id: Uuid::new_v4() };
        assert_eq!(
            authorize(Action::ManageUserRole, &actor(Role::Agent), Some(&target)),
            Err(DenyReason::AdminOnly)
        );
        assert_eq!(
            authorize(Action::ManageUserRole, &actor(Role::Admin), Some(&target)),
            Ok(())
        );
    }

    #[test]
    fn admins_cannot_change_their_own_role() {
        let admin = actor(Role::Admin);
        let own_account = Target::User { id: admin.id };
        assert_eq!(
            authorize(Action::ManageUserRole, &admin, Some(&own_account)),
            Err(DenyReason::OwnRoleImmutable)
        );
    }

    #[test]
    fn admin_surfaces_are_admin_only() {
        for action in [
            Action::ViewDashboardStats,
            Action::ViewAuditLog,
            Action::ListAllUsers,
        ] {
            assert_eq!(authorize(action, &actor(Role::Admin), None), Ok(()));
            assert_eq!(
                authorize(action, &actor(Role::Agent), None),
                Err(DenyReason::AdminOnly)
            );
            assert_eq!(
                authorize(action, &actor(Role::Customer), None),
                Err(DenyReason::AdminOnly)
            );
        }
    }

    #[test]
    fn favorites_are_open_to_every_authenticated_role() {
        for role in [Role::Customer, Role::Agent, Role::Admin] {
            for action in [
                Action::AddFavorite,
                Action::RemoveFavorite,
                Action::ListOwnFavorites,
            ] {
                assert_eq!(authorize(action, &actor(role), None), Ok(()));
            }
        }
    }

    #[test]
    fn property_actions_without_context_are_denied() {
        let agent = actor(Role::Agent);
        assert_eq!(
            authorize(Action::UpdateProperty, &agent, None),
            Err(DenyReason::MissingTarget)
        );
        assert_eq!(
            authorize(Action::MarkSold, &agent, None),
            Err(DenyReason::MissingTarget)
        );
    }
}
