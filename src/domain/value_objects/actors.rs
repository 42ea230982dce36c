use uuid::Uuid;

use crate::domain::{
    entities::{memberships::MembershipEntity, messes::MessEntity},
    value_objects::enums::user_roles::UserRole,
};

/// The authenticated caller of a use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn can_manage(&self, mess: &MessEntity) -> bool {
        self.is_admin() || mess.owner_id == self.user_id
    }

    /// Members see their own membership; owners and admins see every membership of their mess.
    pub fn can_view_membership(&self, membership: &MembershipEntity, mess: &MessEntity) -> bool {
        membership.user_id == self.user_id || self.can_manage(mess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mess(owner_id: Uuid) -> MessEntity {
        MessEntity {
            id: Uuid::new_v4(),
            owner_id,
            name: "Annapurna".to_string(),
            address: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_and_admin_can_manage_mess() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        let other_owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = mess(owner.user_id);

        assert!(owner.can_manage(&mess));
        assert!(admin.can_manage(&mess));
        assert!(!other_owner.can_manage(&mess));
    }
}
