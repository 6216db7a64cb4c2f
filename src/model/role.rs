use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Admins and HR may act on other users' records and decide leave requests.
    pub fn is_approver(self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}
