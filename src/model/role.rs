use serde::{Deserialize, Serialize};

/// Role ids as issued in token claims by the identity service.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
    System = 4,
    ApiUser = 5,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            4 => Some(Role::System),
            5 => Some(Role::ApiUser),
            _ => None,
        }
    }

    /// Dashboards and reports for other employees.
    pub fn can_view_other_employees(self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}
