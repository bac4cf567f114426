//! The closed role model and the authorization table.
//!
//! Roles come from the external directory but are represented locally as a
//! tagged enum so call sites can never compare against a misspelled string.
//! [`is_allowed`] is the single authorization decision point; handlers must
//! not re-derive role checks ad hoc.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A user's role, as assigned in the external directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Employee,
}

impl Role {
    /// The database / wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "supervisor" => Ok(Role::Supervisor),
            "employee" => Ok(Role::Employee),
            other => Err(CoreError::Validation(format!("Unknown role: {other}"))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations subject to an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Report one's own online/offline status.
    ReportStatus,
    /// Read one's own presence status and pending commands.
    ReadOwnState,
    /// Issue a START/STOP command at an employee.
    IssueCommand,
    /// Acknowledge delivered commands.
    AcknowledgeCommand,
    /// Assign or remove roles (mirrors to the directory).
    ManageRoles,
}

/// The authorization table: which role may perform which operation.
///
/// Pure and total, so the policy is testable without any HTTP or storage
/// in the loop.
pub fn is_allowed(role: Role, op: Operation) -> bool {
    match op {
        Operation::ReportStatus | Operation::ReadOwnState => true,
        Operation::AcknowledgeCommand => true,
        Operation::IssueCommand => matches!(role, Role::Admin | Role::Supervisor),
        Operation::ManageRoles => matches!(role, Role::Admin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Supervisor, Role::Employee] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_a_validation_error() {
        let err = Role::from_str("manager").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn only_supervisors_and_admins_issue_commands() {
        assert!(is_allowed(Role::Admin, Operation::IssueCommand));
        assert!(is_allowed(Role::Supervisor, Operation::IssueCommand));
        assert!(!is_allowed(Role::Employee, Operation::IssueCommand));
    }

    #[test]
    fn only_admins_manage_roles() {
        assert!(is_allowed(Role::Admin, Operation::ManageRoles));
        assert!(!is_allowed(Role::Supervisor, Operation::ManageRoles));
        assert!(!is_allowed(Role::Employee, Operation::ManageRoles));
    }

    #[test]
    fn everyone_reports_and_reads_own_state() {
        for role in [Role::Admin, Role::Supervisor, Role::Employee] {
            assert!(is_allowed(role, Operation::ReportStatus));
            assert!(is_allowed(role, Operation::ReadOwnState));
            assert!(is_allowed(role, Operation::AcknowledgeCommand));
        }
    }
}
