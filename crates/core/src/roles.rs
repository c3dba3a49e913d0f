//! Well-known role name constants.
//!
//! These must match the `role` values the REST API writes into login
//! responses and user records.

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Roles that belong to the operator side (employees and administrators).
pub const STAFF_ROLES: &[&str] = &[ROLE_EMPLOYEE, ROLE_USER, ROLE_ADMIN];

/// Whether `role` is an operator-side role. Comparison ignores case because
/// older accounts were created with capitalised role names.
pub fn is_staff(role: &str) -> bool {
    STAFF_ROLES.iter().any(|r| r.eq_ignore_ascii_case(role))
}

/// Whether `role` is the administrator role.
pub fn is_admin(role: &str) -> bool {
    role.eq_ignore_ascii_case(ROLE_ADMIN)
}

/// Whether `role` is the customer role.
pub fn is_customer(role: &str) -> bool {
    role.eq_ignore_ascii_case(ROLE_CUSTOMER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_roles_ignore_case() {
        assert!(is_staff("Employee"));
        assert!(is_staff("admin"));
        assert!(!is_staff("customer"));
    }

    #[test]
    fn customer_is_not_admin() {
        assert!(is_customer("Customer"));
        assert!(!is_admin("customer"));
    }
}
