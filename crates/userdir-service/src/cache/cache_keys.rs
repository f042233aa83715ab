//! Cache key generators for consistent key naming.

use std::time::Duration;
use userdir_core::UserId;

/// Lifetime of a cached user snapshot (30 minutes).
pub const USER_TTL: Duration = Duration::from_secs(1800);

/// Cache key holding the JSON snapshot of one user.
#[must_use]
pub fn user(id: UserId) -> String {
    format!("user:{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key() {
        let id = UserId::parse("0190f5a2-7c1e-7b3a-9f00-0a1b2c3d4e5f").unwrap();
        assert_eq!(user(id), "user:0190f5a2-7c1e-7b3a-9f00-0a1b2c3d4e5f");
    }

    #[test]
    fn test_user_ttl_is_thirty_minutes() {
        assert_eq!(USER_TTL.as_secs(), 30 * 60);
    }
}
