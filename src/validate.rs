//! Form Validators

pub const MIN_PASSWORD_LEN: usize = 3;
pub const MIN_REASON_LEN: usize = 3;

pub fn required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// `local@domain.tld`, no whitespace
pub fn email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn password(value: &str) -> bool {
    value.chars().count() >= MIN_PASSWORD_LEN
}

/// Deletes must explain themselves
pub fn delete_reason(value: &str) -> bool {
    value.trim().chars().count() >= MIN_REASON_LEN
}

/// The user typed `delete` to confirm a destructive action
pub fn delete_confirmation(value: &str) -> bool {
    value.eq_ignore_ascii_case("delete")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(required(" a "));
        assert!(!required("   "));
    }

    #[test]
    fn test_email() {
        assert!(email("dana@example.co.il"));
        assert!(!email("dana@example"));
        assert!(!email("dana example@x.com"));
        assert!(!email("@x.com"));
        assert!(!email("a@b@c.com"));
    }

    #[test]
    fn test_password_and_reason_lengths() {
        assert!(password("abc"));
        assert!(!password("ab"));
        assert!(delete_reason("  old  "));
        assert!(!delete_reason(" ab "));
    }

    #[test]
    fn test_delete_confirmation() {
        assert!(delete_confirmation("DELETE"));
        assert!(delete_confirmation("Delete"));
        assert!(!delete_confirmation("delete "));
    }
}
