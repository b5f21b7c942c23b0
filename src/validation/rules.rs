//! Named format and presence predicates for validation chains.
//!
//! Every predicate takes the optional raw field value. Predicates other
//! than `required`/`present` pass on an absent value, so optional fields
//! compose the same rule list without a presence unit in front.

use super::{RuleError, RuleResult};

fn fail(message: &str) -> RuleResult {
    Err(RuleError::Field(message.to_string()))
}

/// The field key must be present; an empty value is allowed.
pub fn present(value: Option<&str>, message: &str) -> RuleResult {
    match value {
        Some(_) => Ok(()),
        None => fail(message),
    }
}

/// The value must be present and non-blank.
pub fn required(value: Option<&str>, message: &str) -> RuleResult {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => fail(message),
    }
}

/// Minimum length after trimming.
pub fn min_len(value: Option<&str>, min: usize, message: &str) -> RuleResult {
    match value {
        Some(v) if v.trim().chars().count() < min => fail(message),
        _ => Ok(()),
    }
}

/// Letters and digits only.
pub fn alphanumeric(value: Option<&str>, message: &str) -> RuleResult {
    match value {
        Some(v) if !v.trim().is_empty() => {
            if v.trim().chars().all(|c| c.is_alphanumeric()) {
                Ok(())
            } else {
                fail(message)
            }
        }
        _ => Ok(()),
    }
}

/// Minimal structural email check: non-empty local part, domain with a dot.
pub fn email(value: Option<&str>, message: &str) -> RuleResult {
    let Some(v) = value else {
        return Ok(());
    };

    let v = v.trim();
    let mut parts = v.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
    {
        Ok(())
    } else {
        fail(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_missing_and_blank() {
        assert!(required(None, "x").is_err());
        assert!(required(Some("   "), "x").is_err());
        assert!(required(Some("alice"), "x").is_ok());
    }

    #[test]
    fn present_allows_empty_values() {
        assert!(present(None, "x").is_err());
        assert!(present(Some(""), "x").is_ok());
    }

    #[test]
    fn min_len_passes_on_absent_values() {
        assert!(min_len(None, 3, "x").is_ok());
        assert!(min_len(Some("ab"), 3, "x").is_err());
        assert!(min_len(Some(" abc "), 3, "x").is_ok());
    }

    #[test]
    fn alphanumeric_rejects_symbols() {
        assert!(alphanumeric(Some("alice1"), "x").is_ok());
        assert!(alphanumeric(Some("al ice"), "x").is_err());
        assert!(alphanumeric(Some("alice!"), "x").is_err());
        assert!(alphanumeric(None, "x").is_ok());
    }

    #[test]
    fn email_requires_local_and_dotted_domain() {
        assert!(email(Some("a@x.com"), "x").is_ok());
        assert!(email(Some("a@x"), "x").is_err());
        assert!(email(Some("@x.com"), "x").is_err());
        assert!(email(Some("a@.com"), "x").is_err());
        assert!(email(Some("plainaddress"), "x").is_err());
        assert!(email(None, "x").is_ok());
    }
}
