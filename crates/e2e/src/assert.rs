//! Field assertions that fail a scenario instead of panicking

use std::fmt::Debug;

use crate::error::{E2eError, E2eResult};

/// Fails with [`E2eError::FieldMismatch`] unless `actual == expected`
pub fn expect_eq<T>(field: &str, expected: T, actual: T) -> E2eResult<()>
where
    T: PartialEq + Debug,
{
    if expected == actual {
        Ok(())
    } else {
        Err(E2eError::FieldMismatch {
            field: field.to_string(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

/// Returns the value of an optional string field, failing when it is absent or empty
pub fn expect_present<'a>(field: &str, value: Option<&'a str>) -> E2eResult<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(E2eError::MissingField(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_eq() {
        expect_eq("name", "morpheus", "morpheus").unwrap();

        let err = expect_eq("token", Some("a"), Some("b")).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Field mismatch on 'token': expected Some("a"), got Some("b")"#
        );
    }

    #[test]
    fn test_expect_present() {
        assert_eq!(expect_present("id", Some("42")).unwrap(), "42");
        assert!(matches!(expect_present("id", Some("")), Err(E2eError::MissingField(_))));
        assert!(matches!(expect_present("id", None), Err(E2eError::MissingField(_))));
    }
}
