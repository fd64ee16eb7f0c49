//! Recipient list decoding
//!
//! `to`/`cc`/`bcc` arrive as JSON text (`[{"email": "..."}]`). A list that
//! cannot be decoded fails the whole send; nothing is silently dropped.

use crate::domain::Recipient;
use crate::error::{AppError, Result};
use serde::Deserialize;
use validator::ValidateEmail;

#[derive(Debug, Deserialize)]
struct RawRecipient {
    email: String,
    #[serde(default)]
    name: Option<String>,
}

/// Decode one recipient field. Absent or blank input is an empty list.
pub fn decode_recipients(field: &str, raw: Option<&str>) -> Result<Vec<Recipient>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(raw) => raw,
    };

    let entries: Vec<RawRecipient> = serde_json::from_str(raw).map_err(|e| {
        AppError::Validation(format!("Malformed recipient list in '{}': {}", field, e))
    })?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let email = entry.email.trim().to_string();
            if !email.validate_email() {
                return Err(AppError::Validation(format!(
                    "Invalid email address in '{}' at position {}: {}",
                    field, index, email
                )));
            }
            Ok(Recipient {
                email,
                name: entry.name.filter(|name| !name.trim().is_empty()),
            })
        })
        .collect()
}

/// Decoded `to`, `cc` and `bcc` lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientLists {
    pub to: Vec<Recipient>,
    pub cc: Vec<Recipient>,
    pub bcc: Vec<Recipient>,
}

impl RecipientLists {
    pub fn decode(to: Option<&str>, cc: Option<&str>, bcc: Option<&str>) -> Result<Self> {
        Ok(Self {
            to: decode_recipients("to", to)?,
            cc: decode_recipients("cc", cc)?,
            bcc: decode_recipients("bcc", bcc)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absent_and_blank_are_empty() {
        assert!(decode_recipients("to", None).unwrap().is_empty());
        assert!(decode_recipients("to", Some("  ")).unwrap().is_empty());
        assert!(decode_recipients("to", Some("[]")).unwrap().is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let raw = concat!(
            r#"[{"email":"b@example.com"},"#,
            r#"{"email":"a@example.com","name":"A"},"#,
            r#"{"email":"c@example.com"}]"#
        );
        let recipients = decode_recipients("to", Some(raw)).unwrap();

        assert_eq!(
            recipients,
            vec![
                Recipient::new("b@example.com"),
                Recipient::with_name("a@example.com", "A"),
                Recipient::new("c@example.com"),
            ]
        );
    }

    #[test]
    fn test_malformed_json_fails() {
        let err = decode_recipients("cc", Some("[{\"email\":")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("'cc'"));
    }

    #[test]
    fn test_non_list_fails() {
        let err = decode_recipients("to", Some(r#"{"email":"a@example.com"}"#)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_missing_email_field_fails() {
        let err = decode_recipients("bcc", Some(r#"[{"name":"No Email"}]"#)).unwrap_err();
        assert!(err.to_string().contains("'bcc'"));
    }

    #[test]
    fn test_invalid_address_fails() {
        let raw = r#"[{"email":"a@example.com"},{"email":"not-an-email"}]"#;
        let err = decode_recipients("to", Some(raw)).unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn test_decode_all_lists() {
        let lists = RecipientLists::decode(
            Some(r#"[{"email":"to@example.com"}]"#),
            None,
            Some(r#"[{"email":"bcc@example.com"}]"#),
        )
        .unwrap();

        assert_eq!(lists.to.len(), 1);
        assert!(lists.cc.is_empty());
        assert_eq!(lists.bcc[0].email, "bcc@example.com");
        assert!(!lists.is_empty());
    }
}
