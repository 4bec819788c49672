//! PII-safe logging helpers.
//!
//! Raw database and request errors can embed user-supplied strings. Wrap them
//! in [`Redacted`] before logging so email-shaped tokens never reach the logs.

use std::fmt;

/// Display wrapper that masks email-like tokens in the wrapped string.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in self.0.split_whitespace() {
            if !first {
                write!(f, " ")?;
            }
            if token.contains('@') {
                write!(f, "<redacted>")?;
            } else {
                write!(f, "{token}")?;
            }
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email_tokens() {
        let msg = "duplicate key alice@example.com already exists";
        assert_eq!(
            Redacted(msg).to_string(),
            "duplicate key <redacted> already exists"
        );
    }

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(Redacted("no secrets here").to_string(), "no secrets here");
    }
}
