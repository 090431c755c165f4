//! Email address shape check for the inquiry form.

/// A requester email address that passed the `local@domain.tld` shape check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Accept `raw` (trimmed) if it looks like `local@domain.tld`.
    ///
    /// Rules: no whitespace, exactly one `@`,
    /// a non-empty local part, and a domain containing a dot with
    /// non-empty labels on both sides of it.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().any(char::is_whitespace) {
            return None;
        }

        let (local, domain) = trimmed.split_once('@')?;
        if local.is_empty() || domain.contains('@') {
            return None;
        }

        // Some dot must split the domain into non-empty parts.
        let has_tld = domain
            .match_indices('.')
            .any(|(i, _)| i > 0 && i + 1 < domain.len());
        if !has_tld {
            return None;
        }

        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
