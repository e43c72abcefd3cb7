//! API credential newtype with masked display.

use std::fmt;

/// How many trailing characters of a credential appear in logs and errors.
const SUFFIX_LEN: usize = 8;

/// An opaque API credential identifying one caller identity.
///
/// The wrapped secret is immutable once constructed and compares by exact
/// value. Both `Display` and `Debug` render only the last few characters;
/// the full value is available solely through [`Credential::expose`] for
/// building the authorization header.
///
/// The type deliberately implements neither `Serialize` nor
/// `Deserialize`: credentials travel through the environment, never
/// through config files or snapshots.
///
/// # Examples
///
/// ```
/// use paisa_core::Credential;
///
/// let credential = Credential::new("sk-or-v1-0123456789abcdef");
/// assert_eq!(format!("{}", credential), "...89abcdef");
/// assert_eq!(credential.suffix(), "89abcdef");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Wrap a secret string as a credential.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The short display form: the last eight characters of the secret.
    ///
    /// Used for log lines and for keying attempted pairings; never
    /// reversible to the full value.
    pub fn suffix(&self) -> &str {
        let chars = self.0.chars().count();
        let skip = chars.saturating_sub(SUFFIX_LEN);
        let (idx, _) = self
            .0
            .char_indices()
            .nth(skip)
            .unwrap_or((self.0.len(), ' '));
        &self.0[idx..]
    }

    /// The full secret value.
    ///
    /// Only the HTTP transport should call this, to build the
    /// `Authorization` header. Never log the returned value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the credential is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "...{}", self.suffix())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential")
            .field(&format!("...{}", self.suffix()))
            .finish()
    }
}

impl From<String> for Credential {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl From<&str> for Credential {
    fn from(secret: &str) -> Self {
        Self(secret.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_of_short_secret_is_whole_secret() {
        let credential = Credential::new("abc");
        assert_eq!(credential.suffix(), "abc");
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let credential = Credential::new("sk-or-v1-topsecret-0123");
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("ret-0123"));
    }

    #[test]
    fn equality_is_by_exact_value() {
        assert_eq!(Credential::new("same"), Credential::new("same"));
        assert_ne!(Credential::new("one"), Credential::new("two"));
    }
}
