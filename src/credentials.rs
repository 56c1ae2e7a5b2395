//! Credential Pool
//!
//! Ordered, non-empty set of provider credentials with a shared rotation cursor.
//! The cursor is the only long-lived mutable state of the generation layer; it is
//! owned here behind a lock and handed to executors by reference.

use crate::error::AegisError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Opaque secret identifying one account/quota bucket
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Arc<str>);

impl Credential {
    pub fn new(secret: impl AsRef<str>) -> Self {
        Self(Arc::from(secret.as_ref()))
    }

    /// The raw secret. Only provider clients should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Log-safe identifier: the last four characters of the secret
    pub fn fingerprint(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("…{}", tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.fingerprint())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fingerprint())
    }
}

/// Outcome of advancing the rotation cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Cursor position after the rotation
    pub index: usize,
    /// True when the cursor moved back to the first credential
    pub wrapped: bool,
}

/// Credential pool with a round-robin cursor
pub struct CredentialPool {
    credentials: Vec<Credential>,
    cursor: Mutex<usize>,
}

impl CredentialPool {
    /// Build a pool from raw secrets. Blank entries are dropped; an empty result
    /// is a configuration error.
    pub fn new<I, S>(secrets: I) -> Result<Self, AegisError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let credentials: Vec<Credential> = secrets
            .into_iter()
            .filter_map(|secret| {
                let trimmed = secret.as_ref().trim();
                (!trimmed.is_empty()).then(|| Credential::new(trimmed))
            })
            .collect();

        if credentials.is_empty() {
            return Err(AegisError::Configuration(
                "No API credentials found. Set AEGIS_API_KEY or credentials.api_keys in config."
                    .to_string(),
            ));
        }

        Ok(Self {
            credentials,
            cursor: Mutex::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Always false; construction guarantees at least one credential.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn current_index(&self) -> usize {
        *self.cursor.lock()
    }

    /// Credential at the cursor
    pub fn current(&self) -> Credential {
        self.checkout().1
    }

    /// Cursor position and credential read under one lock.
    pub fn checkout(&self) -> (usize, Credential) {
        let cursor = self.cursor.lock();
        (*cursor, self.credentials[*cursor].clone())
    }

    /// Advance the cursor by one, modulo the pool size.
    pub fn rotate(&self) -> Rotation {
        let mut cursor = self.cursor.lock();
        *cursor = (*cursor + 1) % self.credentials.len();
        Rotation {
            index: *cursor,
            wrapped: *cursor == 0,
        }
    }

    /// Advance the cursor only if it still points at `observed`.
    ///
    /// Concurrent callers that failed on the same credential advance the cursor
    /// once between them; late callers see the already-rotated position with
    /// `wrapped == false`.
    pub fn rotate_from(&self, observed: usize) -> Rotation {
        let mut cursor = self.cursor.lock();
        if *cursor != observed {
            return Rotation {
                index: *cursor,
                wrapped: false,
            };
        }
        *cursor = (*cursor + 1) % self.credentials.len();
        Rotation {
            index: *cursor,
            wrapped: *cursor == 0,
        }
    }

    /// Log-safe fingerprints of every credential, in rotation order
    pub fn fingerprints(&self) -> Vec<String> {
        self.credentials.iter().map(Credential::fingerprint).collect()
    }
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("credentials", &self.credentials)
            .field("cursor", &self.current_index())
            .finish()
    }
}
