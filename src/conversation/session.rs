//! Session identifiers

use rand::Rng;
use std::fmt;

const SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identifies the server-side conversation thread across requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// `session-{unix_millis}-{random base36 suffix}`
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();
        Self(format!("session-{millis}-{suffix}"))
    }

    /// Generate an id guaranteed to differ from `previous`
    pub fn regenerate(previous: &SessionId) -> Self {
        loop {
            let next = Self::generate();
            if &next != previous {
                return next;
            }
        }
    }

    #[allow(dead_code)] // API completeness
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
