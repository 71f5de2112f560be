// round-robin api key rotation
// spreads load across multiple keys so one key doesn't eat all the rate limit

use crate::Error;
use parking_lot::Mutex;

pub struct KeyRotator {
    keys: Vec<String>,
    cursor: Mutex<usize>,
}

impl KeyRotator {
    /// Parse a comma-delimited key string ("key1, key2,key3").
    /// Whitespace is trimmed and empty entries dropped.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let keys: Vec<String> = raw
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        if keys.is_empty() {
            return Err(Error::Config("No API keys provided".to_string()));
        }

        Ok(Self {
            keys,
            cursor: Mutex::new(0),
        })
    }

    /// Next key in strict round-robin order: a, b, c, a, ...
    pub fn next_key(&self) -> String {
        let mut cursor = self.cursor.lock();
        let key = self.keys[*cursor].clone();
        *cursor = (*cursor + 1) % self.keys.len();
        key
    }

    // whether rotation actually does anything
    pub fn has_multiple(&self) -> bool {
        self.keys.len() > 1
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}
