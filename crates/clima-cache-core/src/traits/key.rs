//! Cache key trait and implementations

use std::fmt::Display;

/// Delimiter placed between key parts
pub const KEY_SEPARATOR: &str = ":";

/// Join key parts with [`KEY_SEPARATOR`], skipping empty parts
///
/// The builder does not normalise: callers round numbers and fold case
/// before handing parts over.
///
/// ```
/// use clima_cache_core::build_key;
///
/// assert_eq!(build_key(["weather", "23.55", "-46.63", "24h"]), "weather:23.55:-46.63:24h");
/// assert_eq!(build_key(["a", "", "b"]), "a:b");
/// ```
pub fn build_key<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Display,
{
    let mut key = String::new();
    for part in parts {
        let part = part.to_string();
        if part.is_empty() {
            continue;
        }
        if !key.is_empty() {
            key.push_str(KEY_SEPARATOR);
        }
        key.push_str(&part);
    }
    key
}

/// Build a key from heterogeneous parts
///
/// ```
/// use clima_cache_core::cache_key;
///
/// assert_eq!(cache_key!("weather-day", 1.5, "", "2024-01-15"), "weather-day:1.5:2024-01-15");
/// ```
#[macro_export]
macro_rules! cache_key {
    () => {
        ::std::string::String::new()
    };
    ($($part:expr),+ $(,)?) => {
        $crate::build_key([$(::std::string::ToString::to_string(&$part)),*])
    };
}

/// Trait for types that can be used as cache keys
///
/// Implement this trait to use custom types as cache keys.
pub trait CacheKey: Send + Sync {
    /// Generate the key string
    fn cache_key(&self) -> String;

    /// Optional namespace for the key
    fn namespace(&self) -> Option<&str> {
        None
    }

    /// Get the full key including namespace
    fn full_key(&self) -> String {
        match self.namespace() {
            Some(ns) => build_key([ns, self.cache_key().as_str()]),
            None => self.cache_key(),
        }
    }
}

// Implementations for common types

impl CacheKey for String {
    fn cache_key(&self) -> String {
        self.clone()
    }
}

impl CacheKey for &str {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl CacheKey for &String {
    fn cache_key(&self) -> String {
        (*self).clone()
    }
}

// Tuple implementations for composite keys

impl<T1: Display + Send + Sync, T2: Display + Send + Sync> CacheKey for (T1, T2) {
    fn cache_key(&self) -> String {
        build_key([self.0.to_string(), self.1.to_string()])
    }
}

impl<T1: Display + Send + Sync, T2: Display + Send + Sync, T3: Display + Send + Sync> CacheKey
    for (T1, T2, T3)
{
    fn cache_key(&self) -> String {
        build_key([self.0.to_string(), self.1.to_string(), self.2.to_string()])
    }
}

impl<
        T1: Display + Send + Sync,
        T2: Display + Send + Sync,
        T3: Display + Send + Sync,
        T4: Display + Send + Sync,
    > CacheKey for (T1, T2, T3, T4)
{
    fn cache_key(&self) -> String {
        build_key([
            self.0.to_string(),
            self.1.to_string(),
            self.2.to_string(),
            self.3.to_string(),
        ])
    }
}

/// Composite key builder for complex keys
#[derive(Debug, Clone, Default)]
pub struct CompositeKey {
    parts: Vec<String>,
    ns: Option<String>,
}

impl CompositeKey {
    /// Create a new composite key builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the namespace
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.ns = Some(ns.into());
        self
    }

    /// Add a part to the key
    pub fn part(mut self, part: impl Display) -> Self {
        self.parts.push(part.to_string());
        self
    }

    /// Add a part only when present
    pub fn maybe_part(self, part: Option<impl Display>) -> Self {
        match part {
            Some(part) => self.part(part),
            None => self,
        }
    }

    /// Add multiple parts
    pub fn parts<I, S>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Display,
    {
        self.parts.extend(parts.into_iter().map(|p| p.to_string()));
        self
    }

    /// Get the namespace
    pub fn get_namespace(&self) -> Option<&str> {
        self.ns.as_deref()
    }
}

impl CacheKey for CompositeKey {
    fn cache_key(&self) -> String {
        build_key(&self.parts)
    }

    fn namespace(&self) -> Option<&str> {
        self.ns.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key_is_deterministic() {
        let first = build_key(["weather", "23.55", "-46.63", "24h"]);
        let second = build_key(["weather", "23.55", "-46.63", "24h"]);
        assert_eq!(first, second);
        assert_eq!(first, "weather:23.55:-46.63:24h");
    }

    #[test]
    fn test_build_key_skips_empty_parts() {
        assert_eq!(build_key(["a", "", "b"]), "a:b");
        assert_eq!(build_key(["a", "b", ""]), build_key(["a", "b"]));
        assert_eq!(build_key(["", ""]), "");
        assert_eq!(build_key(Vec::<String>::new()), "");
    }

    #[test]
    fn test_build_key_keeps_order() {
        assert_ne!(build_key(["a", "b"]), build_key(["b", "a"]));
    }

    #[test]
    fn test_cache_key_macro() {
        let lat = format!("{:.2}", -23.5505);
        assert_eq!(cache_key!("weather", lat, "-46.63", "7d"), "weather:-23.55:-46.63:7d");
        assert_eq!(cache_key!("location", ""), "location");
        assert_eq!(cache_key!(), "");
    }

    #[test]
    fn test_string_key() {
        let key = "my_key".to_string();
        assert_eq!(key.cache_key(), "my_key");
        assert_eq!(key.full_key(), "my_key");
    }

    #[test]
    fn test_tuple_key_2() {
        let key = ("user", 123);
        assert_eq!(key.cache_key(), "user:123");
    }

    #[test]
    fn test_tuple_key_skips_empty() {
        let key = ("location", "", "sao paulo");
        assert_eq!(key.cache_key(), "location:sao paulo");
    }

    #[test]
    fn test_composite_key() {
        let key = CompositeKey::new()
            .with_namespace("clima")
            .part("weather-day")
            .maybe_part(None::<&str>)
            .part("2024-01-15");

        assert_eq!(key.cache_key(), "weather-day:2024-01-15");
        assert_eq!(key.get_namespace(), Some("clima"));
        assert_eq!(key.full_key(), "clima:weather-day:2024-01-15");
    }

    #[test]
    fn test_composite_key_no_namespace() {
        let key = CompositeKey::new().parts(["session", "abc123"]);

        assert_eq!(key.cache_key(), "session:abc123");
        assert_eq!(key.full_key(), "session:abc123");
    }
}
