use std::path::PathBuf;

use snafu::Snafu;

/// Single-value key-value storage.
///
/// `set` replaces the previous value wholesale; it either succeeds or leaves
/// the previous value in place.
pub trait KeyValueStore {
    /// Returns `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Keys must be non-empty and must not contain path separators or NUL, so
/// that every backend can map them to a single storage slot.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let forbidden = |c: char| c == '/' || c == '\\' || c == '\0';
    if key.is_empty() || key.contains(forbidden) || key == "." || key == ".." {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("Failed to access storage file {}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to serialize the namespace"))]
    Serialize { source: serde_json::Error },
    #[snafu(display("Invalid storage key '{}'", key))]
    InvalidKey { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("shareplaceFS")]
    #[case("with.dots")]
    #[case("unicode-ключ")]
    fn accepts_plain_keys(#[case] key: &str) {
        assert!(validate_key(key).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("nul\0byte")]
    fn rejects_unsafe_keys(#[case] key: &str) {
        assert!(matches!(
            validate_key(key),
            Err(StoreError::InvalidKey { .. })
        ));
    }

    #[test]
    fn error_display_mentions_key() {
        let error = StoreError::InvalidKey { key: "a/b".into() };
        assert!(error.to_string().contains("a/b"));
    }
}
