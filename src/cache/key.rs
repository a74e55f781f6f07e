//! Cache Key Module
//!
//! Builds `prefix:part:part` keys so call sites agree on key shape.

// == Key Part ==
/// A value that can appear as one segment of a cache key.
///
/// Returning `None` drops the segment entirely. Only absent optionals do
/// that: empty strings and zero are kept as segments.
pub trait KeyPart {
    fn key_part(&self) -> Option<String>;
}

impl KeyPart for str {
    fn key_part(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl KeyPart for String {
    fn key_part(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: KeyPart + ?Sized> KeyPart for &T {
    fn key_part(&self) -> Option<String> {
        (**self).key_part()
    }
}

impl<T: KeyPart> KeyPart for Option<T> {
    fn key_part(&self) -> Option<String> {
        self.as_ref().and_then(KeyPart::key_part)
    }
}

macro_rules! display_key_part {
    ($($ty:ty),* $(,)?) => {
        $(
            impl KeyPart for $ty {
                fn key_part(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

display_key_part!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

// == Create Cache Key ==
/// Joins `prefix` and every present part with `:`.
///
/// With no present parts the result is `"{prefix}:"`.
pub fn create_cache_key(prefix: &str, parts: &[&dyn KeyPart]) -> String {
    let joined = parts
        .iter()
        .filter_map(|part| part.key_part())
        .collect::<Vec<_>>()
        .join(":");
    format!("{prefix}:{joined}")
}

/// Builds a cache key from a prefix and any number of [`KeyPart`] values.
///
/// ```
/// use memo_cache::cache_key;
///
/// assert_eq!(cache_key!("projects", "list", 1), "projects:list:1");
/// assert_eq!(cache_key!("projects", "list", None::<u32>, "active"), "projects:list:active");
/// assert_eq!(cache_key!("projects"), "projects:");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr $(, $part:expr)* $(,)?) => {
        $crate::cache::create_cache_key(
            $prefix,
            &[$(&$part as &dyn $crate::cache::KeyPart),*],
        )
    };
}
