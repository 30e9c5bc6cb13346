use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Sort key for display names, ignoring case and accents.
pub(crate) fn name_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
