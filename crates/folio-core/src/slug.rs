//! URL-safe identifiers.

/// Convert text to a URL-safe slug.
///
/// Alphanumerics are lowercased and kept, whitespace, `-` and `_` become
/// single dashes, everything else is dropped.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Turn a slug back into a readable title ("my-first-post" -> "My First Post").
pub fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Test 123 Post"), "test-123-post");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("Special!@#Chars"), "specialchars");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
        assert_eq!(slugify("Über Café"), "über-café");
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("my-first-post"), "My First Post");
        assert_eq!(title_from_slug("draft_notes"), "Draft Notes");
        assert_eq!(title_from_slug("--"), "");
    }
}
