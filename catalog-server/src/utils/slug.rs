//! Slug derivation
//!
//! Categories and products carry a URL-safe slug derived from their name
//! when the caller does not supply one explicitly.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, maps whitespace/underscores to `-`, drops everything that is
/// not ASCII alphanumeric, collapses runs of dashes and trims them from the
/// ends. An input with no usable characters yields an empty string; callers
/// must treat that as a validation failure.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true; // suppress leading dash

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if (c.is_whitespace() || c == '-' || c == '_') && !last_dash {
            out.push('-');
            last_dash = true;
        }
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Gaming Laptops"), "gaming-laptops");
    }

    #[test]
    fn test_collapses_separators_and_symbols() {
        assert_eq!(slugify("  Home &  Kitchen_Appliances "), "home-kitchen-appliances");
        assert_eq!(slugify("A---B"), "a-b");
    }

    #[test]
    fn test_empty_when_nothing_usable() {
        assert_eq!(slugify("***"), "");
        assert_eq!(slugify(""), "");
    }
}
