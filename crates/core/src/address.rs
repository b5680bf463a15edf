//! Addressable name normalization

/// Normalize an addressable name for lookup
///
/// Backslashes become forward slashes and surrounding whitespace is dropped,
/// so `Sprites\Hero.png` and `Sprites/Hero.png` name the same asset.
/// Returns `None` when nothing is left.
pub fn normalize_address(address: &str) -> Option<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_become_slashes() {
        assert_eq!(
            normalize_address("Sprites\\Enemies\\bat.png").as_deref(),
            Some("Sprites/Enemies/bat.png")
        );
    }

    #[test]
    fn test_empty_and_blank_are_none() {
        assert_eq!(normalize_address(""), None);
        assert_eq!(normalize_address("   "), None);
    }

    #[test]
    fn test_forward_slashes_untouched() {
        assert_eq!(normalize_address(" ui/font ").as_deref(), Some("ui/font"));
    }

    proptest::proptest! {
        #[test]
        fn prop_normalize_is_idempotent(address in "[ a-zA-Z0-9_/\\\\.-]{0,32}") {
            if let Some(once) = normalize_address(&address) {
                proptest::prop_assert!(!once.contains('\\'));
                proptest::prop_assert_eq!(normalize_address(&once), Some(once.clone()));
            }
        }
    }
}
