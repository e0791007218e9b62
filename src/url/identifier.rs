//! Positional identifier extraction
//!
//! Gallery URLs embed the numeric identifiers at fixed offsets, so extraction
//! is a window over the string rather than a parser. Offsets count characters.

/// Album links: identifier window [15, 20), only for URLs longer than 20
const ALBUM_ID_WINDOW: (usize, usize) = (15, 20);

/// Item image sources: identifier window [45, 50), only for URLs longer than 50
const ITEM_ID_WINDOW: (usize, usize) = (45, 50);

/// Extracts the album (species) identifier from an album link URL
///
/// Returns an empty string when the URL is too short to carry one.
///
/// # Examples
///
/// ```
/// use album_harvest::url::album_id;
///
/// assert_eq!(album_id("album1.php?id=12345_x"), "2345");
/// assert_eq!(album_id("main.php"), "");
/// ```
pub fn album_id(url: &str) -> String {
    extract_window(url, ALBUM_ID_WINDOW)
}

/// Extracts the item identifier from an item's image source URL
///
/// Returns an empty string when the URL is too short to carry one.
pub fn item_id(image_url: &str) -> String {
    extract_window(image_url, ITEM_ID_WINDOW)
}

/// Takes the characters in `[start, end)` with underscores removed, provided
/// the input is strictly longer than `end`
fn extract_window(source: &str, (start, end): (usize, usize)) -> String {
    if source.chars().count() <= end {
        return String::new();
    }

    source
        .chars()
        .skip(start)
        .take(end - start)
        .filter(|c| *c != '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_id_too_short() {
        assert_eq!(album_id(""), "");
        assert_eq!(album_id("main.php"), "");
        // exactly 20 characters is still too short
        assert_eq!(album_id("album1.php?id=12345_"), "");
    }

    #[test]
    fn test_album_id_window() {
        assert_eq!(album_id("album1.php?id=12345_x"), "2345");
        assert_eq!(album_id("0123456789ABCDEFGHIJK"), "FGHIJ");
    }

    #[test]
    fn test_album_id_strips_underscores() {
        assert_eq!(album_id("0123456789ABCDE_F_GHIJ"), "FGH");
        assert_eq!(album_id("0123456789ABCDE_____xyz"), "");
    }

    #[test]
    fn test_item_id_too_short() {
        assert_eq!(item_id("photo.jpg"), "");
        assert_eq!(item_id(&"x".repeat(50)), "");
    }

    #[test]
    fn test_item_id_window() {
        let url = format!("{}12_34zzzzz", "x".repeat(45));
        assert_eq!(url.len(), 55);
        assert_eq!(item_id(&url), "1234");

        let url = format!("{}abcdef", "y".repeat(45));
        assert_eq!(item_id(&url), "abcde");
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        let url = "é".repeat(25);
        assert_eq!(album_id(&url), "ééééé");
        assert_eq!(item_id(&url), "");
    }
}
