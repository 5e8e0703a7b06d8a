//! Slug derivation for display names
//!
//! A slug is lowercase ASCII letters and digits, with every run of
//! whitespace or punctuation collapsed into a single dash. Common Latin
//! accented letters are folded to their plain form first.

/// Converts a display name into its URL-safe slug
///
/// The result never starts or ends with a dash, and slugifying a slug
/// returns it unchanged.
///
/// ```
/// # use natours::slug::slugify;
/// assert_eq!(slugify("The Sea Explorer!"), "the-sea-explorer");
/// assert_eq!(slugify("the-sea-explorer"), "the-sea-explorer");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            push_alnum(&mut slug, &mut pending_dash, ch);
            continue;
        }
        let folded = fold(ch);
        if folded.is_empty() {
            pending_dash = true;
        }
        for c in folded.chars() {
            push_alnum(&mut slug, &mut pending_dash, c);
        }
    }

    slug
}

fn push_alnum(slug: &mut String, pending_dash: &mut bool, c: char) {
    if *pending_dash && !slug.is_empty() {
        slug.push('-');
    }
    *pending_dash = false;
    slug.push(c.to_ascii_lowercase());
}

/// Maps an accented letter to its plain ASCII form
///
/// An empty result marks a separator.
fn fold(ch: char) -> &'static str {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'œ' | 'Œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ß' => "ss",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("The Forest Hiker"), "the-forest-hiker");
        assert_eq!(slugify("The Snow Adventurer"), "the-snow-adventurer");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  The   Park -- Camper!!  "), "the-park-camper");
        assert_eq!(slugify("Tour\t\nof\tthe Alps"), "tour-of-the-alps");
        assert_eq!(slugify("...Northern Lights..."), "northern-lights");
    }

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Café Crème Tour"), "cafe-creme-tour");
        assert_eq!(slugify("Straße nach Zürich"), "strasse-nach-zurich");
    }

    #[test]
    fn test_slugify_empty_and_punctuation_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("?!--"), "");
    }

    proptest! {
        #[test]
        fn prop_slugify_is_idempotent(name in "\\PC{0,60}") {
            let once = slugify(&name);
            prop_assert_eq!(slugify(&once), once);
        }

        #[test]
        fn prop_slug_is_url_safe(name in "\\PC{0,60}") {
            let slug = slugify(&name);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
