use std::collections::HashMap;

/// Cyrillic source alphabet and its Latin transliteration, index-aligned.
/// `ъ` and `ь` carry no Latin sound of their own and map to `_`.
const CYRILLIC: &str = "абвгдеёжзийклмнопрстуфхцчшщъыьэюяАБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";
const LATIN: &str = "abvgdeejzijklmnoprstufhzcss_y_euaABVGDEEJZIJKLMNOPRSTUFHZCSS_Y_EUA";

/// Replaces every character of the Cyrillic table with its Latin
/// counterpart. Characters outside the table pass through unchanged.
pub fn transliterate(input: &str) -> String {
    let table: HashMap<char, char> = CYRILLIC.chars().zip(LATIN.chars()).collect();

    input
        .chars()
        .map(|c| table.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Converts a branch name into a filesystem-safe directory name.
///
/// Transliterates Cyrillic characters, then replaces path separators with
/// underscores. Idempotent: slugs re-derived on every run must map onto the
/// directories created by earlier runs.
pub fn branch_slug(name: &str) -> String {
    transliterate(name).replace('/', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_alphabet_mapping() {
        assert_eq!(transliterate(CYRILLIC), LATIN);
    }

    #[test]
    fn test_unmapped_characters_pass_through() {
        assert_eq!(transliterate("release-1.2.3"), "release-1.2.3");
        assert_eq!(transliterate("büg/fix"), "büg/fix");
    }

    #[test]
    fn test_branch_slug_replaces_separators() {
        assert_eq!(branch_slug("feature/тест"), "feature_test");
        assert_eq!(branch_slug("hotfix/a/b"), "hotfix_a_b");
    }

    #[test]
    fn test_branch_slug_empty() {
        assert_eq!(branch_slug(""), "");
    }

    #[test]
    fn test_slug_contains_no_source_characters() {
        let input = format!("{CYRILLIC}/{CYRILLIC}");
        let slug = branch_slug(&input);

        assert!(!slug.contains('/'));
        for c in CYRILLIC.chars() {
            assert!(!slug.contains(c), "slug still contains {c}");
        }
    }

    #[test]
    fn test_branch_slug_idempotent() {
        for name in [
            "main",
            "feature/x",
            "релиз/весна",
            CYRILLIC,
            "mixed-Ветка/1.0",
        ] {
            let once = branch_slug(name);
            assert_eq!(branch_slug(&once), once);
        }
    }
}
