use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use log::debug;

use crate::error::{PublishError, Result};
use crate::fsops;

const BOM: char = '\u{feff}';

/// Builds the replacement text for a secret value: the first half of its
/// characters (rounded up) survive, the rest become `*`.
///
/// Deliberately partial redaction — enough to keep the raw value out of the
/// published report while leaving a recognizable prefix. Not a security
/// boundary.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let masked = chars.len() / 2;
    let kept = chars.len() - masked;

    let mut replacement: String = chars[..kept].iter().collect();
    replacement.extend(std::iter::repeat('*').take(masked));
    replacement
}

/// Redacts every known secret value from files ending in `.<extension>`
/// under `root`, recursively.
///
/// Files are read as UTF-8, tolerating a leading byte-order mark; a file is
/// rewritten only when at least one secret actually occurred in it, and a
/// BOM is re-attached only when the file originally carried one. Returns
/// the number of files rewritten.
pub fn scrub_tree(root: &Path, secrets: &IndexSet<String>, extension: &str) -> Result<usize> {
    let files = fsops::files_with_extension(root, extension)?;

    let mut rewritten = 0;
    for path in files {
        if scrub_file(&path, secrets)? {
            rewritten += 1;
        }
    }

    Ok(rewritten)
}

fn scrub_file(path: &Path, secrets: &IndexSet<String>) -> Result<bool> {
    let raw =
        fs::read_to_string(path).map_err(|e| PublishError::filesystem("read file", path, e))?;

    let (had_bom, text) = match raw.strip_prefix(BOM) {
        Some(rest) => (true, rest.to_string()),
        None => (false, raw),
    };

    let mut content = text;
    let mut changed = false;
    for secret in secrets {
        if secret.is_empty() {
            continue;
        }
        let replacement = mask_secret(secret);
        // A mask identical to the secret would rewrite files for nothing.
        if replacement == *secret {
            continue;
        }
        if content.contains(secret.as_str()) {
            content = content.replace(secret.as_str(), &replacement);
            changed = true;
        }
    }

    if changed {
        debug!("Scrubbed secrets from {}", path.display());
        let output = if had_bom {
            format!("{BOM}{content}")
        } else {
            content
        };
        fs::write(path, output).map_err(|e| PublishError::filesystem("write file", path, e))?;
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn secrets(values: &[&str]) -> IndexSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_mask_keeps_first_half() {
        assert_eq!(mask_secret("S3CR3T!!"), "S3CR****");
        assert_eq!(mask_secret("abcde"), "abc**");
        assert_eq!(mask_secret("ab"), "a*");
    }

    #[test]
    fn test_mask_counts_characters_not_bytes() {
        assert_eq!(mask_secret("пароль"), "пар***");
    }

    #[test]
    fn test_mask_single_character_is_identity() {
        assert_eq!(mask_secret("x"), "x");
    }

    #[test]
    fn test_scrub_replaces_every_occurrence() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("report.json");
        fs::write(&file, "token=S3CR3T!! again S3CR3T!!").unwrap();

        let rewritten = scrub_tree(tmp.path(), &secrets(&["S3CR3T!!"]), "json").unwrap();

        assert_eq!(rewritten, 1);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "token=S3CR**** again S3CR****"
        );
    }

    #[test]
    fn test_scrub_matches_secret_at_start_of_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("log.json");
        fs::write(&file, "S3CR3T!! leaked first").unwrap();

        scrub_tree(tmp.path(), &secrets(&["S3CR3T!!"]), "json").unwrap();

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "S3CR**** leaked first"
        );
    }

    #[test]
    fn test_file_without_secret_left_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("clean.json");
        let body = b"{\"status\": \"ok\"}\r\n";
        fs::write(&file, body).unwrap();

        let rewritten = scrub_tree(tmp.path(), &secrets(&["S3CR3T!!"]), "json").unwrap();

        assert_eq!(rewritten, 0);
        assert_eq!(fs::read(&file).unwrap(), body);
    }

    #[test]
    fn test_bom_preserved_when_present() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("data.xml");
        let mut body = b"\xEF\xBB\xBF".to_vec();
        body.extend_from_slice(b"<v>S3CR3T!!</v>");
        fs::write(&file, &body).unwrap();

        scrub_tree(tmp.path(), &secrets(&["S3CR3T!!"]), "xml").unwrap();

        let after = fs::read(&file).unwrap();
        assert!(after.starts_with(b"\xEF\xBB\xBF"));
        assert_eq!(&after[3..], b"<v>S3CR****</v>");
    }

    #[test]
    fn test_bom_not_introduced_when_absent() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("data.html");
        fs::write(&file, "<p>S3CR3T!!</p>").unwrap();

        scrub_tree(tmp.path(), &secrets(&["S3CR3T!!"]), "html").unwrap();

        let after = fs::read(&file).unwrap();
        assert!(!after.starts_with(b"\xEF\xBB\xBF"));
        assert_eq!(after, b"<p>S3CR****</p>");
    }

    #[test]
    fn test_only_requested_extension_is_touched() {
        let tmp = TempDir::new().unwrap();
        let json = tmp.path().join("a.json");
        let html = tmp.path().join("a.html");
        fs::write(&json, "S3CR3T!!").unwrap();
        fs::write(&html, "S3CR3T!!").unwrap();

        scrub_tree(tmp.path(), &secrets(&["S3CR3T!!"]), "json").unwrap();

        assert_eq!(fs::read_to_string(&json).unwrap(), "S3CR****");
        assert_eq!(fs::read_to_string(&html).unwrap(), "S3CR3T!!");
    }

    #[test]
    fn test_empty_and_single_character_secrets_skipped() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.json");
        fs::write(&file, "xyz").unwrap();

        let rewritten = scrub_tree(tmp.path(), &secrets(&["", "x"]), "json").unwrap();

        assert_eq!(rewritten, 0);
        assert_eq!(fs::read_to_string(&file).unwrap(), "xyz");
    }
}
