use std::fmt::Write;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{PublishError, Result};

const ICON_URL: &str = "https://avatars.githubusercontent.com/u/5879127?s=64&v=4";

const INDEX_FOOTER: &str = "    </ul>\n</body>\n</html>\n";

fn page_header(label: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <link href="{ICON_URL}" rel="icon" type="image/x-icon" />
    <title>Index of {label}</title>
</head>
<body>
    <h2>Index of {label}</h2>
    <hr>
    <ul>
        <li>
            <a href='../'>../</a>
        </li>
"#
    )
}

/// Display label for an indexed folder.
///
/// The archive root's own directory name (always `public`) means nothing to
/// a reader, so the site label is substituted for the root prefix:
/// the root itself becomes `site_label`, a branch folder becomes
/// `site_label/<branch>`. Paths outside the archive fall back to their own
/// display form.
pub fn folder_label(path: &Path, archive_root: &Path, site_label: &str) -> String {
    match path.strip_prefix(archive_root) {
        Ok(rel) if rel.as_os_str().is_empty() => site_label.to_string(),
        Ok(rel) => format!("{site_label}/{}", rel.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Regenerates `dir/index.html` from the directory's current listing.
///
/// Direct children only; any existing `index.html` is excluded from the
/// listing and nothing else is. Entries are sorted ascending and rendered
/// as self-referential links, subdirectories indistinguishable from files.
/// The page is fully overwritten on every call, so re-indexing an unchanged
/// directory is a no-op in effect.
pub fn rebuild_index(dir: &Path, label: &str) -> Result<()> {
    info!("Indexing: {}/", dir.display());

    let entries =
        fs::read_dir(dir).map_err(|e| PublishError::filesystem("read directory", dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PublishError::filesystem("read directory", dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != "index.html" {
            names.push(name);
        }
    }
    names.sort();

    let mut page = page_header(label);
    for name in &names {
        let _ = writeln!(
            page,
            "        <li>\n            <a href='{name}'>{name}</a>\n        </li>"
        );
    }
    page.push_str(INDEX_FOOTER);

    let target = dir.join("index.html");
    fs::write(&target, page).map_err(|e| PublishError::filesystem("write file", &target, e))
}
