//! Files going in and out: the template, photos, badges and sheets.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use itertools::Itertools;

use crate::error::{BadgeError, Result};

/// Photo extensions, in the order they are tried.
pub const PHOTO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Extensions of badges picked up when laying out sheets.
pub const CARD_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub fn load_template(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|image| image.to_rgba8())
        .map_err(|err| BadgeError::source_load("badge template", path, err))
}

/// A directory of photos named after passport numbers.
pub struct PhotoLibrary {
    dir: PathBuf,
}

impl PhotoLibrary {
    pub fn new(dir: &Path) -> Self {
        PhotoLibrary { dir: dir.to_path_buf() }
    }

    /// `<identifier>.<ext>` for the first extension that exists.
    pub fn find(&self, identifier: &str) -> Result<PathBuf> {
        let missing = || BadgeError::AssetMissing {
            identifier: identifier.to_string(),
        };
        if identifier.is_empty() || identifier.contains(|c: char| c == '/' || c == '\\') {
            return Err(missing());
        }
        PHOTO_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", identifier, ext)))
            .find(|path| path.is_file())
            .ok_or_else(missing)
    }

    pub fn load(&self, identifier: &str) -> Result<DynamicImage> {
        let path = self.find(identifier)?;
        debug!(target: "assets", "Photo for {}: {}", identifier, path.display());
        image::open(&path).map_err(|err| BadgeError::render(format!("photo {}", path.display()), err))
    }
}

/// `<name>_badge.png`, with path separators taken out of the name.
/// Two people with the same name share a file, the last one wins.
pub fn card_file_name(name: &str) -> String {
    let name: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    format!("{}_badge.png", name)
}

/// Sheets are numbered from 1.
pub fn sheet_file_name(number: usize) -> String {
    format!("a4_sheet_{}.png", number)
}

/// Badge images of a directory, sorted by file name.
pub fn list_card_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|err| BadgeError::source_load("badge directory", dir, err))?;
    let mut files = vec![];
    for entry in entries {
        let path = entry
            .map_err(|err| BadgeError::source_load("badge directory", dir, err))?
            .path();
        let accepted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| CARD_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
            .unwrap_or(false);
        if accepted && path.is_file() {
            files.push(path);
        }
    }
    Ok(files
        .into_iter()
        .sorted_by(|a, b| a.file_name().cmp(&b.file_name()))
        .collect())
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|err| BadgeError::source_load("output directory", dir, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn photo_extensions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "P123.png");
        touch(dir.path(), "P123.jpeg");
        touch(dir.path(), "P456.png");
        let photos = PhotoLibrary::new(dir.path());
        assert_eq!(photos.find("P123").unwrap(), dir.path().join("P123.jpeg"));
        assert_eq!(photos.find("P456").unwrap(), dir.path().join("P456.png"));
    }

    #[test]
    fn no_photo() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "P1234.jpg");
        touch(dir.path(), "P123.gif");
        let photos = PhotoLibrary::new(dir.path());
        for identifier in &["P123", "", "../P1234"] {
            match photos.find(identifier) {
                Err(BadgeError::AssetMissing { identifier: id }) => assert_eq!(id, *identifier),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn corrupt_photo_is_a_render_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("P123.jpg"), b"definitely not a jpeg").unwrap();
        match PhotoLibrary::new(dir.path()).load("P123") {
            Err(err @ BadgeError::RenderFailure { .. }) => assert!(err.is_recoverable()),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn file_names() {
        assert_eq!(card_file_name("Ali"), "Ali_badge.png");
        assert_eq!(card_file_name("علي محمد"), "علي محمد_badge.png");
        assert_eq!(card_file_name("../etc/x"), ".._etc_x_badge.png");
        assert_eq!(sheet_file_name(1), "a4_sheet_1.png");
    }

    #[test]
    fn cards_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in &["b_badge.png", "a_badge.PNG", "c.jpg", "notes.txt", "d.gif"] {
            touch(dir.path(), name);
        }
        std::fs::create_dir(dir.path().join("z.png")).unwrap();
        let files = list_card_images(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a_badge.PNG", "b_badge.png", "c.jpg"]);
    }

    #[test]
    fn missing_card_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            list_card_images(&dir.path().join("nope")),
            Err(BadgeError::SourceLoad { .. })
        ));
    }
}
