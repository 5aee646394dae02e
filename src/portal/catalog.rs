use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Optional display metadata for one lecture file, keyed by exact filename
/// in lectures.json. The mapping's insertion order doubles as display
/// priority.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LectureInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub type DescriptionMap = IndexMap<String, LectureInfo>;

/// One downloadable file with its display metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub filename: String,
    pub path: String,
    pub name: String,
    pub description: String,
    pub sort_order: usize,
}

/// All PDFs of one semester folder, under a display label.
#[derive(Debug, Clone, Serialize)]
pub struct SemesterGroup {
    pub title: String,
    pub files: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimpleFile {
    pub name: String,
    pub ext: String,
}

/// Display name for a PDF without a description entry.
fn default_display_name(filename: &str) -> String {
    filename.trim_end_matches(".pdf").replace('_', " ")
}

/// "1_sem" style folders get a localized semester label, everything else
/// keeps its raw name.
fn folder_label(folder: &str) -> String {
    if folder.contains("sem") {
        let prefix = folder.split('_').next().unwrap_or(folder);
        format!("{} семестр", prefix)
    } else {
        folder.to_string()
    }
}

/// Immediate subdirectory names, sorted.
pub fn list_subfolders(dir: &Path) -> Vec<String> {
    let mut folders = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            if entry.path().is_dir() {
                folders.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
    }
    folders.sort();
    folders
}

/// Builds the grouped lecture catalog. Files named in `descriptions` sort
/// first, in the mapping's own order; everything else shares one trailing
/// sort key. Folders without a single PDF are left out.
pub fn build_lecture_catalog(
    lectures_dir: &Path,
    descriptions: &DescriptionMap,
) -> Vec<SemesterGroup> {
    let unlisted_order = descriptions.len() + 1;
    let mut groups = Vec::new();

    for folder in list_subfolders(lectures_dir) {
        let folder_path = lectures_dir.join(&folder);
        let mut files = Vec::new();

        if let Ok(entries) = fs::read_dir(&folder_path) {
            for entry in entries.flatten() {
                let filename = entry.file_name().to_string_lossy().into_owned();
                if !filename.ends_with(".pdf") {
                    continue;
                }
                let info = descriptions.get(&filename);
                let name = info
                    .and_then(|i| i.title.clone())
                    .unwrap_or_else(|| default_display_name(&filename));
                let description = info
                    .and_then(|i| i.description.clone())
                    .unwrap_or_default();
                let sort_order = descriptions
                    .get_index_of(&filename)
                    .unwrap_or(unlisted_order);
                files.push(CatalogEntry {
                    path: format!("{}/{}", folder, filename),
                    filename,
                    name,
                    description,
                    sort_order,
                });
            }
        }

        files.sort_by_key(|f| f.sort_order);
        if !files.is_empty() {
            groups.push(SemesterGroup {
                title: folder_label(&folder),
                files,
            });
        }
    }
    groups
}

/// Flat listing of immediate non-hidden files with a lower-cased extension.
/// Used for the materials and labs pages.
pub fn list_simple_files(dir: &Path) -> Vec<SimpleFile> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || entry.path().is_dir() {
                continue;
            }
            let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
            files.push(SimpleFile { name, ext });
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lectures_fixture() -> (TempDir, std::path::PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let lectures = tmp.path().join("lectures");
        fs::create_dir_all(lectures.join("1_sem")).unwrap();
        fs::write(lectures.join("1_sem/zz_intro.pdf"), b"pdf").unwrap();
        fs::write(lectures.join("1_sem/aa_extra.pdf"), b"pdf").unwrap();
        fs::write(lectures.join("1_sem/notes.txt"), b"txt").unwrap();
        (tmp, lectures)
    }

    #[test]
    fn described_files_sort_before_unlisted_ones() {
        let (_tmp, lectures) = lectures_fixture();
        let mut descriptions = DescriptionMap::new();
        descriptions.insert(
            "zz_intro.pdf".to_string(),
            LectureInfo {
                title: Some("Введение".to_string()),
                description: Some("Первая лекция".to_string()),
            },
        );

        let groups = build_lecture_catalog(&lectures, &descriptions);
        assert_eq!(groups.len(), 1);
        let files = &groups[0].files;
        // "zz" would lose alphabetically, but it is listed in the mapping.
        assert_eq!(files[0].filename, "zz_intro.pdf");
        assert_eq!(files[0].name, "Введение");
        assert_eq!(files[0].sort_order, 0);
        assert_eq!(files[1].filename, "aa_extra.pdf");
        assert_eq!(files[1].name, "aa extra");
        assert_eq!(files[1].sort_order, descriptions.len() + 1);
        assert_eq!(files[1].path, "1_sem/aa_extra.pdf");
    }

    #[test]
    fn folders_without_pdfs_are_omitted_and_sem_folders_get_labels() {
        let (_tmp, lectures) = lectures_fixture();
        fs::create_dir_all(lectures.join("2_sem")).unwrap();
        fs::create_dir_all(lectures.join("archive")).unwrap();
        fs::write(lectures.join("archive/old.pdf"), b"pdf").unwrap();

        let groups = build_lecture_catalog(&lectures, &DescriptionMap::new());
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        // 2_sem has no PDFs and is dropped entirely.
        assert_eq!(titles, vec!["1 семестр", "archive"]);
    }

    #[test]
    fn missing_lectures_dir_yields_empty_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        let groups =
            build_lecture_catalog(&tmp.path().join("nowhere"), &DescriptionMap::new());
        assert!(groups.is_empty());
    }

    #[test]
    fn simple_listing_skips_hidden_files_and_lowercases_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("task.PDF"), b"x").unwrap();
        fs::write(tmp.path().join(".DS_Store"), b"x").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();

        let files = list_simple_files(tmp.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "task.PDF");
        assert_eq!(files[0].ext, "pdf");
    }
}
