use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Built once at startup and passed to every component that needs it.
/// Content lives under `<root>/static`, the JSON stores sit next to it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub admin_password: String,
    pub lectures_dir: PathBuf,
    pub materials_dir: PathBuf,
    pub labs_dir: PathBuf,
    pub lectures_file: PathBuf,
    pub deadlines_file: PathBuf,
    pub schedule_file: PathBuf,
}

impl AppConfig {
    pub fn new(root: impl AsRef<Path>, admin_password: String) -> Self {
        let root = root.as_ref();
        let static_dir = root.join("static");
        AppConfig {
            admin_password,
            lectures_dir: static_dir.join("lectures"),
            materials_dir: static_dir.join("materials"),
            labs_dir: static_dir.join("labs"),
            lectures_file: root.join("lectures.json"),
            deadlines_file: root.join("deadlines.json"),
            schedule_file: root.join("schedule.json"),
        }
    }

    /// Creates the content directories, plus the default semester folders so
    /// a fresh install has somewhere to upload lectures to.
    pub fn ensure_content_dirs(&self) -> io::Result<()> {
        for dir in [&self.lectures_dir, &self.materials_dir, &self.labs_dir] {
            fs::create_dir_all(dir)?;
        }
        for sem in 1..=3 {
            fs::create_dir_all(self.lectures_dir.join(format!("{}_sem", sem)))?;
        }
        Ok(())
    }
}
