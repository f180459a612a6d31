use std::path::{Path, PathBuf};

/// Where an archive directory keeps its record file.
pub const LOCAL_DATA_FILE: &str = "data/video_data.json";

pub struct AppPaths {
    pub base_dir: PathBuf,
    pub data_file: PathBuf,
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl AppPaths {
    pub fn new() -> Self {
        let base = dirs::home_dir()
            .expect("Could not determine home directory")
            .join(".vidcat");
        Self::from_base(base)
    }

    pub fn from_base(base: PathBuf) -> Self {
        Self {
            data_file: base.join("video_data.json"),
            base_dir: base,
        }
    }

    /// Pick the record file to load: an explicit override wins, then a
    /// `data/video_data.json` next to the working directory (the archive's
    /// own layout), then the home-relative default.
    pub fn resolve_data_file(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let local = PathBuf::from(LOCAL_DATA_FILE);
        if local.exists() {
            return local;
        }
        self.data_file.clone()
    }
}
