use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use crate::store::ScoreStore;
use crate::store::schema::{STORAGE_FILE, StorageData};

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn load(&self) -> StorageData {
        let path = self.file_path(STORAGE_FILE);
        if !path.exists() {
            return StorageData::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "unreadable storage file, starting fresh");
                StorageData::default()
            }),
            Err(_) => StorageData::default(),
        }
    }

    /// Write through a temp file so a crash never leaves a half-written map.
    pub fn save(&self, data: &StorageData) -> Result<()> {
        let path = self.file_path(STORAGE_FILE);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl ScoreStore for JsonStore {
    fn read(&self) -> u64 {
        self.load().total_score()
    }

    fn write(&mut self, total: u64) -> Result<()> {
        let mut data = self.load();
        data.set_total_score(total);
        self.save(&data)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("iga-neza")
}
