use std::{future::Future, io::ErrorKind, path::PathBuf};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use crate::{routines::RoutineMap, utils::dir::ensure_dir};

/// Interface for abstracting storage of routines.
pub trait RoutineStorage {
    /// Loads the whole mapping. Missing or undecodable data counts as an empty store.
    fn load(&self) -> impl Future<Output = Result<RoutineMap>>;

    /// Replaces everything stored with `routines`.
    fn save(&self, routines: &RoutineMap) -> impl Future<Output = Result<()>>;
}

/// The main realization of [RoutineStorage]. Keeps routines as a single JSON object.
pub struct JsonRoutineStorage {
    path: PathBuf,
}

impl JsonRoutineStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read_all(&self) -> std::result::Result<Vec<u8>, std::io::Error> {
        let mut file = File::open(&self.path).await?;
        file.lock_shared()?;
        let mut content = Vec::new();
        let result = file.read_to_end(&mut content).await;
        file.unlock_async().await?;
        result?;
        Ok(content)
    }

    async fn write_with_file(file: &mut File, content: &[u8]) -> Result<()> {
        file.set_len(0).await?;
        file.rewind().await?;
        file.write_all(content).await?;
        file.flush().await?;
        Ok(())
    }
}

impl RoutineStorage for JsonRoutineStorage {
    async fn load(&self) -> Result<RoutineMap> {
        let content = match self.read_all().await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No routines stored at {:?} yet", self.path);
                return Ok(RoutineMap::new());
            }
            Err(e) => Err(e)?,
        };

        match serde_json::from_slice::<RoutineMap>(&content) {
            Ok(routines) => {
                debug!("Loaded {} routines from {:?}", routines.len(), self.path);
                Ok(routines)
            }
            Err(e) => {
                // Usually a write cut off by a crash. There is nothing to salvage.
                warn!("Routines file {:?} is corrupted, starting empty: {e}", self.path);
                Ok(RoutineMap::new())
            }
        }
    }

    async fn save(&self, routines: &RoutineMap) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|v| !v.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let content = serde_json::to_vec_pretty(routines)?;

        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        file.lock_exclusive()?;
        let result = Self::write_with_file(&mut file, &content).await;
        file.unlock_async().await?;
        debug!("Saved {} routines to {:?}", routines.len(), self.path);
        result
    }
}
