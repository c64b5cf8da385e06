use std::path::{Path, PathBuf};
use std::process::Command;

use glob::glob;
use tracing::{debug, info};

use crate::config::RemoteConfig;
use crate::error::{GladError, Result};
use crate::paths::prefix_glob;

/// A tile file available in the remote store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteFile {
    /// File name, unique within the store.
    pub name: String,
    /// Store-specific location used for the download.
    pub location: String,
}

/// Drive-like store holding the exported alert tiles.
pub trait RemoteStore {
    /// List the `.tif` files whose name starts with `prefix`, sorted by name.
    fn list(&self, prefix: &str) -> Result<Vec<RemoteFile>>;

    /// Download `files` into `dest_dir`, keeping their names.
    fn download(&self, files: &[RemoteFile], dest_dir: &Path) -> Result<()>;
}

/// List the files matching `prefix` and download them into `dest_dir`.
///
/// Returns the listed files; an empty list means nothing was exported yet
/// and nothing was downloaded.
pub fn fetch_tiles(
    store: &dyn RemoteStore,
    prefix: &str,
    dest_dir: &Path,
) -> Result<Vec<RemoteFile>> {
    let files = store.list(prefix)?;
    if files.is_empty() {
        return Ok(files);
    }
    store.download(&files, dest_dir)?;
    info!(prefix, count = files.len(), "Downloaded tiles");
    Ok(files)
}

/// Build the store described by the configuration.
pub fn open_store(config: &RemoteConfig) -> Box<dyn RemoteStore> {
    match config {
        RemoteConfig::Mirror { path } => Box::new(MirrorStore::new(path.clone())),
        RemoteConfig::Rclone { remote, executable } => {
            Box::new(RcloneStore::new(remote.clone(), executable.clone()))
        }
    }
}

/// Local folder that a drive-sync client keeps in step with the drive.
pub struct MirrorStore {
    root: PathBuf,
}

impl MirrorStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl RemoteStore for MirrorStore {
    fn list(&self, prefix: &str) -> Result<Vec<RemoteFile>> {
        let pattern = prefix_glob(&self.root, prefix);
        let mut files = Vec::new();
        for entry in glob(&pattern)? {
            let path = entry?;
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            files.push(RemoteFile {
                name: name.to_string(),
                location: path.to_string_lossy().into_owned(),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(pattern, found = files.len(), "Listed mirror");
        Ok(files)
    }

    fn download(&self, files: &[RemoteFile], dest_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dest_dir)?;
        for file in files {
            std::fs::copy(&file.location, dest_dir.join(&file.name))?;
        }
        Ok(())
    }
}

/// Remote reached through the `rclone` command line client.
pub struct RcloneStore {
    remote: String,
    executable: String,
}

impl RcloneStore {
    pub fn new(remote: String, executable: String) -> Self {
        Self { remote, executable }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.executable)
            .args(args)
            .output()
            .map_err(|e| GladError::Remote(format!("{} exec error: {e}", self.executable)))?;
        if !output.status.success() {
            return Err(GladError::Remote(format!(
                "{} {} failed: {}",
                self.executable,
                args.first().unwrap_or(&""),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn remote_path(&self, name: &str) -> String {
        if self.remote.ends_with(':') || self.remote.ends_with('/') {
            format!("{}{name}", self.remote)
        } else {
            format!("{}/{name}", self.remote)
        }
    }
}

impl RemoteStore for RcloneStore {
    fn list(&self, prefix: &str) -> Result<Vec<RemoteFile>> {
        let include = format!("{prefix}*.tif");
        let stdout = self.run(&["lsf", "--files-only", "--include", &include, &self.remote])?;
        let mut files = parse_listing(&stdout, prefix)
            .map(|name| RemoteFile {
                location: self.remote_path(name),
                name: name.to_string(),
            })
            .collect::<Vec<_>>();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(remote = %self.remote, include, found = files.len(), "Listed rclone remote");
        Ok(files)
    }

    fn download(&self, files: &[RemoteFile], dest_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dest_dir)?;
        for file in files {
            let dest = dest_dir.join(&file.name);
            self.run(&["copyto", &file.location, &dest.to_string_lossy()])?;
        }
        Ok(())
    }
}

/// File names of an `lsf` listing that carry the expected prefix.
fn parse_listing<'a>(stdout: &'a str, prefix: &'a str) -> impl Iterator<Item = &'a str> {
    stdout
        .lines()
        .map(str::trim)
        .filter(move |line| line.starts_with(prefix) && line.ends_with(".tif"))
}
