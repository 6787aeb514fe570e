//! Temporary working directories for running the tool against generated
//! project files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

/// Name of the project file the tool reads by default.
pub const ATLAS_HCL: &str = "atlas.hcl";

/// Name of the migration directory inside a working directory.
pub const MIGRATIONS_DIR: &str = "migrations";

type FileWriter = Box<dyn FnOnce(&mut dyn Write) -> io::Result<()>>;

/// A temporary directory, removed on [`WorkingDir::close`] or drop.
#[derive(Debug)]
pub struct WorkingDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

/// Builder for [`WorkingDir`].
#[derive(Default)]
pub struct WorkingDirBuilder {
    atlas_hcl: Option<FileWriter>,
    migrations: Option<PathBuf>,
}

impl std::fmt::Debug for WorkingDirBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingDirBuilder")
            .field("atlas_hcl", &self.atlas_hcl.is_some())
            .field("migrations", &self.migrations)
            .finish()
    }
}

impl WorkingDirBuilder {
    /// Write `atlas.hcl` with `f`.
    #[must_use]
    pub fn atlas_hcl(mut self, f: impl FnOnce(&mut dyn Write) -> io::Result<()> + 'static) -> Self {
        self.atlas_hcl = Some(Box::new(f));
        self
    }

    /// Copy the files under `dir` into `migrations/`.
    #[must_use]
    pub fn migrations(mut self, dir: impl Into<PathBuf>) -> Self {
        self.migrations = Some(dir.into());
        self
    }

    /// Create the directory and its files.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or one of its files cannot be
    /// created. Nothing is left behind on failure.
    pub fn build(self) -> io::Result<WorkingDir> {
        let wd = WorkingDir::new()?;
        if let Some(f) = self.atlas_hcl {
            wd.create_file(ATLAS_HCL, f)?;
        }
        if let Some(src) = &self.migrations {
            wd.copy_dir(MIGRATIONS_DIR, src)?;
        }
        Ok(wd)
    }
}

impl WorkingDir {
    /// Create an empty working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("atlasexec-").tempdir()?;
        tracing::debug!(path = %dir.path().display(), "Created working directory");
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    #[must_use]
    pub fn builder() -> WorkingDirBuilder {
        WorkingDirBuilder::default()
    }

    /// Root of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `name` inside the directory.
    #[must_use]
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Write `data` to `name`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_file(&self, name: impl AsRef<Path>, data: impl AsRef<[u8]>) -> io::Result<PathBuf> {
        let path = self.prepare(name.as_ref())?;
        fs::write(&path, data)?;
        Ok(path)
    }

    /// Create `name` and fill it with `f`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created, or the error of `f`.
    pub fn create_file(
        &self,
        name: impl AsRef<Path>,
        f: impl FnOnce(&mut dyn Write) -> io::Result<()>,
    ) -> io::Result<PathBuf> {
        let path = self.prepare(name.as_ref())?;
        let mut file = io::BufWriter::new(fs::File::create(&path)?);
        f(&mut file)?;
        file.flush()?;
        Ok(path)
    }

    /// Copy the tree under `src` into `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `src` cannot be read or a file cannot be copied.
    pub fn copy_dir(&self, name: impl AsRef<Path>, src: impl AsRef<Path>) -> io::Result<()> {
        let src = src.as_ref();
        let dst = self.join(name);
        for entry in WalkDir::new(src) {
            let entry = entry.map_err(io::Error::from)?;
            let rel = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let target = dst.join(rel);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                fs::copy(entry.path(), &target)?;
            }
        }
        Ok(())
    }

    /// Remove the directory. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed.
    pub fn close(&mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }

    fn prepare(&self, name: &Path) -> io::Result<PathBuf> {
        let path = self.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}

/// A temporary file, removed when dropped.
#[derive(Debug)]
pub struct TempFile {
    url: String,
    _file: tempfile::TempPath,
}

impl TempFile {
    /// `file://` URL of the file.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Write `content` to a temporary file named `atlasexec-*.{ext}`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn temp_file(content: &str, ext: &str) -> io::Result<TempFile> {
    let suffix = format!(".{ext}");
    let mut file = tempfile::Builder::new()
        .prefix("atlasexec-")
        .suffix(&suffix)
        .tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    let path = file.into_temp_path();
    Ok(TempFile {
        url: format!("file://{}", path.display()),
        _file: path,
    })
}
