//! Byte-readable source files and their discovery.
//!
//! Ingestion only needs a filename (for role routing) and a way to read the
//! bytes. Where those come from is up to a [`ResourceResolver`].

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{validate_election_id, READ_BUFFER_SIZE};
use crate::error::{Result, TallyError};

/// A named, readable source document.
pub trait Resource {
    /// Filename without directories, used for role routing.
    fn filename(&self) -> &str;

    /// Open the resource for buffered reading.
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>>;
}

/// A file on disk.
#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
    filename: String,
}

impl FileResource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, filename }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, file)))
    }
}

/// An in-memory document.
#[derive(Debug, Clone)]
pub struct MemoryResource {
    filename: String,
    bytes: Vec<u8>,
}

impl MemoryResource {
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

impl Resource for MemoryResource {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(self.bytes.as_slice()))
    }
}

/// Source of the resources of one election.
pub trait ResourceResolver: Send + Sync {
    /// List all candidate source files for an election.
    ///
    /// # Errors
    /// Returns an error if the resource set cannot be determined at all.
    fn resolve(&self, election_id: &str) -> Result<Vec<Box<dyn Resource>>>;
}

/// Resolver over a data directory with one sub-directory per election.
///
/// `root/<election_id>/` is walked recursively for `.xml` files, which are
/// returned sorted by filename.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceResolver for DirectoryResolver {
    fn resolve(&self, election_id: &str) -> Result<Vec<Box<dyn Resource>>> {
        validate_election_id(election_id)?;

        let dir = self.root.join(election_id);
        if !dir.is_dir() {
            return Err(TallyError::ResourceResolution {
                election_id: election_id.to_string(),
                reason: format!("{} is not a directory", dir.display()),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).follow_links(true) {
            let entry = entry?;
            let is_xml = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
            if entry.file_type().is_file() && is_xml {
                files.push(FileResource::new(entry.into_path()));
            }
        }

        files.sort_by(|a, b| a.filename().cmp(b.filename()).then_with(|| a.path().cmp(b.path())));

        tracing::debug!(election_id, files = files.len(), dir = %dir.display(), "Resolved resources");

        Ok(files
            .into_iter()
            .map(|file| Box::new(file) as Box<dyn Resource>)
            .collect())
    }
}
