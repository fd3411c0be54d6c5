//! Format detection and reader registry
//!
//! Scene files come in two formats: the native boundary format (`.bnd`)
//! and the VRML interchange format (`.wrl`). Parsing itself is done by
//! reader collaborators registered here; the registry only decides which
//! reader a path is routed to and whether that capability exists.

use log::debug;
use std::io::BufRead;
use std::path::Path;
use wireview_core::{Error, Mesh, Result};

/// Scene file formats the store can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    /// Native boundary-representation format
    Native,
    /// VRML interchange format
    Interchange,
}

impl ModelFormat {
    /// Detect the format from the path extension.
    ///
    /// The lower-cased extension is searched for `bnd`, then `wrl`; the
    /// first match wins.
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        if extension.contains("bnd") {
            Some(ModelFormat::Native)
        } else if extension.contains("wrl") {
            Some(ModelFormat::Interchange)
        } else {
            None
        }
    }

    /// Short format name
    pub fn name(&self) -> &'static str {
        match self {
            ModelFormat::Native => "bnd",
            ModelFormat::Interchange => "wrl",
        }
    }
}

impl std::fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for reading meshes from an opened scene file
pub trait MeshReader: Send + Sync {
    /// Parse a mesh from `source`; `path` is only used for diagnostics
    fn read_mesh(&self, source: &mut dyn BufRead, path: &Path) -> Result<Mesh>;

    /// Get the format name this reader handles
    fn format_name(&self) -> &'static str;
}

/// Registry holding the reader collaborator for each format
#[derive(Default)]
pub struct FormatRegistry {
    native: Option<Box<dyn MeshReader>>,
    #[cfg(feature = "vrml")]
    interchange: Option<Box<dyn MeshReader>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with a native-format reader
    pub fn with_native(reader: Box<dyn MeshReader>) -> Self {
        let mut registry = Self::new();
        registry.register_native(reader);
        registry
    }

    /// Register the native-format reader, replacing any previous one
    pub fn register_native(&mut self, reader: Box<dyn MeshReader>) {
        debug!("registered native reader '{}'", reader.format_name());
        self.native = Some(reader);
    }

    /// Register the interchange-format importer, replacing any previous one
    #[cfg(feature = "vrml")]
    pub fn register_interchange(&mut self, reader: Box<dyn MeshReader>) {
        debug!("registered interchange importer '{}'", reader.format_name());
        self.interchange = Some(reader);
    }

    /// Whether interchange support was compiled in
    pub fn interchange_compiled() -> bool {
        cfg!(feature = "vrml")
    }

    /// Check if a format can be read
    pub fn supports(&self, format: ModelFormat) -> bool {
        self.reader(format).is_ok()
    }

    /// Get the reader for a format
    pub fn reader(&self, format: ModelFormat) -> Result<&dyn MeshReader> {
        match format {
            ModelFormat::Native => self.native.as_deref().ok_or_else(|| {
                Error::CapabilityUnavailable("no reader registered for the bnd format".to_string())
            }),
            ModelFormat::Interchange => self.interchange_reader(),
        }
    }

    #[cfg(feature = "vrml")]
    fn interchange_reader(&self) -> Result<&dyn MeshReader> {
        self.interchange.as_deref().ok_or_else(|| {
            Error::CapabilityUnavailable("no importer registered for the wrl format".to_string())
        })
    }

    #[cfg(not(feature = "vrml"))]
    fn interchange_reader(&self) -> Result<&dyn MeshReader> {
        Err(Error::CapabilityUnavailable(
            "VRML support not compiled in, cannot read wrl files".to_string(),
        ))
    }
}
