//! Topology document import.
//!
//! Provides [`TopologyParser`] to load topology files into a [`Topology`].
//! Sub-modules split the work by format:
//!
//! - [`source`] – File I/O abstraction
//! - [`plain`] – Line-oriented plain-text format
//! - [`xml`] – XML document format

pub mod plain;
pub mod source;
pub mod xml;

pub use plain::import_plain;
pub use source::*;
pub use xml::import_xml;

use crate::error::{ImportOptions, ImportReport};
use crate::model::Topology;
use anyhow::{Context, Result};
use camino::Utf8Path;

/// On-disk representation of a topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyFormat {
    Plain,
    Xml,
}

impl TopologyFormat {
    /// `.xml` files are XML; everything else is read as plain text.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => TopologyFormat::Xml,
            _ => TopologyFormat::Plain,
        }
    }
}

/// Import driver. Generic over [`ContentSource`] so it can read from the
/// filesystem ([`FsSource`]) or from any other backing store.
pub struct TopologyParser<S: ContentSource> {
    source: S,
    options: ImportOptions,
}

impl<S: ContentSource> TopologyParser<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the content of `tp` with the file at `path`. The format is
    /// taken from `format` or, when `None`, from the file extension.
    pub fn parse_file(
        &mut self,
        path: impl AsRef<Utf8Path>,
        format: Option<TopologyFormat>,
        tp: &mut Topology,
    ) -> Result<ImportReport> {
        let path = path.as_ref();
        let format = format.unwrap_or_else(|| TopologyFormat::from_path(path));
        let text = self.source.read_to_string(path)?;
        let report = match format {
            TopologyFormat::Plain => import_plain(tp, &text, self.options),
            TopologyFormat::Xml => import_xml(tp, &text, self.options),
        }
        .with_context(|| format!("Failed to import {}", path))?;
        log::info!(
            "Imported {} ({} nodes, {} links, {} diagnostics)",
            path,
            tp.node_count(),
            tp.link_count(),
            report.diagnostics.len()
        );
        Ok(report)
    }

    /// Load the file at `path` into a fresh [`Topology`].
    pub fn load_file(
        &mut self,
        path: impl AsRef<Utf8Path>,
        format: Option<TopologyFormat>,
    ) -> Result<(Topology, ImportReport)> {
        let mut tp = Topology::new();
        let report = self.parse_file(path, format, &mut tp)?;
        Ok((tp, report))
    }
}
