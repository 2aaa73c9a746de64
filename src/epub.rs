//! EPUB container access for the navigation document.
//!
//! Opens an EPUB, locates its table of contents (EPUB3 nav document
//! preferred, EPUB2 NCX as the fallback), and reads or replaces the TOC
//! text. The whole archive is held in memory; [`Epub::save`] writes a new
//! file with the replaced entry, mimetype first and uncompressed.

use std::io::{Read, Write};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Which kind of table of contents the book carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocKind {
    /// EPUB3 navigation document (XHTML).
    Nav,
    /// EPUB2 NCX.
    Ncx,
}

/// An EPUB archive loaded into memory.
pub struct Epub {
    /// Every archive entry in index order.
    entries: Vec<(String, Vec<u8>)>,
    toc: Option<(String, TocKind)>,
}

impl Epub {
    /// Open an EPUB file and locate its table of contents.
    ///
    /// Locating the TOC scans the OPF manifest: an item with the `nav`
    /// property (or a `nav.xhtml`/`nav.html` href) wins; otherwise the NCX
    /// item (`application/x-dtbncx+xml` media type or a `.ncx` href) is
    /// used. A book with neither still opens; [`Epub::toc`] reports it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            entries.push((name, data));
        }

        let mut epub = Self { entries, toc: None };

        let container = epub.entry_text("META-INF/container.xml").ok_or_else(|| {
            Error::InvalidEpub("missing META-INF/container.xml".to_string())
        })??;
        let opf_path = parse_container_xml(&container)?;
        let opf_dir = Path::new(&opf_path)
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        let opf = epub
            .entry_text(&opf_path)
            .ok_or_else(|| Error::InvalidEpub(format!("missing package document: {opf_path}")))??;
        let items = parse_manifest(&opf)?;
        epub.toc = locate_toc(&items, &opf_dir);

        Ok(epub)
    }

    /// The TOC resource path and kind.
    pub fn toc(&self) -> Result<(&str, TocKind)> {
        self.toc
            .as_ref()
            .map(|(path, kind)| (path.as_str(), *kind))
            .ok_or_else(|| Error::NoToc("no nav document or NCX in the manifest".to_string()))
    }

    /// Read the TOC text (BOM stripped).
    pub fn toc_text(&self) -> Result<String> {
        let (path, _) = self.toc()?;
        let path = path.to_string();
        match self.entry_text(&path) {
            Some(text) => text,
            None => Err(Error::InvalidEpub(format!("missing TOC resource: {path}"))),
        }
    }

    /// Replace the TOC text in memory.
    pub fn set_toc_text(&mut self, text: String) -> Result<()> {
        let (path, _) = self.toc()?;
        let path = path.to_string();
        let idx = self
            .entry_index(&path)
            .ok_or_else(|| Error::InvalidEpub(format!("missing TOC resource: {path}")))?;
        self.entries[idx].1 = text.into_bytes();
        Ok(())
    }

    /// Write the archive to disk. The mimetype entry comes first, stored
    /// uncompressed; everything else is deflated, in original order.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut zip = ZipWriter::new(file);

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        if let Some((name, data)) = self.entries.iter().find(|(name, _)| name == "mimetype") {
            zip.start_file(name.as_str(), stored)?;
            zip.write_all(data)?;
        }
        for (name, data) in &self.entries {
            if name == "mimetype" {
                continue;
            }
            zip.start_file(name.as_str(), deflated)?;
            zip.write_all(data)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn entry_index(&self, path: &str) -> Option<usize> {
        if let Some(i) = self.entries.iter().position(|(name, _)| name == path) {
            return Some(i);
        }
        // Fallback: percent-decoded path (handles malformed EPUBs)
        let decoded = percent_encoding::percent_decode_str(path)
            .decode_utf8()
            .ok()?;
        self.entries.iter().position(|(name, _)| *name == decoded)
    }

    fn entry_text(&self, path: &str) -> Option<Result<String>> {
        let idx = self.entry_index(path)?;
        let bytes = strip_bom(&self.entries[idx].1);
        Some(String::from_utf8(bytes.to_vec()).map_err(Error::from))
    }
}

/// Parse META-INF/container.xml to find the OPF path.
fn parse_container_xml(content: &str) -> Result<String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"rootfile" => {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"full-path" {
                        return Ok(String::from_utf8(attr.value.to_vec())?);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    Err(Error::InvalidEpub(
        "no rootfile found in container.xml".to_string(),
    ))
}

struct ManifestItem {
    href: String,
    media_type: String,
    properties: Option<String>,
}

/// Collect the manifest items of the OPF package document.
fn parse_manifest(content: &str) -> Result<Vec<ManifestItem>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if local_name(e.name().as_ref()) == b"item" =>
            {
                let mut href = String::new();
                let mut media_type = String::new();
                let mut properties: Option<String> = None;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"href" => href = String::from_utf8(attr.value.to_vec())?,
                        b"media-type" => media_type = String::from_utf8(attr.value.to_vec())?,
                        b"properties" => {
                            properties = Some(String::from_utf8(attr.value.to_vec())?)
                        }
                        _ => {}
                    }
                }

                if !href.is_empty() {
                    items.push(ManifestItem {
                        href,
                        media_type,
                        properties,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn locate_toc(items: &[ManifestItem], opf_dir: &str) -> Option<(String, TocKind)> {
    let nav = items.iter().find(|item| {
        item.properties
            .as_ref()
            .is_some_and(|props| props.split_ascii_whitespace().any(|p| p == "nav"))
            || {
                let href = item.href.to_lowercase();
                href.contains("nav.xhtml") || href.contains("nav.html")
            }
    });
    if let Some(item) = nav {
        return Some((resolve_path(opf_dir, &item.href), TocKind::Nav));
    }

    let ncx = items.iter().find(|item| {
        item.media_type == "application/x-dtbncx+xml" || item.href.to_lowercase().ends_with(".ncx")
    })?;
    Some((resolve_path(opf_dir, &ncx.href), TocKind::Ncx))
}

fn resolve_path(base: &str, href: &str) -> String {
    if base.is_empty() {
        href.to_string()
    } else {
        format!("{base}/{href}")
    }
}

/// Strip UTF-8 BOM if present.
fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

/// Extract local name from a namespaced XML name (e.g. `opf:item` -> `item`).
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}
