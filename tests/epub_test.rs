use std::io::Write;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use toclint::pattern::Matchers;
use toclint::{CheckConfig, Epub, TocKind, extract_texts, placeholder, run_check};

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const OPF_NAV: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>测试</dc:title>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine>
    <itemref idref="ch1"/>
  </spine>
</package>"#;

const OPF_NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>测试</dc:title>
  </metadata>
  <manifest>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="ch1"/>
  </spine>
</package>"#;

const NAV: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<body>
  <nav epub:type="toc">
    <ol>
      <li><a href="ch1.xhtml">第一章 风起</a></li>
      <li><a href="ch2.xhtml">第二章 云涌</a></li>
      <li><a href="ch4.xhtml">第四章 雷动</a></li>
    </ol>
  </nav>
</body>
</html>"#;

const NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <navMap>
    <navPoint id="np1" playOrder="1">
      <navLabel><text>第一章</text></navLabel>
      <content src="ch1.xhtml"/>
    </navPoint>
    <navPoint id="np2" playOrder="2">
      <navLabel><text>第三章</text></navLabel>
      <content src="ch3.xhtml"/>
    </navPoint>
  </navMap>
</ncx>"#;

fn build_epub(opf: &str, toc_name: &str, toc: &str) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut cursor);

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();

    zip.start_file("META-INF/container.xml", deflated).unwrap();
    zip.write_all(CONTAINER_XML.as_bytes()).unwrap();

    zip.start_file("OEBPS/content.opf", deflated).unwrap();
    zip.write_all(opf.as_bytes()).unwrap();

    let toc_path = format!("OEBPS/{toc_name}");
    zip.start_file(toc_path.as_str(), deflated).unwrap();
    zip.write_all(toc.as_bytes()).unwrap();

    zip.start_file("OEBPS/ch1.xhtml", deflated).unwrap();
    zip.write_all(b"<html xmlns=\"http://www.w3.org/1999/xhtml\"/>")
        .unwrap();

    zip.finish().unwrap();
    cursor.into_inner()
}

fn write_epub(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_open_locates_nav() {
    let dir = TempDir::new().unwrap();
    let path = write_epub(&dir, "book.epub", &build_epub(OPF_NAV, "nav.xhtml", NAV));

    let epub = Epub::open(&path).unwrap();
    let (toc_path, kind) = epub.toc().unwrap();
    assert_eq!(toc_path, "OEBPS/nav.xhtml");
    assert_eq!(kind, TocKind::Nav);
}

#[test]
fn test_open_locates_ncx() {
    let dir = TempDir::new().unwrap();
    let path = write_epub(&dir, "book.epub", &build_epub(OPF_NCX, "toc.ncx", NCX));

    let epub = Epub::open(&path).unwrap();
    let (toc_path, kind) = epub.toc().unwrap();
    assert_eq!(toc_path, "OEBPS/toc.ncx");
    assert_eq!(kind, TocKind::Ncx);
}

#[test]
fn test_check_reports_missing_from_nav() {
    let dir = TempDir::new().unwrap();
    let path = write_epub(&dir, "book.epub", &build_epub(OPF_NAV, "nav.xhtml", NAV));

    let epub = Epub::open(&path).unwrap();
    let texts = extract_texts(&epub.toc_text().unwrap());
    let report = run_check(&texts, &CheckConfig::default()).unwrap();

    assert_eq!(report.missing, vec![3]);
}

#[test]
fn test_check_reports_missing_from_ncx() {
    // NCX markup is plain XML; the extractor and check work on it unchanged
    let dir = TempDir::new().unwrap();
    let path = write_epub(&dir, "book.epub", &build_epub(OPF_NCX, "toc.ncx", NCX));

    let epub = Epub::open(&path).unwrap();
    let texts = extract_texts(&epub.toc_text().unwrap());
    let report = run_check(&texts, &CheckConfig::default()).unwrap();

    assert_eq!(report.missing, vec![2]);
}

#[test]
fn test_insert_and_remove_through_file() {
    let dir = TempDir::new().unwrap();
    let path = write_epub(&dir, "book.epub", &build_epub(OPF_NAV, "nav.xhtml", NAV));
    let config = CheckConfig::default();

    // Insert placeholders and write a new book
    let mut epub = Epub::open(&path).unwrap();
    let content = epub.toc_text().unwrap();
    let texts = extract_texts(&content);
    let report = run_check(&texts, &config).unwrap();
    assert_eq!(report.missing, vec![3]);

    let matchers = Matchers::build(&config).unwrap();
    let locations = placeholder::chapter_locations(&content, &matchers);
    let (updated, inserted) =
        placeholder::insert_placeholders(&content, &report.missing, &locations, &config).unwrap();
    assert_eq!(inserted, 1);

    epub.set_toc_text(updated).unwrap();
    let fixed = dir.path().join("fixed.epub");
    epub.save(&fixed).unwrap();

    // The written book carries the placeholder, and its gap is gone
    let epub = Epub::open(&fixed).unwrap();
    let content = epub.toc_text().unwrap();
    assert!(content.contains("【★缺失★】第3章"));
    assert!(content.contains("toclint-missing-chapter"));

    let report = run_check(&extract_texts(&content), &config).unwrap();
    assert!(report.missing.is_empty());

    // Removing restores the original chapter set
    let (restored, removed) = placeholder::remove_placeholders(&content);
    assert_eq!(removed, 1);
    assert!(!restored.contains("缺失"));

    let mut epub = Epub::open(&fixed).unwrap();
    epub.set_toc_text(restored).unwrap();
    epub.save(&fixed).unwrap();

    let epub = Epub::open(&fixed).unwrap();
    let report = run_check(&extract_texts(&epub.toc_text().unwrap()), &config).unwrap();
    assert_eq!(report.missing, vec![3]);
}

#[test]
fn test_saved_archive_keeps_mimetype_first() {
    let dir = TempDir::new().unwrap();
    let path = write_epub(&dir, "book.epub", &build_epub(OPF_NAV, "nav.xhtml", NAV));

    let epub = Epub::open(&path).unwrap();
    let out = dir.path().join("out.epub");
    epub.save(&out).unwrap();

    let file = std::fs::File::open(&out).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), CompressionMethod::Stored);
}

#[test]
fn test_no_toc_reported() {
    let opf = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine><itemref idref="ch1"/></spine>
</package>"#;
    let dir = TempDir::new().unwrap();
    // The "toc" entry here is unreferenced by the manifest
    let path = write_epub(&dir, "book.epub", &build_epub(opf, "unused.xhtml", "<html/>"));

    let epub = Epub::open(&path).unwrap();
    assert!(matches!(epub.toc(), Err(toclint::Error::NoToc(_))));
}
