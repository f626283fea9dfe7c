use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::result::ZipError;

use crate::DocxError;

/// Main document part of a WordprocessingML package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Default cap on the decompressed size of the part we read.
pub const DEFAULT_MAX_PART_SIZE: u64 = 64 * 1024 * 1024;

/// Read the markup of `part` out of the zip container at `path`.
///
/// `max_size` limits the decompressed part size in bytes (0 = unlimited).
pub fn load_part(path: &Path, part: &str, max_size: u64) -> Result<String, DocxError> {
    let file = File::open(path).map_err(|source| DocxError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|source| DocxError::Container {
        path: path.to_path_buf(),
        source,
    })?;

    let entry = match archive.by_name(part) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(DocxError::MissingPart {
                path: path.to_path_buf(),
                part: part.to_string(),
            });
        }
        Err(source) => {
            return Err(DocxError::Container {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    // The header size can lie; cap the actual read as well.
    if max_size > 0 && entry.size() > max_size {
        return Err(DocxError::PartTooLarge {
            part: part.to_string(),
            limit: max_size,
        });
    }
    let limit = if max_size > 0 { max_size } else { u64::MAX };

    let mut buf = Vec::with_capacity(entry.size().min(limit) as usize);
    entry
        .take(limit.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|source| DocxError::Read {
            part: part.to_string(),
            source,
        })?;

    if buf.len() as u64 > limit {
        return Err(DocxError::PartTooLarge {
            part: part.to_string(),
            limit: max_size,
        });
    }

    String::from_utf8(buf).map_err(|_| DocxError::NotUtf8 {
        part: part.to_string(),
    })
}

/// Read the main document part (`word/document.xml`).
pub fn load_document_xml(path: &Path) -> Result<String, DocxError> {
    load_part(path, DOCUMENT_PART, DEFAULT_MAX_PART_SIZE)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, content) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn reads_named_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.docx");
        write_zip(&path, &[(DOCUMENT_PART, "<w:document/>")]);

        assert_eq!(load_document_xml(&path).unwrap(), "<w:document/>");
    }

    #[test]
    fn missing_part_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.docx");
        write_zip(&path, &[("word/styles.xml", "<w:styles/>")]);

        let err = load_document_xml(&path).unwrap_err();
        assert!(matches!(err, DocxError::MissingPart { ref part, .. } if part == DOCUMENT_PART));
    }

    #[test]
    fn missing_container_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document_xml(&dir.path().join("absent.docx")).unwrap_err();
        assert!(matches!(err, DocxError::Open { .. }));
    }

    #[test]
    fn non_zip_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.docx");
        std::fs::write(&path, "not a zip at all").unwrap();

        let err = load_document_xml(&path).unwrap_err();
        assert!(matches!(err, DocxError::Container { .. }));
    }

    #[test]
    fn oversized_part_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.docx");
        let body = "x".repeat(2048);
        write_zip(&path, &[(DOCUMENT_PART, body.as_str())]);

        let err = load_part(&path, DOCUMENT_PART, 1024).unwrap_err();
        assert!(matches!(err, DocxError::PartTooLarge { limit: 1024, .. }));
    }
}
