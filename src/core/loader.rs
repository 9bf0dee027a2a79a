//! File loading: encoding detection, format selection and parsing.
//!
//! Files are read wholesale, decoded to text, then handed to `serde_json` or
//! `serde_yaml`.  YAML goes through plain deserialisation into a
//! [`serde_yaml::Value`], so custom tags are carried as data and never
//! resolved to anything executable.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::document::Document;

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// ───────────────────────────────────────── format ────────────

/// Which parser to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from the file extension.  `None` means "try both".
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

// ───────────────────────────────────────── encoding ──────────

/// Text encoding detected for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    /// Fallback when the bytes are not valid UTF-8: every byte is one char.
    Windows1252,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf8Bom => "UTF-8 BOM",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Windows1252 => "Windows-1252",
        })
    }
}

/// Detect the encoding of `bytes` and decode them.
///
/// Order: byte-order marks, then BOM-less UTF-16 (sniffed from a NUL in the
/// first code unit, since JSON and YAML documents start with ASCII), then
/// strict UTF-8, then Windows-1252.
pub fn decode_bytes(bytes: &[u8]) -> (String, TextEncoding) {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return (String::from_utf8_lossy(rest).into_owned(), TextEncoding::Utf8Bom);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return (decode_utf16(rest, u16::from_le_bytes), TextEncoding::Utf16Le);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return (decode_utf16(rest, u16::from_be_bytes), TextEncoding::Utf16Be);
    }
    if bytes.len() >= 2 && bytes.len() % 2 == 0 {
        match (bytes[0], bytes[1]) {
            (0, b) if b != 0 => return (decode_utf16(bytes, u16::from_be_bytes), TextEncoding::Utf16Be),
            (b, 0) if b != 0 => return (decode_utf16(bytes, u16::from_le_bytes), TextEncoding::Utf16Le),
            _ => {}
        }
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_owned(), TextEncoding::Utf8),
        Err(_) => (bytes.iter().map(|&b| cp1252_char(b)).collect(), TextEncoding::Windows1252),
    }
}

/// Windows-1252 assignments for 0x80..=0x9F; the rest of the byte range is
/// Latin-1.  Unassigned slots become U+FFFD so no C1 control reaches the
/// terminal.
const CP1252_HIGH: [char; 32] = [
    '€', '\u{FFFD}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{FFFD}', 'Ž', '\u{FFFD}',
    '\u{FFFD}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', '\u{FFFD}', 'ž', 'Ÿ',
];

fn cp1252_char(b: u8) -> char {
    match b {
        0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
        _ => char::from(b),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

// ───────────────────────────────────────── loading ───────────

/// A document together with where it came from and how it was read.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub format: DocumentFormat,
    pub encoding: TextEncoding,
    pub source: Option<PathBuf>,
}

/// Parse `text` with the given format, or JSON-then-YAML when `None`.
pub fn parse_text(
    text: &str,
    format: Option<DocumentFormat>,
) -> Result<(Document, DocumentFormat), LoadError> {
    match format {
        Some(DocumentFormat::Json) => {
            let value: serde_json::Value = serde_json::from_str(text)?;
            Ok((value.into(), DocumentFormat::Json))
        }
        Some(DocumentFormat::Yaml) => {
            let mut value: serde_yaml::Value = serde_yaml::from_str(text)?;
            value.apply_merge()?;
            Ok((value.into(), DocumentFormat::Yaml))
        }
        None => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => Ok((value.into(), DocumentFormat::Json)),
            Err(_) => parse_text(text, Some(DocumentFormat::Yaml)),
        },
    }
}

/// Read, decode, and parse a file.  `format` overrides extension detection.
pub fn load_path(path: &Path, format: Option<DocumentFormat>) -> Result<LoadedDocument, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, encoding) = decode_bytes(&bytes);
    let format = format.or_else(|| DocumentFormat::from_path(path));
    let (document, format) = parse_text(&text, format)?;
    tracing::debug!(
        "loaded {} as {} ({encoding}, {} values)",
        path.display(),
        format.label(),
        document.value_count()
    );
    Ok(LoadedDocument {
        document,
        format,
        encoding,
        source: Some(path.to_path_buf()),
    })
}

/// The document shown when no file is given on the command line.
pub fn sample_document() -> LoadedDocument {
    const SAMPLE: &str = r#"{
        "name": "John",
        "age": 30,
        "cars": [
            { "name": "Ford", "models": ["Fiesta", "Focus", "Mustang"] },
            { "name": "BMW", "models": ["320", "X3", "X5"] },
            { "name": "Fiat", "models": ["500", "Panda"] }
        ]
    }"#;
    let document = serde_json::from_str::<serde_json::Value>(SAMPLE)
        .map(Document::from)
        .unwrap_or(Document::Object(Vec::new()));
    LoadedDocument {
        document,
        format: DocumentFormat::Json,
        encoding: TextEncoding::Utf8,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::core::document::Scalar;

    #[test]
    fn decodes_plain_and_bom_utf8() {
        assert_eq!(decode_bytes(b"{\"a\":1}"), ("{\"a\":1}".to_string(), TextEncoding::Utf8));
        let mut bom = vec![0xEF, 0xBB, 0xBF];
        bom.extend_from_slice("é: 1".as_bytes());
        assert_eq!(decode_bytes(&bom), ("é: 1".to_string(), TextEncoding::Utf8Bom));
    }

    #[test]
    fn decodes_utf16_with_and_without_bom() {
        let text = "{\"k\": \"ü\"}";
        let le: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain(text.encode_utf16().flat_map(u16::to_le_bytes))
            .collect();
        assert_eq!(decode_bytes(&le), (text.to_string(), TextEncoding::Utf16Le));

        let be: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
        assert_eq!(decode_bytes(&be), (text.to_string(), TextEncoding::Utf16Be));
    }

    #[test]
    fn falls_back_to_windows_1252() {
        let bytes = b"name: caf\xe9\n";
        let (text, enc) = decode_bytes(bytes);
        assert_eq!(enc, TextEncoding::Windows1252);
        assert_eq!(text, "name: café\n");
    }

    #[test]
    fn windows_1252_maps_smart_quotes_and_hides_unassigned_bytes() {
        let (text, enc) = decode_bytes(b"q: \x93hi\x94 \x80\x81\n");
        assert_eq!(enc, TextEncoding::Windows1252);
        assert_eq!(text, "q: \u{201C}hi\u{201D} \u{20AC}\u{FFFD}\n");
        assert!(!text.chars().any(|c| ('\u{80}'..='\u{9F}').contains(&c)));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.JSON")), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn unknown_extension_tries_json_then_yaml() {
        let (_, fmt) = parse_text("[1, 2]", None).unwrap();
        assert_eq!(fmt, DocumentFormat::Json);
        let (doc, fmt) = parse_text("key: value\n", None).unwrap();
        assert_eq!(fmt, DocumentFormat::Yaml);
        assert_eq!(
            doc,
            Document::Object(vec![(
                "key".into(),
                Document::Scalar(Scalar::String("value".into()))
            )])
        );
    }

    #[test]
    fn yaml_merge_keys_are_resolved() {
        let text = "base: &b\n  x: 1\nchild:\n  <<: *b\n  y: 2\n";
        let (doc, _) = parse_text(text, Some(DocumentFormat::Yaml)).unwrap();
        let Document::Object(entries) = doc else {
            panic!("expected object");
        };
        let child = entries.iter().find(|(k, _)| k == "child").map(|(_, v)| v);
        let Some(Document::Object(child)) = child else {
            panic!("expected child mapping");
        };
        let keys: Vec<&str> = child.iter().map(|(k, _)| k.as_str()).collect();
        assert!(!keys.contains(&"<<"));
        assert!(keys.contains(&"x") && keys.contains(&"y"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_text("{\"a\": ", Some(DocumentFormat::Json)).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = parse_text("a: [1, 2\n", Some(DocumentFormat::Yaml)).unwrap_err();
        assert!(matches!(err, LoadError::Yaml(_)));
    }

    #[test]
    fn load_path_reads_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "cars:\n  - name: Ford\n  - name: BMW").unwrap();
        let loaded = load_path(file.path(), None).unwrap();
        assert_eq!(loaded.format, DocumentFormat::Yaml);
        assert_eq!(loaded.encoding, TextEncoding::Utf8);
        assert_eq!(loaded.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn load_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(&dir.path().join("missing.json"), None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn sample_document_has_three_cars() {
        let Document::Object(entries) = sample_document().document else {
            panic!("expected object");
        };
        let cars = entries.iter().find(|(k, _)| k == "cars").map(|(_, v)| v);
        assert!(matches!(cars, Some(Document::Array(items)) if items.len() == 3));
    }
}
