//! Display formatting utilities.
//!
//! Pure functions mapping byte counts to human units, unix timestamps to
//! display strings, and filenames to coarse type categories.

use serde::{Deserialize, Serialize};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Render a byte count with one decimal and a 1024 unit ladder.
/// Zero renders as an em dash, matching how the tables show missing sizes.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "—".to_string();
    }

    let mut n = bytes as f64;
    let mut i = 0;
    while n >= 1024.0 && i < UNITS.len() - 1 {
        n /= 1024.0;
        i += 1;
    }
    format!("{:.1} {}", n, UNITS[i])
}

/// Render unix seconds as a UTC timestamp, or an em dash when absent.
pub fn format_timestamp(secs: i64) -> String {
    if secs <= 0 {
        return "—".to_string();
    }

    match chrono::DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "—".to_string(),
    }
}

/// Coarse file type category derived from the filename extension.
/// Not stored remotely; recomputed whenever a record is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Document,
    Image,
    Audio,
    Video,
    Archive,
    Code,
    Data,
    Other,
}

impl FileKind {
    /// Derive the category from a filename.
    pub fn from_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" | "doc" | "docx" | "txt" | "md" | "rtf" | "odt" => FileKind::Document,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "bmp" => FileKind::Image,
            "mp3" | "wav" | "flac" | "ogg" | "m4a" => FileKind::Audio,
            "mp4" | "mov" | "avi" | "mkv" | "webm" => FileKind::Video,
            "zip" | "tar" | "gz" | "bz2" | "xz" | "rar" | "7z" => FileKind::Archive,
            "rs" | "py" | "js" | "ts" | "tsx" | "java" | "c" | "cpp" | "h" | "go" | "rb"
            | "sh" => FileKind::Code,
            "json" | "jsonl" | "yaml" | "yml" | "toml" | "csv" | "tsv" | "xml" | "parquet" => {
                FileKind::Data
            }
            _ => FileKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Image => "image",
            FileKind::Audio => "audio",
            FileKind::Video => "video",
            FileKind::Archive => "archive",
            FileKind::Code => "code",
            FileKind::Data => "data",
            FileKind::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_unit_ladder() {
        assert_eq!(format_bytes(0), "—");
        assert_eq!(format_bytes(512), "512.0 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1.0 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn test_format_bytes_caps_at_largest_unit() {
        let huge = 1024u64.pow(5) * 3;
        assert_eq!(format_bytes(huge), "3072.0 TB");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "—");
        assert_eq!(format_timestamp(-5), "—");
        assert!(format_timestamp(1_700_000_000).starts_with("2023-11-14"));
    }

    #[test]
    fn test_file_kind_from_name() {
        assert_eq!(FileKind::from_name("report.pdf"), FileKind::Document);
        assert_eq!(FileKind::from_name("photo.JPEG"), FileKind::Image);
        assert_eq!(FileKind::from_name("dump.tar"), FileKind::Archive);
        assert_eq!(FileKind::from_name("main.rs"), FileKind::Code);
        assert_eq!(FileKind::from_name("rows.csv"), FileKind::Data);
        assert_eq!(FileKind::from_name("no_extension"), FileKind::Other);
        assert_eq!(FileKind::from_name("weird.xyz"), FileKind::Other);
    }
}
