use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Extensions whose files are always treated as text
const ASSUME_TEXT: &[&str] = &[
    "cfg", "conf", "crt", "cs", "css", "html", "ini", "j2", "js", "json", "md", "pem", "ps1",
    "psm1", "py", "rst", "sh", "txt", "xml", "xsd", "yaml", "yml",
];

/// Extensions whose files are always treated as binary
const ASSUME_BINARY: &[&str] = &[
    "bin", "eot", "gz", "ico", "iso", "jpg", "otf", "p12", "png", "pyc", "rpm", "ttf", "woff",
    "woff2", "zip",
];

/// Number of leading bytes inspected when the extension is not conclusive
const SNIFF_LEN: u64 = 4096;

/// Decides whether a file is binary, first by extension, then by content
#[derive(Debug, Clone)]
pub struct Classifier {
    text: HashSet<String>,
    binary: HashSet<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            text: ASSUME_TEXT.iter().map(|ext| ext.to_string()).collect(),
            binary: ASSUME_BINARY.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

impl Classifier {
    /// Add extensions (with or without the leading dot) that are always text
    pub fn with_text_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            self.binary.remove(&ext);
            self.text.insert(ext);
        }
        self
    }

    /// Add extensions (with or without the leading dot) that are always binary
    pub fn with_binary_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            self.text.remove(&ext);
            self.binary.insert(ext);
        }
        self
    }

    /// Check whether a file must be left out of content replacement
    ///
    /// Files with a known extension are classified without being opened.
    /// Anything else is binary when its first 4 KiB contain a NUL byte.
    ///
    /// # Arguments
    /// * `path` - The file to classify
    ///
    /// # Returns
    /// * `io::Result<bool>` - true for binary files
    pub fn is_binary(&self, path: &Path) -> io::Result<bool> {
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            let ext = ext.to_lowercase();
            if self.text.contains(&ext) {
                return Ok(false);
            }
            if self.binary.contains(&ext) {
                return Ok(true);
            }
        }

        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
        Ok(head.contains(&0))
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_known_extensions_skip_sniffing() {
        let classifier = Classifier::default();
        // Neither file exists: a known extension must not open the file
        assert!(classifier.is_binary(Path::new("missing/logo.png")).unwrap());
        assert!(!classifier.is_binary(Path::new("missing/notes.md")).unwrap());
        assert!(classifier.is_binary(Path::new("missing/LOGO.PNG")).unwrap());
    }

    #[test]
    fn test_binary_extension_wins_over_text_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.bin");
        fs::write(&path, "just text").unwrap();

        assert!(Classifier::default().is_binary(&path).unwrap());
    }

    #[test]
    fn test_sniffing_unknown_extensions() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("main.rs");
        let binary = dir.path().join("blob.dat");
        let no_ext = dir.path().join("Makefile");
        fs::write(&text, "fn main() {}\n").unwrap();
        fs::write(&binary, b"\x7fELF\x00\x01").unwrap();
        fs::write(&no_ext, "all:\n").unwrap();

        let classifier = Classifier::default();
        assert!(!classifier.is_binary(&text).unwrap());
        assert!(classifier.is_binary(&binary).unwrap());
        assert!(!classifier.is_binary(&no_ext).unwrap());
    }

    #[test]
    fn test_nul_past_sniff_window_is_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.log");
        let mut content = vec![b'a'; SNIFF_LEN as usize];
        content.push(0);
        fs::write(&path, content).unwrap();

        assert!(!Classifier::default().is_binary(&path).unwrap());
    }

    #[test]
    fn test_custom_extensions() {
        let classifier = Classifier::default()
            .with_binary_extensions([".txt"])
            .with_text_extensions(["PNG", "svg"]);

        assert!(classifier.is_binary(Path::new("missing/a.txt")).unwrap());
        assert!(!classifier.is_binary(Path::new("missing/a.png")).unwrap());
        assert!(!classifier.is_binary(Path::new("missing/a.svg")).unwrap());
    }

    #[test]
    fn test_missing_file_with_unknown_extension_errors() {
        assert!(Classifier::default().is_binary(Path::new("missing/a.unknown")).is_err());
    }
}
