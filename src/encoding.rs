use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// Byte order mark, encoded per target encoding when written back
const BOM: char = '\u{FEFF}';

/// The encoding a text file is read in and written back with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
    bom: bool,
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            bom: false,
        }
    }
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// Decode bytes strictly, dropping the BOM if this encoding carries one
    ///
    /// # Returns
    /// * `Option<String>` - None when the bytes are malformed for this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        let body = if self.bom {
            match Encoding::for_bom(bytes) {
                Some((encoding, len)) if encoding == self.encoding => &bytes[len..],
                _ => return None,
            }
        } else {
            bytes
        };

        self.encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(|text| text.into_owned())
    }

    /// Encode text, restoring the BOM if the original had one
    ///
    /// # Returns
    /// * `Option<Vec<u8>>` - None when the text has characters this encoding cannot represent
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(text.len() + 3);

        if self.encoding == UTF_16LE || self.encoding == UTF_16BE {
            // encoding_rs only decodes UTF-16, so the encoder is written out here
            let little_endian = self.encoding == UTF_16LE;
            let units = self.bom.then_some(BOM as u16).into_iter().chain(text.encode_utf16());
            for unit in units {
                if little_endian {
                    out.extend_from_slice(&unit.to_le_bytes());
                } else {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
            return Some(out);
        }

        if self.bom {
            let mut buf = [0; 4];
            out.extend_from_slice(BOM.encode_utf8(&mut buf).as_bytes());
        }
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return None;
        }
        out.extend_from_slice(&bytes);
        Some(out)
    }
}

/// Guess the encoding of a file's content
///
/// A BOM decides on its own. Pure ASCII (and empty input) is inconclusive,
/// since every supported encoding reads it the same way. Valid UTF-8 is
/// UTF-8. Anything else goes to chardetng, and its guess is kept only when
/// the content decodes and encodes back to the same bytes; otherwise the
/// content is read as windows-1252, where every byte round-trips.
///
/// # Arguments
/// * `bytes` - The complete file content
///
/// # Returns
/// * `Option<TextEncoding>` - None when the content gives no hint
pub fn detect_encoding(bytes: &[u8]) -> Option<TextEncoding> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(TextEncoding {
            encoding,
            bom: true,
        });
    }

    if Encoding::ascii_valid_up_to(bytes) == bytes.len() {
        return None;
    }

    let encoding = if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        guess_legacy(bytes)
    };
    Some(TextEncoding {
        encoding,
        bom: false,
    })
}

/// Legacy encoding for non-UTF-8 content, windows-1252 unless a guess round-trips
fn guess_legacy(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, false);
    if guess == WINDOWS_1252 {
        return guess;
    }

    let candidate = TextEncoding {
        encoding: guess,
        bom: false,
    };
    let round_trips = candidate
        .decode(bytes)
        .and_then(|text| candidate.encode(&text))
        .is_some_and(|out| out == bytes);
    if round_trips {
        guess
    } else {
        tracing::debug!("Guessed {} but it does not round-trip, using windows-1252", guess.name());
        WINDOWS_1252
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::SHIFT_JIS;

    #[test]
    fn test_ascii_is_inconclusive() {
        assert_eq!(detect_encoding(b""), None);
        assert_eq!(detect_encoding(b"plain ascii\n"), None);
    }

    #[test]
    fn test_detects_utf8_and_legacy() {
        let utf8 = detect_encoding("naïve café".as_bytes()).unwrap();
        assert_eq!(utf8.name(), "UTF-8");
        assert!(!utf8.has_bom());

        let french = b"Le caf\xe9 est tr\xe8s bon, d\xe9j\xe0 pr\xeat pour la f\xeate de No\xebl.";
        let latin = detect_encoding(french).unwrap();
        assert_eq!(latin.name(), "windows-1252");
        assert_eq!(
            latin.decode(french).unwrap(),
            "Le café est très bon, déjà prêt pour la fête de Noël."
        );
    }

    #[test]
    fn test_detects_shift_jis() {
        let text = "これは日本語のテキストです。ファイルの内容を置き換えるときに文字化けしないこと。";
        let (bytes, _, _) = SHIFT_JIS.encode(text);

        let encoding = detect_encoding(&bytes).unwrap();

        assert_eq!(encoding.name(), "Shift_JIS");
        assert_eq!(encoding.decode(&bytes).unwrap(), text);
        assert_eq!(encoding.encode(text).unwrap(), bytes.into_owned());
    }

    #[test]
    fn test_detects_boms() {
        let utf8 = detect_encoding(b"\xef\xbb\xbfhi").unwrap();
        assert_eq!(utf8.name(), "UTF-8");
        assert!(utf8.has_bom());

        let le = detect_encoding(b"\xff\xfeh\x00i\x00").unwrap();
        assert_eq!(le.name(), "UTF-16LE");

        let be = detect_encoding(b"\xfe\xff\x00h\x00i").unwrap();
        assert_eq!(be.name(), "UTF-16BE");
    }

    #[test]
    fn test_bom_survives_rewrite() {
        for original in [
            &b"\xef\xbb\xbfabc"[..],
            &b"\xff\xfea\x00b\x00c\x00"[..],
            &b"\xfe\xff\x00a\x00b\x00c"[..],
        ] {
            let encoding = detect_encoding(original).unwrap();
            let text = encoding.decode(original).unwrap();
            assert_eq!(text, "abc");
            assert_eq!(encoding.encode(&text).unwrap(), original);
        }
    }

    #[test]
    fn test_legacy_bytes_round_trip() {
        let original: Vec<u8> = (0x80..=0xff).chain(b"abc".iter().copied()).collect();
        let encoding = detect_encoding(&original).unwrap();
        let text = encoding.decode(&original).unwrap();
        assert_eq!(encoding.encode(&text).unwrap(), original);
    }

    #[test]
    fn test_unencodable_text() {
        let latin = TextEncoding {
            encoding: WINDOWS_1252,
            bom: false,
        };
        assert_eq!(latin.encode("日本"), None);
        assert_eq!(TextEncoding::default().encode("日本").unwrap(), "日本".as_bytes());
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(TextEncoding::default().decode(b"caf\xe9"), None);
    }
}
