//! Line-oriented redaction and the shared decode fallback.

use std::fs;
use std::path::Path;

use scrub_core::TextRedactor;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoding {
    Utf8,
    Latin1,
}

/// Read a file as text: UTF-8 first, Latin-1 as the fallback.
///
/// The Latin-1 mapping is total, so reading cannot fail on content.
pub(crate) fn read_text(path: &Path) -> Result<(String, Encoding)> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(content) => Ok((content, Encoding::Utf8)),
        Err(err) => {
            let bytes = err.into_bytes();
            let content: String = bytes.iter().map(|&b| b as char).collect();
            Ok((content, Encoding::Latin1))
        }
    }
}

/// Write text back in the encoding it was read with.
pub(crate) fn write_text(path: &Path, content: &str, encoding: Encoding) -> Result<()> {
    match encoding {
        Encoding::Utf8 => fs::write(path, content)?,
        Encoding::Latin1 => {
            let bytes: Vec<u8> = content
                .chars()
                .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
                .collect();
            fs::write(path, bytes)?;
        }
    }
    Ok(())
}

/// Redact a line/property-style file in place. The file is rewritten
/// only when the content changed, so untouched files keep their bytes
/// and timestamps.
pub(crate) fn sanitize_file(path: &Path, redactor: &TextRedactor) -> Result<u64> {
    let (content, encoding) = read_text(path)?;
    let (redacted, count) = redactor.redact(&content);
    if redacted != content {
        write_text(path, &redacted, encoding)?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_core::Registry;

    fn scratch_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("scrub-text-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_property_file_redacted_in_place() {
        let path = scratch_file("settings.conf", b"password=s3cr3t\nhost=localhost\n");
        let redactor = TextRedactor::new(&Registry::builtin());

        let count = sanitize_file(&path, &redactor).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "password=PLACEHOLDER_PASSWORD\nhost=localhost\n"
        );
    }

    #[test]
    fn test_clean_file_not_rewritten() {
        let path = scratch_file("clean.ini", b"host=localhost\n");
        let before = fs::metadata(&path).unwrap().modified().unwrap();
        let redactor = TextRedactor::new(&Registry::builtin());

        let count = sanitize_file(&path, &redactor).unwrap();
        assert_eq!(count, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "host=localhost\n");
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn test_latin1_fallback_round_trips() {
        // 0xE9 is `é` in Latin-1 and invalid on its own in UTF-8.
        let path = scratch_file("legacy.cfg", b"caf\xe9\npassword=x\n");
        let redactor = TextRedactor::new(&Registry::builtin());

        let count = sanitize_file(&path, &redactor).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            fs::read(&path).unwrap(),
            b"caf\xe9\npassword=PLACEHOLDER_PASSWORD\n"
        );
    }
}
