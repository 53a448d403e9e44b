use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::domain::{Document, ParseError};

/// Reads a notices document.
///
/// # Errors
///
/// Returns an error if the reader fails or the text is not a valid notices
/// document.
pub fn read<R: BufRead>(reader: &mut R) -> Result<Document, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(Document::parse(&text)?)
}

/// Writes a notices document.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write<W: Write>(document: &Document, writer: &mut W) -> io::Result<()> {
    writer.write_all(document.render().as_bytes())?;
    writer.flush()
}

/// Loads the notices document at the given path.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or cannot be
/// parsed.
pub fn load(path: &Path) -> Result<Document, LoadError> {
    let file = File::open(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        _ => LoadError::Io(io_error),
    })?;

    let mut reader = BufReader::new(file);
    read(&mut reader)
}

/// Writes the document to the given path.
///
/// Parent directories are created automatically if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save(document: &Document, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(document, &mut writer)
}

/// Errors that can occur when loading a notices document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file was not found.
    #[error("file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The file is not a valid notices document.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;

    const TEXT: &str = "Notices\n\n-----\n\nzlib\n\nzlib license\n\nlibpng\n======\n\npng license\n";

    #[test]
    fn read_parses_document() {
        let document = read(&mut Cursor::new(TEXT)).unwrap();
        assert_eq!(document.sections().len(), 2);
    }

    #[test]
    fn write_round_trip() {
        let document = read(&mut Cursor::new(TEXT)).unwrap();

        let mut bytes = Vec::new();
        write(&document, &mut bytes).unwrap();

        assert_eq!(String::from_utf8(bytes).unwrap(), TEXT);
    }

    #[test]
    fn read_invalid_document() {
        let result = read(&mut Cursor::new("no headers here\n"));
        assert!(matches!(
            result,
            Err(LoadError::Parse(ParseError::NoSectionsFound))
        ));
    }

    #[test]
    fn save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/NOTICES.txt");
        let document = Document::parse(TEXT).unwrap();

        save(&document, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, document);
    }

    #[test]
    fn load_nonexistent_file() {
        let tmp = TempDir::new().unwrap();
        let result = load(&tmp.path().join("missing.txt"));
        assert!(matches!(result, Err(LoadError::NotFound)));
    }

    #[test]
    fn load_handles_crlf() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("NOTICES.txt");
        std::fs::write(&path, TEXT.replace('\n', "\r\n")).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.render(), TEXT);
    }
}
