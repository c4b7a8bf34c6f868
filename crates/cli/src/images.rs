//! Product image loading.
//!
//! Images are stored inline as `data:` URLs, the same shape an upload form
//! produces.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::commands::CommandError;

/// Largest image file accepted.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Turn a command-line image argument into a data URL.
///
/// `data:` and `http(s)` URLs pass through; anything else is read as a file.
///
/// # Errors
///
/// Returns `CommandError` if the file is missing, not an image, or too large.
pub fn load_image(source: &str) -> Result<String, CommandError> {
    if source.starts_with("data:") || source.starts_with("http://") || source.starts_with("https://")
    {
        return Ok(source.to_string());
    }

    let path = Path::new(source);
    let mime = mime_type(path).ok_or_else(|| {
        CommandError::InvalidInput(format!(
            "{source}: please select an image file (JPEG, PNG, etc.)"
        ))
    })?;

    let read_error = |err| CommandError::ReadFile {
        path: path.to_path_buf(),
        source: err,
    };
    let size = std::fs::metadata(path).map_err(read_error)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(CommandError::InvalidInput(format!(
            "{source}: image is larger than 5 MB"
        )));
    }
    let bytes = std::fs::read(path).map_err(read_error)?;

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

fn mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_data_url_passes_through() {
        let url = "data:image/png;base64,AAAA";
        assert_eq!(load_image(url).unwrap(), url);
    }

    #[test]
    fn test_file_becomes_data_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dot.PNG");
        std::fs::write(&path, [1_u8, 2, 3]).unwrap();

        let url = load_image(path.to_str().unwrap()).unwrap();
        assert_eq!(url, "data:image/png;base64,AQID");
    }

    #[test]
    fn test_non_image_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        assert!(matches!(
            load_image(path.to_str().unwrap()),
            Err(CommandError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_image("/definitely/not/here.png"),
            Err(CommandError::ReadFile { .. })
        ));
    }
}
