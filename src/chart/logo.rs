use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};

/// What to do when the logo file is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoPolicy {
    /// Warn and render without a logo.
    Optional,
    /// Fail the pipeline.
    Required,
}

/// Where the logo sits, in paper coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogoPlacement {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Anchor the image by its right edge instead of its left edge.
    pub right_anchored: bool,
}

/// A decorative image overlaid on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub path: PathBuf,
    /// `data:` URI carrying the image bytes.
    pub data_uri: String,
    pub placement: LogoPlacement,
}

/// Read the logo according to `policy`.
pub fn load_logo(
    path: &Path,
    policy: LogoPolicy,
    placement: LogoPlacement,
) -> LoadResult<Option<Logo>> {
    if !path.exists() {
        return match policy {
            LogoPolicy::Optional => {
                log::warn!(
                    "Logo file not found at {}. Skipping logo display.",
                    path.display()
                );
                Ok(None)
            }
            LogoPolicy::Required => Err(LoadError::MissingLogo(path.to_path_buf())),
        };
    }

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(Logo {
        path: path.to_path_buf(),
        data_uri: data_uri(path, &bytes),
        placement,
    }))
}

fn data_uri(path: &Path, bytes: &[u8]) -> String {
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    };
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PLACEMENT: LogoPlacement = LogoPlacement {
        x: 0.85,
        y: 0.05,
        size: 0.1,
        right_anchored: false,
    };

    #[test]
    fn optional_logo_may_be_missing() {
        let logo = load_logo(Path::new("/nonexistent/logo.jpg"), LogoPolicy::Optional, PLACEMENT)
            .unwrap();
        assert!(logo.is_none());
    }

    #[test]
    fn required_logo_must_exist() {
        let err = load_logo(Path::new("/nonexistent/logo.jpg"), LogoPolicy::Required, PLACEMENT)
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingLogo(_)));
    }

    #[test]
    fn logo_is_embedded_as_data_uri() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"abc").unwrap();
        let logo = load_logo(file.path(), LogoPolicy::Required, PLACEMENT)
            .unwrap()
            .unwrap();
        assert_eq!(logo.data_uri, "data:image/png;base64,YWJj");
    }
}
