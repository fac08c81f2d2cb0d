//! Share links
//!
//! A project's name and file mapping serialized to JSON and URL-safe
//! base64-encoded into a query parameter. This is a convenience transfer
//! format, not a storage format: there is no integrity check or expiry, and
//! a tampered link simply decodes to different code.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use libcanvas_core::types::project::validate_paths;
use libcanvas_core::{CanvasError, ProjectFile};

/// Query parameter carrying the encoded payload
pub const SHARE_PARAM: &str = "share";

/// What travels inside a share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub name: String,
    pub files: Vec<ProjectFile>,
}

/// Encode a share link rooted at `base_url` (e.g. `https://host`)
pub fn encode_share_link(
    base_url: &str,
    name: &str,
    files: &[ProjectFile],
) -> Result<String, CanvasError> {
    validate_paths(files)?;
    let payload = SharePayload {
        name: name.to_string(),
        files: files.to_vec(),
    };
    let json = serde_json::to_vec(&payload)?;
    let encoded = URL_SAFE_NO_PAD.encode(json);
    Ok(format!(
        "{}/ide?{}={}",
        base_url.trim_end_matches('/'),
        SHARE_PARAM,
        encoded
    ))
}

/// Decode a share link. Accepts a full URL, a query string, or the bare
/// base64 payload.
pub fn decode_share_link(input: &str) -> Result<SharePayload, CanvasError> {
    let payload_part = extract_share_param(input).unwrap_or(input).trim();
    let bytes = URL_SAFE_NO_PAD
        .decode(payload_part)
        .map_err(|e| CanvasError::InvalidArgs(format!("invalid share payload: {}", e)))?;
    let payload: SharePayload = serde_json::from_slice(&bytes)
        .map_err(|e| CanvasError::InvalidArgs(format!("invalid share payload: {}", e)))?;
    validate_paths(&payload.files)?;
    Ok(payload)
}

/// Pull the share parameter value out of a URL or query string
fn extract_share_param(input: &str) -> Option<&str> {
    let query = input.split('?').nth(1)?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("share="))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<ProjectFile> {
        vec![
            ProjectFile::new("/App.js", "export default function App() {}"),
            ProjectFile::new("/styles.css", "h1 { color: red; }"),
        ]
    }

    #[test]
    fn test_share_link_roundtrip() {
        let link = encode_share_link("https://canvas.example", "Demo", &files()).unwrap();
        assert!(link.starts_with("https://canvas.example/ide?share="));

        let payload = decode_share_link(&link).unwrap();
        assert_eq!(payload.name, "Demo");
        assert_eq!(payload.files, files());
    }

    #[test]
    fn test_decode_accepts_bare_payload() {
        let link = encode_share_link("https://canvas.example", "Demo", &files()).unwrap();
        let bare = link.split("share=").nth(1).unwrap();
        let payload = decode_share_link(bare).unwrap();
        assert_eq!(payload.name, "Demo");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_share_link("not base64 at all!!!"),
            Err(CanvasError::InvalidArgs(_))
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_paths() {
        let payload = SharePayload {
            name: "Bad".to_string(),
            files: vec![
                ProjectFile::new("/a.js", "1"),
                ProjectFile::new("/a.js", "2"),
            ],
        };
        let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
        assert!(decode_share_link(&encoded).is_err());
    }

    #[test]
    fn test_extract_param_among_others() {
        let link = encode_share_link("https://canvas.example", "Demo", &files()).unwrap();
        let payload_value = link.split("share=").nth(1).unwrap();
        let with_extra = format!(
            "https://canvas.example/ide?theme=dark&share={}",
            payload_value
        );
        let payload = decode_share_link(&with_extra).unwrap();
        assert_eq!(payload.name, "Demo");
    }
}
