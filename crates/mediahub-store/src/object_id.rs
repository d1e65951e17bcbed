//! Derivation of remote object ids from CDN-style URLs.

/// URL segment that precedes the version segment in a delivery URL.
const UPLOAD_SEGMENT: &str = "upload";

/// Derive the remote object id from an asset URL.
///
/// For `https://host/acme/image/upload/v1712/photos/summer/beach.jpg` this
/// yields `photos/summer/beach`: everything after the segment following
/// `upload`, with the extension stripped from the last segment. Returns
/// `None` when there is no `upload` segment or nothing follows the version.
pub fn object_id_from_url(url: &str) -> Option<String> {
    let parts: Vec<&str> = url.split('/').collect();
    let upload_idx = parts.iter().position(|part| *part == UPLOAD_SEGMENT)?;

    let rest = parts.get(upload_idx + 2..)?;
    let (last, prefix) = rest.split_last()?;

    let stem = match last.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => last,
    };

    let mut segments: Vec<&str> = prefix.to_vec();
    segments.push(stem);
    Some(segments.join("/"))
}
