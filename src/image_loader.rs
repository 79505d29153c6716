//! # Image Sources
//!
//! Layout never fetches remote images. It only needs to know whether a
//! source looks usable and, for inline `data:` URIs, the pixel size, which
//! gives the intrinsic aspect ratio. Unusable sources are swapped for a
//! generated placeholder URL so measurement always has something to size.

use std::io::Cursor;

/// Whether `url` is a source the renderer can use: an http(s) URL with a
/// host, or a base64 image data URI whose payload decodes.
pub fn is_valid_image_url(url: &str) -> bool {
    let url = url.trim();
    if url.starts_with("data:image/") {
        return read_data_uri(url).map(|b| !b.is_empty()).unwrap_or(false);
    }
    let rest = match url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return false,
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty() && !url.chars().any(char::is_whitespace)
}

/// Placeholder image URL of the given size.
pub fn placeholder_url(width: f64, height: f64, label: &str) -> String {
    let w = width.round().clamp(1.0, 4000.0) as u32;
    let h = height.round().clamp(1.0, 4000.0) as u32;
    format!(
        "https://placehold.co/{}x{}/E2E8F0/94A3B8/png?text={}",
        w,
        h,
        encode_query(label)
    )
}

/// Pixel size of an inline image, or `None` for remote or unreadable sources.
pub fn intrinsic_size(url: &str) -> Option<(u32, u32)> {
    let bytes = read_data_uri(url.trim()).ok()?;
    image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Width over height from the image's own pixels.
pub fn intrinsic_aspect_ratio(url: &str) -> Option<f64> {
    let (w, h) = intrinsic_size(url)?;
    (w > 0 && h > 0).then(|| w as f64 / h as f64)
}

/// Decode the payload of `data:image/...;base64,...`.
fn read_data_uri(src: &str) -> Result<Vec<u8>, String> {
    let comma_pos = src
        .find(',')
        .ok_or_else(|| "Invalid data URI: missing comma".to_string())?;
    if !src[..comma_pos].ends_with(";base64") {
        return Err("Only base64 data URIs are supported".to_string());
    }
    base64_decode(&src[comma_pos + 1..])
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| format!("Base64 decode error: {}", e))
}

fn encode_query(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
