use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;

/// Bytes that stand in for an MP4 file; the fake tools never parse them.
pub fn fake_mp4(len: usize) -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.resize(len.max(data.len()), 0xAB);
    data
}

/// Minimal PNG signature plus padding.
pub fn fake_png() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&[0u8; 24]);
    data
}

/// A form with one file field.
pub fn file_form(field: &str, file_name: &str, mime: &str, data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime.to_string());
    MultipartForm::new().add_part(field.to_string(), part)
}

pub fn video_form(data: Vec<u8>) -> MultipartForm {
    file_form("video", "clip.mp4", "video/mp4", data)
}
