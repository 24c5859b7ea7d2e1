//! Smallest files lofty accepts as real containers, for on-disk tests.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

/// MPEG-1 Layer III, 128 kbit/s, 44.1 kHz, stereo, no padding.
const MPEG_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
const MPEG_FRAME_LEN: usize = 417;

/// Silent MPEG frames with no tag.
pub fn mp3_bytes() -> Vec<u8> {
    let mut frame = vec![0u8; MPEG_FRAME_LEN];
    frame[..4].copy_from_slice(&MPEG_HEADER);
    frame.repeat(8)
}

/// `fLaC` marker and a lone STREAMINFO block: 44.1 kHz, stereo, 16 bit.
pub fn flac_bytes() -> Vec<u8> {
    let mut out = b"fLaC".to_vec();
    // Last-block flag set, type 0 (STREAMINFO), 34 bytes.
    out.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    // Block sizes, then unknown frame sizes.
    out.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
    out.extend_from_slice(&[0; 6]);
    // 20 bits rate, 3 bits channels - 1, 5 bits depth - 1, 36 bits samples.
    out.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00]);
    // MD5 signature.
    out.extend_from_slice(&[0; 16]);
    // A few bytes standing in for audio frames.
    out.extend_from_slice(&[0; 16]);
    out
}

/// Write an untagged container matching the extension of `path`.
pub fn write_audio(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let bytes = match path.extension().and_then(|e| e.to_str()) {
        Some("flac") => flac_bytes(),
        _ => mp3_bytes(),
    };
    fs::write(path, bytes).unwrap();
}

/// A small PNG; FLAC picture blocks need a decodable header.
pub fn png_bytes() -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbImage::from_pixel(4, 3, Rgb([200, 10, 10]))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
