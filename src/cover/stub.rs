use std::cell::Cell;
use std::path::Path;

use super::{CodecError, ImageCodec};
use crate::track::CoverArt;

/// Codec that never decodes: the "image" is the source path's bytes.
#[derive(Default)]
pub struct StubCodec {
    calls: Cell<usize>,
    fail: bool,
}

impl StubCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ImageCodec for StubCodec {
    fn prepare_cover(&self, path: &Path, _max_width: u32, _max_height: u32) -> Result<CoverArt, CodecError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(CodecError::UnknownFormat(path.to_path_buf()));
        }
        Ok(CoverArt {
            data: path.to_string_lossy().into_owned().into_bytes(),
            mime_type: "image/jpeg".to_string(),
        })
    }
}
