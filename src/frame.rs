use rgb::RGB8;

use crate::error::StegoError;

/// Number of entries a palette must have to be ranked.
pub const PALETTE_LEN: usize = 256;

/// What the viewer does with a frame's area before drawing the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposal {
    /// Decoder's choice.
    #[default]
    Any,
    /// Leave the frame in place.
    Keep,
    /// Clear to the background color.
    Background,
    /// Restore what was there before the frame.
    Previous,
}

/// One indexed-color image of a sequence.
///
/// `indices` holds one palette index per pixel in row-major order, top row
/// first. The embedding engines only ever rewrite `indices`; the palette and
/// the remaining attributes pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub palette: Vec<RGB8>,
    pub indices: Vec<u8>,
    /// Offset of the frame on the logical screen.
    pub left: u16,
    pub top: u16,
    /// Display time in centiseconds.
    pub delay: u16,
    pub dispose: Disposal,
    pub transparent: Option<u8>,
}

impl Frame {
    /// Create a frame at the screen origin with no delay or transparency.
    pub fn new(width: u16, height: u16, palette: Vec<RGB8>, indices: Vec<u8>) -> Self {
        Self {
            width,
            height,
            palette,
            indices,
            left: 0,
            top: 0,
            delay: 0,
            dispose: Disposal::Any,
            transparent: None,
        }
    }

    pub fn with_delay(mut self, delay: u16) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_offset(mut self, left: u16, top: u16) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Check that every frame's index buffer matches its dimensions.
pub(crate) fn validate_frames(frames: &[Frame]) -> Result<(), StegoError> {
    for (i, frame) in frames.iter().enumerate() {
        if frame.indices.len() != frame.pixel_count() {
            return Err(StegoError::DimensionMismatch {
                frame: i,
                len: frame.indices.len(),
                width: frame.width,
                height: frame.height,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_buffer_is_rejected() {
        let frames = vec![
            Frame::new(2, 2, Vec::new(), vec![0; 4]),
            Frame::new(3, 2, Vec::new(), vec![0; 5]),
        ];
        match validate_frames(&frames) {
            Err(StegoError::DimensionMismatch {
                frame: 1,
                len: 5,
                width: 3,
                height: 2,
            }) => {}
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }
}
