//! Canonical pixel order: frame by frame, rows top to bottom, columns left to
//! right. The order itself carries the symbol sequence, so embedding,
//! extraction and capacity counting all go through these iterators.

use crate::frame::Frame;

/// A pixel position in the frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPos {
    pub frame: usize,
    pub x: u16,
    pub y: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct Pixel {
    pub pos: PixelPos,
    pub index: u8,
}

#[derive(Debug)]
pub struct PixelMut<'a> {
    pub pos: PixelPos,
    pub index: &'a mut u8,
}

#[inline]
fn position(frame: usize, width: u16, offset: usize) -> PixelPos {
    let w = (width as usize).max(1);
    PixelPos {
        frame,
        x: (offset % w) as u16,
        y: (offset / w) as u16,
    }
}

/// Every pixel of every frame, in scan order.
pub fn pixels(frames: &[Frame]) -> impl Iterator<Item = Pixel> + '_ {
    frames.iter().enumerate().flat_map(|(f, frame)| {
        let width = frame.width;
        frame
            .indices
            .iter()
            .enumerate()
            .map(move |(offset, &index)| Pixel {
                pos: position(f, width, offset),
                index,
            })
    })
}

/// Like [`pixels`], with write access to each index.
pub fn pixels_mut(frames: &mut [Frame]) -> impl Iterator<Item = PixelMut<'_>> {
    frames.iter_mut().enumerate().flat_map(|(f, frame)| {
        let width = frame.width;
        frame
            .indices
            .iter_mut()
            .enumerate()
            .map(move |(offset, index)| PixelMut {
                pos: position(f, width, offset),
                index,
            })
    })
}
