//! How many symbols a frame sequence can carry.
//!
//! A pixel is eligible when its color ranks below the floor. Every symbol
//! takes one eligible pixel and the end marker takes one more. A pixel whose
//! color already ranks exactly at the floor reads as an end marker, so
//! eligible pixels after the first such pixel are never reached by extraction.

use crate::error::StegoError;
use crate::frame::{validate_frames, Frame};
use crate::tone::{build_tone_indices, ToneIndex};
use crate::walk::{pixels, PixelPos};
use crate::StegoConfig;

/// Eligible pixel counts for one frame sequence at one floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Pixels ranked below the floor, across all frames.
    pub eligible: usize,
    /// Slots extraction actually reads: symbols plus the marker.
    pub usable: usize,
    /// First pixel that already ranks at the floor, if any.
    pub existing_marker: Option<PixelPos>,
}

impl Capacity {
    /// Slots needed for `symbols` symbols and the end marker.
    pub fn required(symbols: usize) -> usize {
        symbols + 1
    }

    /// Most symbols that fit.
    pub fn max_symbols(&self) -> usize {
        self.usable.saturating_sub(1)
    }

    pub fn fits(&self, symbols: usize) -> bool {
        Self::required(symbols) <= self.usable
    }

    pub fn check(&self, symbols: usize) -> Result<(), StegoError> {
        if self.fits(symbols) {
            return Ok(());
        }
        let required = Self::required(symbols);
        log::warn!(
            "insufficient capacity: required = {required}, usable = {}, eligible = {}",
            self.usable,
            self.eligible
        );
        Err(StegoError::InsufficientCapacity {
            required,
            available: self.usable,
        })
    }
}

/// Count eligible pixels with tone indices already built.
pub(crate) fn measure(frames: &[Frame], indices: &[ToneIndex], floor: u8) -> Capacity {
    let mut eligible = 0usize;
    let mut before_marker = 0usize;
    let mut existing_marker = None;

    for px in pixels(frames) {
        let rank = indices[px.pos.frame].rank_of(px.index);
        if rank < floor {
            eligible += 1;
            if existing_marker.is_none() {
                before_marker += 1;
            }
        } else if rank == floor && existing_marker.is_none() {
            existing_marker = Some(px.pos);
        }
    }

    let usable = match existing_marker {
        Some(_) => before_marker + 1,
        None => eligible,
    };
    Capacity {
        eligible,
        usable,
        existing_marker,
    }
}

/// Full capacity picture for `frames` under `config`.
pub fn measure_capacity(frames: &[Frame], config: &StegoConfig) -> Result<Capacity, StegoError> {
    config.validate()?;
    validate_frames(frames)?;
    let indices = build_tone_indices(frames)?;
    Ok(measure(frames, &indices, config.floor))
}

/// Number of pixels, over all frames, whose color ranks below `floor`.
pub fn capacity(frames: &[Frame], floor: u8) -> Result<usize, StegoError> {
    let config = StegoConfig::new().floor(floor);
    Ok(measure_capacity(frames, &config)?.eligible)
}

/// Largest payload in bytes that [`crate::hide`] accepts for these frames.
pub fn max_payload_len(frames: &[Frame], config: &StegoConfig) -> Result<usize, StegoError> {
    let cap = measure_capacity(frames, config)?;
    Ok(config.transport.max_payload_len(cap.max_symbols()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    fn gray_frame(indices: Vec<u8>) -> Frame {
        let palette = (0..=255u8).map(|v| RGB8::new(v, v, v)).collect();
        Frame::new(indices.len() as u16, 1, palette, indices)
    }

    #[test]
    fn counts_pixels_below_floor() {
        let frames = vec![
            gray_frame(vec![0, 16, 17, 200]),
            gray_frame(vec![5, 255, 3]),
        ];
        assert_eq!(capacity(&frames, 17).unwrap(), 4);
        assert_eq!(capacity(&frames, 18).unwrap(), 5);
        assert_eq!(capacity(&frames, 201).unwrap(), 6);
    }

    #[test]
    fn existing_marker_cuts_usable_capacity() {
        // rank 17 at position 2 ends extraction there
        let frames = vec![gray_frame(vec![0, 1, 17, 2, 3, 4])];
        let cap = measure_capacity(&frames, &StegoConfig::default()).unwrap();
        assert_eq!(cap.eligible, 5);
        assert_eq!(cap.usable, 3);
        assert_eq!(
            cap.existing_marker,
            Some(PixelPos {
                frame: 0,
                x: 2,
                y: 0
            })
        );
        assert!(cap.fits(2));
        assert!(!cap.fits(3));
    }

    #[test]
    fn check_reports_required_and_available() {
        let frames = vec![gray_frame(vec![1, 2, 3])];
        let cap = measure_capacity(&frames, &StegoConfig::default()).unwrap();
        assert!(cap.check(2).is_ok());
        match cap.check(3) {
            Err(StegoError::InsufficientCapacity {
                required: 4,
                available: 3,
            }) => {}
            other => panic!("expected InsufficientCapacity, got {other:?}"),
        }
    }

    #[test]
    fn low_floor_is_rejected() {
        let frames = vec![gray_frame(vec![0])];
        assert!(matches!(
            capacity(&frames, 16),
            Err(StegoError::InvalidFloor(16))
        ));
    }

    #[test]
    fn max_payload_len_uses_transport() {
        // 33 eligible pixels: 32 symbols + marker
        let frames = vec![gray_frame(vec![1; 33])];
        let base = StegoConfig::default();
        assert_eq!(max_payload_len(&frames, &base).unwrap(), 12);
        let raw = StegoConfig::default().transport(crate::Transport::Raw);
        assert_eq!(max_payload_len(&frames, &raw).unwrap(), 16);
    }
}
