//! Per-frame tone ranking of palette entries.
//!
//! A color's tone is the plain sum of its channels. Sorting the 256 entries
//! of a palette by ascending tone (ties keep palette order) gives every entry
//! a unique rank, and the rank is what carries data: the darkest ranks hold
//! symbols, the rank at the floor marks the end.

use rgb::RGB8;

use crate::error::StegoError;
use crate::frame::{Frame, PALETTE_LEN};

/// Bidirectional index ↔ rank tables for one palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneIndex {
    palette: [RGB8; PALETTE_LEN],
    tones: [u16; PALETTE_LEN],
    /// Palette index → rank.
    ranks: [u8; PALETTE_LEN],
    /// Rank → palette index.
    by_rank: [u8; PALETTE_LEN],
}

impl ToneIndex {
    /// Rank a palette. Only exactly 256 entries are accepted.
    ///
    /// The returned error carries frame 0; [`build_tone_indices`] fills in the
    /// real frame number.
    pub fn build(palette: &[RGB8]) -> Result<Self, StegoError> {
        if palette.len() != PALETTE_LEN {
            return Err(StegoError::InvalidPalette {
                frame: 0,
                len: palette.len(),
            });
        }

        let mut colors = [RGB8::default(); PALETTE_LEN];
        colors.copy_from_slice(palette);

        let mut tones = [0u16; PALETTE_LEN];
        for (tone, c) in tones.iter_mut().zip(colors.iter()) {
            *tone = tone_of(*c);
        }

        // sort_by_key is stable, so equal tones stay in palette order
        let mut order: [u8; PALETTE_LEN] = core::array::from_fn(|i| i as u8);
        order.sort_by_key(|&i| tones[i as usize]);

        let mut ranks = [0u8; PALETTE_LEN];
        for (rank, &idx) in order.iter().enumerate() {
            ranks[idx as usize] = rank as u8;
        }

        Ok(Self {
            palette: colors,
            tones,
            ranks,
            by_rank: order,
        })
    }

    /// Tone (r + g + b) of a palette entry.
    pub fn tone(&self, index: u8) -> u16 {
        self.tones[index as usize]
    }

    /// Rank of a palette entry.
    #[inline]
    pub fn rank_of(&self, index: u8) -> u8 {
        self.ranks[index as usize]
    }

    /// Palette index holding the given rank.
    #[inline]
    pub fn index_at_rank(&self, rank: u8) -> u8 {
        self.by_rank[rank as usize]
    }

    /// Color holding the given rank.
    pub fn color_at_rank(&self, rank: u8) -> RGB8 {
        self.palette[self.index_at_rank(rank) as usize]
    }
}

/// Sum of the three channels, 0..=765.
#[inline]
pub fn tone_of(c: RGB8) -> u16 {
    c.r as u16 + c.g as u16 + c.b as u16
}

/// Build one tone index per frame, in frame order.
pub fn build_tone_indices(frames: &[Frame]) -> Result<Vec<ToneIndex>, StegoError> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let index = ToneIndex::build(&frame.palette).map_err(|e| match e {
                StegoError::InvalidPalette { len, .. } => {
                    StegoError::InvalidPalette { frame: i, len }
                }
                other => other,
            })?;
            log::debug!(
                "tone index built: frame = {i}, darkest = {}, brightest = {}",
                index.tone(index.index_at_rank(0)),
                index.tone(index.index_at_rank(u8::MAX)),
            );
            Ok(index)
        })
        .collect()
}

/// Whether every frame uses the same palette as the first.
///
/// Only a diagnostic: ranks are computed per frame, so differing palettes are
/// fine for correctness. They do explain visual artifacts when frames that
/// look alike rank their colors differently.
pub fn is_common_palette(frames: &[Frame]) -> bool {
    let Some(first) = frames.first() else {
        return true;
    };

    for (i, frame) in frames.iter().enumerate().skip(1) {
        if frame.palette.len() != first.palette.len() {
            log::debug!(
                "palette mismatch: frame = {i}, len = {}, first len = {}",
                frame.palette.len(),
                first.palette.len()
            );
            return false;
        }
        if let Some(j) = frame
            .palette
            .iter()
            .zip(first.palette.iter())
            .position(|(a, b)| a != b)
        {
            let c = frame.palette[j];
            log::debug!(
                "palette mismatch: frame = {i}, entry = {j}, r = {}, g = {}, b = {}",
                c.r,
                c.g,
                c.b
            );
            return false;
        }
    }
    true
}
