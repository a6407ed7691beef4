//! Optional capacity widening by merging near-duplicate colors.
//!
//! Pixels drawn in a protected color (rank at or above the floor) that sits
//! very close to a data-eligible color are moved onto that eligible color.
//! Those pixels then count as eligible. The palette itself never changes.

use crate::error::StegoError;
use crate::frame::{validate_frames, Frame};
use crate::tone::{build_tone_indices, ToneIndex};
use crate::StegoConfig;
use rgb::RGB8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    /// Pixels moved onto an eligible color.
    pub pixels: usize,
    /// Distinct protected palette entries that lost at least one pixel.
    pub colors: usize,
}

impl core::ops::AddAssign for MergeReport {
    fn add_assign(&mut self, rhs: Self) {
        self.pixels += rhs.pixels;
        self.colors += rhs.colors;
    }
}

/// Squared Euclidean distance between two colors in 8-bit RGB.
#[inline]
pub fn color_distance_sq(a: RGB8, b: RGB8) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// For every palette entry, the eligible entry it merges into, if any.
///
/// The transparent index neither merges away nor receives merged pixels.
fn merge_table(
    palette: &[RGB8],
    transparent: Option<u8>,
    tones: &ToneIndex,
    floor: u8,
    max_distance_sq: u32,
) -> [Option<u8>; 256] {
    let mut table = [None; 256];
    for (idx, &color) in palette.iter().enumerate() {
        if tones.rank_of(idx as u8) < floor || transparent == Some(idx as u8) {
            continue;
        }
        // rank 0 stays reserved, ties go to the lower rank
        let nearest = (1..floor)
            .map(|rank| tones.index_at_rank(rank))
            .filter(|&target| transparent != Some(target))
            .map(|target| (target, color_distance_sq(color, palette[target as usize])))
            .min_by_key(|&(_, d)| d);
        if let Some((target, d)) = nearest {
            if d <= max_distance_sq {
                table[idx] = Some(target);
            }
        }
    }
    table
}

fn merge_one(frame: &mut Frame, tones: &ToneIndex, floor: u8, max_distance_sq: u32) -> MergeReport {
    let table = merge_table(&frame.palette, frame.transparent, tones, floor, max_distance_sq);
    let mut touched = [false; 256];
    let mut report = MergeReport::default();
    for index in frame.indices.iter_mut() {
        if let Some(target) = table[*index as usize] {
            if !touched[*index as usize] {
                touched[*index as usize] = true;
                report.colors += 1;
            }
            *index = target;
            report.pixels += 1;
        }
    }
    report
}

/// Move pixels of near-duplicate protected colors onto eligible colors.
///
/// `max_distance_sq` bounds the squared RGB distance a pixel may move; 0 only
/// merges exact duplicates. Merging pixels of the floor color also clears
/// pre-existing end markers, which otherwise cap usable capacity. A frame's
/// transparent index is left out on both sides.
pub fn merge_near_colors(
    frames: &mut [Frame],
    config: &StegoConfig,
    max_distance_sq: u32,
) -> Result<MergeReport, StegoError> {
    config.validate()?;
    validate_frames(frames)?;
    let indices = build_tone_indices(frames)?;

    let mut total = MergeReport::default();
    for (i, (frame, tones)) in frames.iter_mut().zip(indices.iter()).enumerate() {
        let report = merge_one(frame, tones, config.floor, max_distance_sq);
        log::debug!(
            "merged near colors: frame = {i}, pixels = {}, colors = {}",
            report.pixels,
            report.colors
        );
        total += report;
    }
    Ok(total)
}
