//! Reading symbols back out of pixel indices.
//!
//! Ranks are rebuilt from the palettes of the frames being read. If those
//! palettes rank differently from the ones used for embedding the result is
//! garbage rather than an error.

use crate::error::StegoError;
use crate::frame::{validate_frames, Frame};
use crate::symbol::{decode_symbols, Symbol};
use crate::tone::build_tone_indices;
use crate::walk::pixels;
use crate::StegoConfig;

/// Collect symbols up to the first pixel ranked at the floor.
pub fn extract(frames: &[Frame], config: &StegoConfig) -> Result<Vec<Symbol>, StegoError> {
    config.validate()?;
    validate_frames(frames)?;
    let indices = build_tone_indices(frames)?;
    let floor = config.floor;

    let mut symbols = Vec::new();
    let mut scanned = 0usize;
    for px in pixels(frames) {
        scanned += 1;
        let rank = indices[px.pos.frame].rank_of(px.index);
        if rank == floor {
            log::info!(
                "end marker found: symbols = {}, frame = {}, x = {}, y = {}",
                symbols.len(),
                px.pos.frame,
                px.pos.x,
                px.pos.y
            );
            return Ok(symbols);
        }
        if rank == 0 || rank > floor {
            continue;
        }
        match Symbol::new(rank - 1) {
            Some(sym) => symbols.push(sym),
            None => {
                return Err(StegoError::UnexpectedRank {
                    rank,
                    frame: px.pos.frame,
                    x: px.pos.x,
                    y: px.pos.y,
                })
            }
        }
    }

    log::warn!("no end marker: scanned = {scanned}, floor = {floor}");
    Err(StegoError::NoMarker { scanned })
}

/// Extract symbols and decode them with the configured transport.
pub fn extract_payload(frames: &[Frame], config: &StegoConfig) -> Result<Vec<u8>, StegoError> {
    let symbols = extract(frames, config)?;
    Ok(decode_symbols(&symbols, config.transport)?)
}
