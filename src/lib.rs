#![forbid(unsafe_code)]

//! Hide byte payloads in the palette index stream of indexed-color frames.
//!
//! Every frame's 256-color palette is ranked by tone (r + g + b). Pixels whose
//! color ranks below a floor are rewritten so that the rank of their new
//! color spells the payload, one 4-bit symbol per pixel, and the first
//! pixel after the data gets the color ranked exactly at the floor. Pixels in
//! brighter colors are never touched, so the image keeps its look apart from
//! its darkest shades.

pub mod capacity;
#[cfg(feature = "gif")]
pub mod container;
pub mod embed;
pub mod error;
pub mod extract;
pub mod frame;
pub mod merge;
pub mod symbol;
pub mod tone;
pub mod walk;

pub use capacity::{capacity, max_payload_len, measure_capacity, Capacity};
pub use embed::{embed, embed_payload, EmbedReport, MarkerKind};
pub use error::{DecodeError, StegoError};
pub use extract::{extract, extract_payload};
pub use frame::{Disposal, Frame, PALETTE_LEN};
pub use merge::{merge_near_colors, MergeReport};
pub use symbol::{decode_symbols, encode_symbols, from_symbols, to_symbols, Symbol, Transport};
pub use tone::{build_tone_indices, is_common_palette, ToneIndex};
pub use walk::PixelPos;

#[cfg(feature = "gif")]
pub use container::{decode_gif, encode_gif, read_gif, write_gif, Animation, ContainerError};

/// Lowest floor that leaves ranks 1..=16 free for every symbol value.
pub const MIN_FLOOR: u8 = 17;

/// Floor used unless configured otherwise.
pub const DEFAULT_FLOOR: u8 = MIN_FLOOR;

/// Configuration shared by embedding and extraction.
///
/// Both sides must agree on every field; a different floor reads a
/// different marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StegoConfig {
    /// Ranks below this carry data, the rank equal to it marks the end.
    /// Must be at least [`MIN_FLOOR`].
    pub floor: u8,
    /// How payload bytes map to symbols.
    pub transport: Transport,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            floor: DEFAULT_FLOOR,
            transport: Transport::Base64Hex,
        }
    }
}

impl StegoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn floor(mut self, floor: u8) -> Self {
        self.floor = floor;
        self
    }

    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        if self.floor < MIN_FLOOR {
            return Err(StegoError::InvalidFloor(self.floor));
        }
        Ok(())
    }
}

/// Hide `payload` in `frames`, rewriting pixel indices in place.
///
/// Fails without touching any pixel when the frames cannot hold the payload.
pub fn hide(
    frames: &mut [Frame],
    payload: &[u8],
    config: &StegoConfig,
) -> Result<EmbedReport, StegoError> {
    if !is_common_palette(frames) {
        log::warn!("frames do not share a palette; ranks differ per frame");
    }
    embed_payload(frames, payload, config)
}

/// Recover a payload hidden by [`hide`].
pub fn reveal(frames: &[Frame], config: &StegoConfig) -> Result<Vec<u8>, StegoError> {
    extract_payload(frames, config)
}

/// Hide `payload` in an encoded GIF and return the re-encoded GIF.
#[cfg(feature = "gif")]
pub fn hide_in_gif(
    gif_data: &[u8],
    payload: &[u8],
    config: &StegoConfig,
) -> Result<Vec<u8>, StegoError> {
    let mut anim = decode_gif(gif_data)?;
    hide(&mut anim.frames, payload, config)?;
    Ok(encode_gif(&anim)?)
}

/// Recover a payload from an encoded GIF.
#[cfg(feature = "gif")]
pub fn reveal_from_gif(gif_data: &[u8], config: &StegoConfig) -> Result<Vec<u8>, StegoError> {
    let anim = decode_gif(gif_data)?;
    reveal(&anim.frames, config)
}
