//! Writing symbols into pixel indices.

use crate::capacity::measure;
use crate::error::StegoError;
use crate::frame::{validate_frames, Frame};
use crate::symbol::{encode_symbols, Symbol};
use crate::tone::build_tone_indices;
use crate::walk::{pixels_mut, PixelPos};
use crate::StegoConfig;

/// How the end of the data was marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// An eligible pixel was rewritten to the floor color.
    Written,
    /// The pixel after the last symbol already had the floor color.
    Existing,
}

/// Summary of a successful embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    pub symbols: usize,
    pub marker: PixelPos,
    pub marker_kind: MarkerKind,
    /// Eligible pixels left untouched after the marker.
    pub spare: usize,
}

/// Write `symbols` into `frames`, followed by the end marker.
///
/// Capacity is checked against the unmodified frames first, so on error no
/// pixel has been changed. Symbol `n` becomes the color ranked `n + 1`;
/// pixels ranked at or above the floor are never written. A transparent index
/// ranked between 1 and the floor can be written like any other color, which
/// turns the pixel transparent.
pub fn embed(
    frames: &mut [Frame],
    symbols: &[Symbol],
    config: &StegoConfig,
) -> Result<EmbedReport, StegoError> {
    config.validate()?;
    validate_frames(frames)?;
    let indices = build_tone_indices(frames)?;
    let floor = config.floor;

    for (i, (frame, tones)) in frames.iter().zip(indices.iter()).enumerate() {
        if let Some(t) = frame.transparent {
            let rank = tones.rank_of(t);
            if (1..=floor).contains(&rank) {
                log::debug!(
                    "transparent index is writable: frame = {i}, index = {t}, rank = {rank}"
                );
            }
        }
    }

    let cap = measure(frames, &indices, floor);
    cap.check(symbols.len())?;

    let mut pending = symbols.iter();
    let mut written = 0usize;
    for px in pixels_mut(frames) {
        let tones = &indices[px.pos.frame];
        let rank = tones.rank_of(*px.index);
        if rank > floor {
            continue;
        }

        let kind = match pending.next() {
            Some(sym) if rank < floor => {
                *px.index = tones.index_at_rank(sym.value() + 1);
                written += 1;
                continue;
            }
            // measure() stops counting at the first floor-ranked pixel, so
            // one can only show up here after the last symbol
            Some(_) => {
                return Err(StegoError::InsufficientCapacity {
                    required: symbols.len() + 1,
                    available: written,
                })
            }
            None if rank < floor => {
                *px.index = tones.index_at_rank(floor);
                MarkerKind::Written
            }
            None => MarkerKind::Existing,
        };

        let report = EmbedReport {
            symbols: written,
            marker: px.pos,
            marker_kind: kind,
            spare: cap.eligible - written - usize::from(kind == MarkerKind::Written),
        };
        log::info!(
            "embedded: symbols = {}, marker frame = {}, x = {}, y = {}, kind = {:?}",
            report.symbols,
            report.marker.frame,
            report.marker.x,
            report.marker.y,
            report.marker_kind
        );
        return Ok(report);
    }

    Err(StegoError::InsufficientCapacity {
        required: symbols.len() + 1,
        available: cap.usable,
    })
}

/// Encode `payload` with the configured transport and embed it.
pub fn embed_payload(
    frames: &mut [Frame],
    payload: &[u8],
    config: &StegoConfig,
) -> Result<EmbedReport, StegoError> {
    let symbols = encode_symbols(payload, config.transport);
    log::debug!(
        "payload encoded: bytes = {}, symbols = {}, transport = {:?}",
        payload.len(),
        symbols.len(),
        config.transport
    );
    embed(frames, &symbols, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::to_symbols;
    use rgb::RGB8;

    fn gray_frame(width: u16, indices: Vec<u8>) -> Frame {
        let palette = (0..=255u8).map(|v| RGB8::new(v, v, v)).collect();
        let height = (indices.len() / width as usize) as u16;
        Frame::new(width, height, palette, indices)
    }

    fn syms(values: &[u8]) -> Vec<Symbol> {
        values.iter().map(|&v| Symbol::new(v).unwrap()).collect()
    }

    #[test]
    fn writes_rank_plus_one_then_marker() {
        let mut frames = vec![gray_frame(4, vec![0, 200, 5, 16, 3, 9, 255, 1])];
        let report = embed(&mut frames, &syms(&[0, 15, 7]), &StegoConfig::default()).unwrap();

        // gray ramp: palette index == rank
        assert_eq!(frames[0].indices, [1, 200, 16, 8, 17, 9, 255, 1]);
        assert_eq!(report.symbols, 3);
        assert_eq!(report.marker, PixelPos { frame: 0, x: 0, y: 1 });
        assert_eq!(report.marker_kind, MarkerKind::Written);
        assert_eq!(report.spare, 2);
    }

    #[test]
    fn empty_sequence_marks_first_eligible_pixel() {
        let mut frames = vec![gray_frame(3, vec![100, 4, 2])];
        let report = embed(&mut frames, &[], &StegoConfig::default()).unwrap();
        assert_eq!(frames[0].indices, [100, 17, 2]);
        assert_eq!(report.marker, PixelPos { frame: 0, x: 1, y: 0 });
    }

    #[test]
    fn spans_frames() {
        let mut frames = vec![gray_frame(2, vec![0, 50]), gray_frame(3, vec![60, 0, 5])];
        embed(&mut frames, &syms(&[2, 3]), &StegoConfig::default()).unwrap();
        assert_eq!(frames[0].indices, [3, 50]);
        assert_eq!(frames[1].indices, [60, 4, 17]);
    }

    #[test]
    fn shortage_leaves_frames_untouched() {
        let original = vec![gray_frame(3, vec![0, 1, 2])];
        let mut frames = original.clone();
        match embed(&mut frames, &syms(&[1, 2, 3]), &StegoConfig::default()) {
            Err(StegoError::InsufficientCapacity {
                required: 4,
                available: 3,
            }) => {}
            other => panic!("expected InsufficientCapacity, got {other:?}"),
        }
        assert_eq!(frames, original);
    }

    #[test]
    fn exact_fit_succeeds() {
        let mut frames = vec![gray_frame(3, vec![0, 1, 2])];
        let report = embed(&mut frames, &syms(&[9, 9]), &StegoConfig::default()).unwrap();
        assert_eq!(frames[0].indices, [10, 10, 17]);
        assert_eq!(report.spare, 0);
    }

    #[test]
    fn floor_colored_pixel_serves_as_marker() {
        let mut frames = vec![gray_frame(4, vec![0, 1, 17, 2])];
        let report = embed(&mut frames, &syms(&[4, 5]), &StegoConfig::default()).unwrap();
        assert_eq!(frames[0].indices, [5, 6, 17, 2]);
        assert_eq!(report.marker_kind, MarkerKind::Existing);
        assert_eq!(report.marker, PixelPos { frame: 0, x: 2, y: 0 });
    }

    #[test]
    fn floor_colored_pixel_limits_capacity() {
        let mut frames = vec![gray_frame(4, vec![0, 1, 17, 2])];
        let result = embed(&mut frames, &syms(&[4, 5, 6]), &StegoConfig::default());
        assert!(matches!(
            result,
            Err(StegoError::InsufficientCapacity {
                required: 4,
                available: 3
            })
        ));
        assert_eq!(frames[0].indices, [0, 1, 17, 2]);
    }

    #[test]
    fn higher_floor_rewrites_more_colors() {
        let mut frames = vec![gray_frame(3, vec![40, 63, 64])];
        let config = StegoConfig::default().floor(64);
        embed(&mut frames, &syms(&[0]), &config).unwrap();
        assert_eq!(frames[0].indices, [1, 64, 64]);
    }

    #[test]
    fn transparent_symbol_color_round_trips() {
        let mut frame = gray_frame(4, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        frame.transparent = Some(5);
        let mut frames = vec![frame];
        let symbols = syms(&[4, 4, 0]);
        embed(&mut frames, &symbols, &StegoConfig::default()).unwrap();
        assert_eq!(frames[0].indices[..4], [5, 5, 1, 17]);
        assert_eq!(frames[0].transparent, Some(5));
        assert_eq!(crate::extract::extract(&frames, &StegoConfig::default()).unwrap(), symbols);
    }

    #[test]
    fn embedding_is_deterministic() {
        let base: Vec<u8> = (0..64u32)
            .map(|i| if i % 3 == 0 { 200 } else { (i * 29 % 16) as u8 })
            .collect();
        let mut a = vec![gray_frame(8, base.clone())];
        let mut b = vec![gray_frame(8, base)];
        let symbols = to_symbols(b"x");
        embed(&mut a, &symbols, &StegoConfig::default()).unwrap();
        embed(&mut b, &symbols, &StegoConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn palette_is_never_changed() {
        let mut frames = vec![gray_frame(4, vec![0; 16])];
        let palette = frames[0].palette.clone();
        embed_payload(&mut frames, b"ok", &StegoConfig::default()).unwrap();
        assert_eq!(frames[0].palette, palette);
    }
}
