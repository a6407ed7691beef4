//! GIF container adapter built on the `gif` crate.
//!
//! Decodes with indexed color output so palette indices reach the engines
//! untouched, and writes them back the same way. Only frame data and timing
//! survive a round trip; extension blocks such as comments are dropped.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use rgb::RGB8;
use thiserror::Error;

use crate::frame::{Disposal, Frame};
use crate::tone::is_common_palette;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("file {0:?} is not a gif")]
    NotGif(PathBuf),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode gif: {0}")]
    Decode(#[from] gif::DecodingError),

    #[error("encode gif: {0}")]
    Encode(#[from] gif::EncodingError),

    #[error("gif has no frames")]
    NoFrames,

    #[error("frame {frame} has neither a local nor a global palette")]
    MissingPalette { frame: usize },
}

/// A decoded GIF: logical screen plus frames in display order.
#[derive(Debug, Clone)]
pub struct Animation {
    pub width: u16,
    pub height: u16,
    pub repeat: gif::Repeat,
    pub frames: Vec<Frame>,
}

impl Animation {
    pub fn new(width: u16, height: u16, frames: Vec<Frame>) -> Self {
        Self {
            width,
            height,
            repeat: gif::Repeat::Infinite,
            frames,
        }
    }
}

fn palette_from_bytes(bytes: &[u8]) -> Vec<RGB8> {
    bytes
        .chunks_exact(3)
        .map(|c| RGB8::new(c[0], c[1], c[2]))
        .collect()
}

fn palette_to_bytes(palette: &[RGB8]) -> Vec<u8> {
    palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
}

fn disposal_from_gif(d: gif::DisposalMethod) -> Disposal {
    match d {
        gif::DisposalMethod::Any => Disposal::Any,
        gif::DisposalMethod::Keep => Disposal::Keep,
        gif::DisposalMethod::Background => Disposal::Background,
        gif::DisposalMethod::Previous => Disposal::Previous,
    }
}

fn disposal_to_gif(d: Disposal) -> gif::DisposalMethod {
    match d {
        Disposal::Any => gif::DisposalMethod::Any,
        Disposal::Keep => gif::DisposalMethod::Keep,
        Disposal::Background => gif::DisposalMethod::Background,
        Disposal::Previous => gif::DisposalMethod::Previous,
    }
}

/// Decode GIF bytes into frames of palette indices.
///
/// Frames without a local color table take the global one.
pub fn decode_gif(data: &[u8]) -> Result<Animation, ContainerError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(data)?;

    let global = decoder.global_palette().map(palette_from_bytes);
    let width = decoder.width();
    let height = decoder.height();

    let mut frames = Vec::new();
    while let Some(f) = decoder.read_next_frame()? {
        let palette = match (&f.palette, &global) {
            (Some(local), _) => palette_from_bytes(local),
            (None, Some(global)) => global.clone(),
            (None, None) => return Err(ContainerError::MissingPalette { frame: frames.len() }),
        };
        frames.push(Frame {
            width: f.width,
            height: f.height,
            palette,
            indices: f.buffer.to_vec(),
            left: f.left,
            top: f.top,
            delay: f.delay,
            dispose: disposal_from_gif(f.dispose),
            transparent: f.transparent,
        });
    }
    if frames.is_empty() {
        return Err(ContainerError::NoFrames);
    }

    Ok(Animation {
        width,
        height,
        repeat: decoder.repeat(),
        frames,
    })
}

/// Encode frames back into GIF bytes.
///
/// A palette shared by every frame is written once as the global color
/// table; otherwise every frame carries its own.
pub fn encode_gif(anim: &Animation) -> Result<Vec<u8>, ContainerError> {
    if anim.frames.is_empty() {
        return Err(ContainerError::NoFrames);
    }
    let shared = is_common_palette(&anim.frames);
    let global = if shared {
        palette_to_bytes(&anim.frames[0].palette)
    } else {
        Vec::new()
    };

    let mut buf = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut buf, anim.width, anim.height, &global)?;
        encoder.set_repeat(anim.repeat)?;
        for (i, frame) in anim.frames.iter().enumerate() {
            if frame.palette.is_empty() {
                return Err(ContainerError::MissingPalette { frame: i });
            }
            let out = gif::Frame {
                width: frame.width,
                height: frame.height,
                left: frame.left,
                top: frame.top,
                delay: frame.delay,
                dispose: disposal_to_gif(frame.dispose),
                transparent: frame.transparent,
                palette: if shared {
                    None
                } else {
                    Some(palette_to_bytes(&frame.palette))
                },
                buffer: Cow::Borrowed(frame.indices.as_slice()),
                ..gif::Frame::default()
            };
            encoder.write_frame(&out)?;
        }
    }
    Ok(buf)
}

fn check_extension(path: &Path) -> Result<(), ContainerError> {
    let is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    if is_gif {
        Ok(())
    } else {
        Err(ContainerError::NotGif(path.to_path_buf()))
    }
}

/// Read and decode a `.gif` file.
pub fn read_gif(path: impl AsRef<Path>) -> Result<Animation, ContainerError> {
    let path = path.as_ref();
    check_extension(path)?;
    let data = std::fs::read(path)?;
    let anim = decode_gif(&data)?;
    log::debug!(
        "gif read: path = {}, width = {}, height = {}, frames = {}, repeat = {:?}, size = {}",
        path.display(),
        anim.width,
        anim.height,
        anim.frames.len(),
        anim.repeat,
        data.len()
    );
    Ok(anim)
}

/// Encode and write a `.gif` file.
pub fn write_gif(path: impl AsRef<Path>, anim: &Animation) -> Result<(), ContainerError> {
    let path = path.as_ref();
    check_extension(path)?;
    let data = encode_gif(anim)?;
    std::fs::write(path, &data)?;
    log::debug!("gif written: path = {}, size = {}", path.display(), data.len());
    Ok(())
}
