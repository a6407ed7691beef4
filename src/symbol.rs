//! Payload bytes ↔ 4-bit symbols.
//!
//! The canonical pipeline first base64-encodes the payload, then spells every
//! base64 character as two lowercase hex digits, one symbol per digit. The
//! raw transport skips both text stages and splits bytes into nibbles.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::DecodeError;

/// One hexadecimal digit of transported data, 0..=15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u8);

impl Symbol {
    /// Largest symbol value.
    pub const MAX: u8 = 15;

    /// Wrap a value, rejecting anything above 15.
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Low four bits of a byte.
    #[inline]
    const fn low(byte: u8) -> Self {
        Self(byte & 0x0f)
    }

    /// High four bits of a byte.
    #[inline]
    const fn high(byte: u8) -> Self {
        Self(byte >> 4)
    }

    fn hex_digit(self) -> char {
        // value is always < 16
        char::from_digit(self.0 as u32, 16).unwrap_or('0')
    }
}

impl From<Symbol> for u8 {
    fn from(s: Symbol) -> u8 {
        s.0
    }
}

/// How payload bytes become symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// base64 text spelled as hex digits. Four symbols per payload byte plus
    /// padding; the carried text stays within the base64 alphabet.
    #[default]
    Base64Hex,
    /// Bytes split straight into nibbles, two symbols per payload byte.
    Raw,
}

impl Transport {
    /// Number of symbols a payload of `len` bytes turns into.
    pub fn symbol_len(self, len: usize) -> usize {
        match self {
            Self::Base64Hex => len.div_ceil(3) * 4 * 2,
            Self::Raw => len * 2,
        }
    }

    /// Largest payload length whose symbols fit in `symbols` slots.
    pub fn max_payload_len(self, symbols: usize) -> usize {
        match self {
            // base64 emits 4 chars per 3 input bytes; a trailing 1 or 2 byte
            // group still costs a full padded quad
            Self::Base64Hex => (symbols / 8) * 3,
            Self::Raw => symbols / 2,
        }
    }
}

/// Canonical encoding: base64, then hex, then one symbol per hex digit.
pub fn to_symbols(payload: &[u8]) -> Vec<Symbol> {
    let text = BASE64.encode(payload);
    hex::encode(text.as_bytes())
        .chars()
        .filter_map(|c| c.to_digit(16))
        .map(|d| Symbol(d as u8))
        .collect()
}

/// Inverse of [`to_symbols`].
pub fn from_symbols(symbols: &[Symbol]) -> Result<Vec<u8>, DecodeError> {
    if symbols.len() % 2 != 0 {
        return Err(DecodeError::OddSymbolCount(symbols.len()));
    }
    let digits: String = symbols.iter().map(|s| s.hex_digit()).collect();
    let text = hex::decode(digits)?;
    Ok(BASE64.decode(text)?)
}

/// Split every byte into its high then low nibble.
pub fn to_nibbles(payload: &[u8]) -> Vec<Symbol> {
    let mut symbols = Vec::with_capacity(payload.len() * 2);
    for &b in payload {
        symbols.push(Symbol::high(b));
        symbols.push(Symbol::low(b));
    }
    symbols
}

/// Join nibble pairs back into bytes.
pub fn from_nibbles(symbols: &[Symbol]) -> Result<Vec<u8>, DecodeError> {
    if symbols.len() % 2 != 0 {
        return Err(DecodeError::OddSymbolCount(symbols.len()));
    }
    Ok(symbols
        .chunks_exact(2)
        .map(|pair| (pair[0].0 << 4) | pair[1].0)
        .collect())
}

pub fn encode_symbols(payload: &[u8], transport: Transport) -> Vec<Symbol> {
    match transport {
        Transport::Base64Hex => to_symbols(payload),
        Transport::Raw => to_nibbles(payload),
    }
}

pub fn decode_symbols(symbols: &[Symbol], transport: Transport) -> Result<Vec<u8>, DecodeError> {
    match transport {
        Transport::Base64Hex => from_symbols(symbols),
        Transport::Raw => from_nibbles(symbols),
    }
}
