//! Per-block transform between the raw peripheral buffer and the sink.
//!
//! PCM encodings pass acquired bytes through untouched. Opus sessions convert
//! the peripheral's offset-binary samples to signed PCM and run them through
//! the session encoder.

use crate::models::error::WorkerFault;
use crate::session::resources::try_alloc;
use crate::traits::encoder::Encoder;

/// Result of processing one acquired block.
#[derive(Debug, PartialEq, Eq)]
pub enum CodecOutput<'a> {
    /// Bytes to forward to the sink.
    Forward(&'a [u8]),
    /// The encoder produced nothing (0) or failed (negative code).
    Dropped(i32),
}

pub enum CodecAdapter {
    Passthrough,
    Opus {
        encoder: Box<dyn Encoder>,
        pcm: Vec<i16>,
        encoded: Vec<u8>,
    },
}

impl CodecAdapter {
    /// Wraps a live encoder, allocating a `frame_size`-byte output buffer.
    pub fn opus(encoder: Box<dyn Encoder>, frame_size: usize) -> Result<Self, WorkerFault> {
        let encoded = try_alloc::<u8>(frame_size)?;
        let pcm = try_alloc::<i16>(frame_size)?;
        Ok(Self::Opus { encoder, pcm, encoded })
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Opus { .. })
    }

    /// Process a block of which the first `read` bytes were just acquired.
    ///
    /// The encoder is always asked for `frame_size` samples with an output
    /// capacity of `frame_size` bytes, whatever `read` was. Samples past a
    /// short read are encoded as silence.
    pub fn process<'a>(
        &'a mut self,
        raw: &'a mut [u8],
        read: usize,
        frame_size: usize,
    ) -> CodecOutput<'a> {
        let read = read.min(raw.len());
        match self {
            Self::Passthrough => CodecOutput::Forward(&raw[..read]),
            Self::Opus { encoder, pcm, encoded } => {
                flip_sign_bits(&mut raw[..read]);
                fill_pcm(&raw[..read], pcm);

                let capacity = frame_size.min(encoded.len());
                let written = encoder.encode(pcm, frame_size, &mut encoded[..capacity]);
                if written > 0 {
                    let len = (written as usize).min(capacity);
                    CodecOutput::Forward(&encoded[..len])
                } else {
                    CodecOutput::Dropped(written)
                }
            }
        }
    }
}

/// Toggle the top bit of every native-endian 16-bit sample, converting
/// offset-binary samples to two's complement. A trailing odd byte is left alone.
pub fn flip_sign_bits(block: &mut [u8]) {
    for sample in block.chunks_exact_mut(2) {
        let value = u16::from_ne_bytes([sample[0], sample[1]]) ^ 0x8000;
        sample.copy_from_slice(&value.to_ne_bytes());
    }
}

/// Decode `acquired` into `pcm`, zeroing samples it doesn't cover.
fn fill_pcm(acquired: &[u8], pcm: &mut [i16]) {
    let mut samples = acquired.chunks_exact(2);
    for dst in pcm.iter_mut() {
        *dst = samples
            .next()
            .map(|src| i16::from_ne_bytes([src[0], src[1]]))
            .unwrap_or(0);
    }
}
