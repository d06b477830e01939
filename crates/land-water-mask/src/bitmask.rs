//! Packed one-bit-per-pixel land mask.

use espa_common::{EspaError, EspaResult};

/// Row-major bit grid. Pixel `(line, sample)` is bit `7 - idx % 8` of byte
/// `idx / 8`, where `idx = line * nsamps + sample`, so the first pixel of a
/// byte is its most significant bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMask {
    nlines: usize,
    nsamps: usize,
    bytes: Vec<u8>,
}

impl BitMask {
    /// All-clear mask of `nlines * nsamps / 8 + 1` bytes.
    pub fn new(nlines: usize, nsamps: usize) -> EspaResult<Self> {
        let len = nlines
            .checked_mul(nsamps)
            .map(|pixels| pixels / 8 + 1)
            .ok_or_else(|| {
                EspaError::Allocation(format!("{} x {} bit mask overflows", nlines, nsamps))
            })?;

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len)?;
        bytes.resize(len, 0);

        Ok(Self {
            nlines,
            nsamps,
            bytes,
        })
    }

    pub fn nlines(&self) -> usize {
        self.nlines
    }

    pub fn nsamps(&self) -> usize {
        self.nsamps
    }

    fn index(&self, line: usize, sample: usize) -> usize {
        line * self.nsamps + sample
    }

    /// Mark a pixel as land.
    pub fn set(&mut self, line: usize, sample: usize) {
        let idx = self.index(line, sample);
        self.bytes[idx / 8] |= 1 << (7 - idx % 8);
    }

    pub fn get(&self, line: usize, sample: usize) -> bool {
        let idx = self.index(line, sample);
        self.bytes[idx / 8] & (1 << (7 - idx % 8)) != 0
    }

    /// The byte holding pixel `(line, sample)`.
    pub fn byte_at(&self, line: usize, sample: usize) -> u8 {
        self.bytes[self.index(line, sample) / 8]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of land pixels.
    pub fn count_set(&self) -> usize {
        let pixels = self.nlines * self.nsamps;
        let full = pixels / 8;
        let mut count: usize = self.bytes[..full]
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum();
        let tail = pixels % 8;
        if tail > 0 {
            count += (self.bytes[full] >> (8 - tail)).count_ones() as usize;
        }
        count
    }
}
