//! This provides the byte streams written by each overwrite pass.
//!
//! A [`PassGenerator`] lazily yields one [`Pass`] per [`PassSpec`] of a mode. Each pass is a
//! reader of exactly `len` bytes, so a pass never has to live in memory as a whole.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::{self, Read};

use crate::mode::{OverwriteMode, PassSpec};

/// Returns a seed for callers that don't pin one.
pub fn gen_seed() -> u64 {
    StdRng::from_entropy().next_u64()
}

enum Fill {
    Fixed(u8),
    Pattern(&'static [u8]),
    Random(StdRng),
}

pub struct Pass {
    index: usize,
    spec: PassSpec,
    fill: Fill,
    len: u64,
    pos: u64,
}

impl Pass {
    fn new(index: usize, spec: PassSpec, len: u64, seed: u64) -> Self {
        let fill = match spec {
            PassSpec::Fixed(byte) => Fill::Fixed(byte),
            PassSpec::Pattern(pattern) => Fill::Pattern(pattern),
            PassSpec::Random => Fill::Random(StdRng::seed_from_u64(
                seed.wrapping_add(index as u64),
            )),
        };

        Self {
            index,
            spec,
            fill,
            len,
            pos: 0,
        }
    }

    /// Zero-based position of this pass within its mode.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn spec(&self) -> PassSpec {
        self.spec
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> u64 {
        self.len - self.pos
    }

    /// Reads the whole pass into memory.
    pub fn to_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.remaining().try_into().unwrap_or(0));
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl Read for Pass {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        let n = if (buf.len() as u64) < remaining {
            buf.len()
        } else {
            // fits in usize since it's smaller than buf.len()
            remaining as usize
        };
        let out = &mut buf[..n];

        match &mut self.fill {
            Fill::Fixed(byte) => out.fill(*byte),
            Fill::Pattern(pattern) => {
                let width = pattern.len() as u64;
                for (offset, byte) in (self.pos..).zip(out.iter_mut()) {
                    *byte = pattern[(offset % width) as usize];
                }
            }
            Fill::Random(rng) => rng.fill_bytes(out),
        }

        self.pos += n as u64;
        Ok(n)
    }
}

/// Lazy sequence of the passes a mode writes over `len` bytes.
pub struct PassGenerator {
    specs: &'static [PassSpec],
    len: u64,
    seed: u64,
    next: usize,
}

impl PassGenerator {
    pub fn new(mode: OverwriteMode, len: u64, seed: u64) -> Self {
        Self {
            specs: mode.passes(),
            len,
            seed,
            next: 0,
        }
    }

    /// Total number of bytes all passes write together.
    pub fn total_len(&self) -> u64 {
        self.len.saturating_mul(self.specs.len() as u64)
    }
}

impl Iterator for PassGenerator {
    type Item = Pass;

    fn next(&mut self) -> Option<Self::Item> {
        let spec = *self.specs.get(self.next)?;
        let pass = Pass::new(self.next, spec, self.len, self.seed);
        self.next += 1;
        Some(pass)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.specs.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for PassGenerator {}
