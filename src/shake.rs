//! L3: sponge construction over Keccak-f[1600] — SHAKE-128/256, SHA3-256/512,
//! plus an incremental XOF reader for rejection sampling.
//!
//! The streaming reader is the ordinary way `gen_matrix`'s rejection loop and
//! CBD's PRF consume SHAKE output without pre-computing an output length,
//! rather than feeding a hardware-style sampling FSM one byte at a time.

use crate::keccak::keccak_f1600;

const MAX_RATE: usize = 168; // SHAKE-128's rate, the largest of the four.

fn load_block(state: &mut [u64; 25], block: &[u8]) {
    for (i, lane) in block.chunks(8).enumerate() {
        let mut l = 0u64;
        for (b, byte) in lane.iter().enumerate() {
            l |= (*byte as u64) << (8 * b);
        }
        state[i] ^= l;
    }
}

fn store_block(state: &[u64; 25], out: &mut [u8]) {
    for (i, byte) in out.iter_mut().enumerate() {
        let lane = state[i / 8];
        *byte = ((lane >> (8 * (i % 8))) & 0xFF) as u8;
    }
}

/// Absorb `input` under `domain_sep` into a fresh, rate-sized sponge state.
fn absorb_once(rate: usize, input: &[u8], domain_sep: u8) -> [u64; 25] {
    let mut st = [0u64; 25];
    let mut off = 0usize;

    while input.len() - off >= rate {
        load_block(&mut st, &input[off..off + rate]);
        keccak_f1600(&mut st);
        off += rate;
    }

    let mut block = [0u8; MAX_RATE];
    let tail = input.len() - off;
    block[..tail].copy_from_slice(&input[off..]);
    block[tail] ^= domain_sep;
    block[rate - 1] ^= 0x80;
    load_block(&mut st, &block[..rate]);
    keccak_f1600(&mut st);

    st
}

fn squeeze(rate: usize, mut st: [u64; 25], out: &mut [u8]) {
    let mut produced = 0usize;
    while produced < out.len() {
        let take = core::cmp::min(rate, out.len() - produced);
        let mut block = [0u8; MAX_RATE];
        store_block(&st, &mut block[..rate]);
        out[produced..produced + take].copy_from_slice(&block[..take]);
        produced += take;
        if produced < out.len() {
            keccak_f1600(&mut st);
        }
    }
}

pub fn sha3_256(input: &[u8]) -> [u8; 32] {
    let st = absorb_once(136, input, 0x06);
    let mut out = [0u8; 32];
    squeeze(136, st, &mut out);
    out
}

pub fn sha3_512(input: &[u8]) -> [u8; 64] {
    let st = absorb_once(72, input, 0x06);
    let mut out = [0u8; 64];
    squeeze(72, st, &mut out);
    out
}

pub fn shake128(input: &[u8], out: &mut [u8]) {
    let st = absorb_once(168, input, 0x1F);
    squeeze(168, st, out);
}

pub fn shake256(input: &[u8], out: &mut [u8]) {
    let st = absorb_once(136, input, 0x1F);
    squeeze(136, st, out);
}

/// Incremental XOF reader: absorb once, then squeeze bytes one at a time or in
/// arbitrary-length slices, transparently re-running the permutation whenever
/// the internal rate-sized buffer runs dry.
pub struct XofReader {
    rate: usize,
    state: [u64; 25],
    buf: [u8; MAX_RATE],
    pos: usize,
}

impl XofReader {
    pub fn shake128(input: &[u8]) -> Self {
        Self::new(168, 0x1F, input)
    }

    pub fn shake256(input: &[u8]) -> Self {
        Self::new(136, 0x1F, input)
    }

    fn new(rate: usize, domain_sep: u8, input: &[u8]) -> Self {
        let state = absorb_once(rate, input, domain_sep);
        let mut buf = [0u8; MAX_RATE];
        // absorb_once already leaves the state freshly permuted and ready to
        // squeeze, matching squeeze()'s first block — no extra permutation here.
        store_block(&state, &mut buf[..rate]);
        Self { rate, state, buf, pos: 0 }
    }

    fn refill(&mut self) {
        if self.pos >= self.rate {
            keccak_f1600(&mut self.state);
            store_block(&self.state, &mut self.buf[..self.rate]);
            self.pos = 0;
        }
    }

    #[inline]
    pub fn next_byte(&mut self) -> u8 {
        self.refill();
        let b = self.buf[self.pos];
        self.pos += 1;
        b
    }

    pub fn fill(&mut self, out: &mut [u8]) {
        for b in out.iter_mut() {
            *b = self.next_byte();
        }
    }
}
