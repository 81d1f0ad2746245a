// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transaction validity window ("era").
//!
//! A mortal era is two bytes on the wire, a little-endian `u16` whose low
//! nibble holds the period class and whose upper twelve bits hold the phase.
//! The encoder is pinned to class 5 (period 64), which is what the chains we
//! talk to accept for the periods callers actually request.

use crate::consts::ERA_TRAILING_ZEROS;
use crate::utils::hex_with_prefix;
use parity_scale_codec::{Decode, Encode, Error, Input, Output};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Era {
    #[default]
    Immortal,
    /// `first` is the high byte of the encoded value, `second` the low byte.
    Mortal { first: u8, second: u8 },
}

impl Era {
    /// Mortal era with phase `block_number % period`, or [`Era::Immortal`]
    /// when either input is zero.
    ///
    /// The encoded period is always 64 blocks; `period` only selects the
    /// phase. A phase of 4096 or more does not fit the 12 phase bits and is
    /// truncated to its low 12 bits.
    pub fn mortal(block_number: u64, period: u64) -> Self {
        if block_number == 0 || period == 0 {
            return Era::Immortal;
        }

        let phase = block_number % period;
        let class = (ERA_TRAILING_ZEROS - 1).clamp(1, 15);
        let encoded = class + (phase << 4);

        Era::Mortal {
            first: (encoded >> 8) as u8,
            second: (encoded & 0xff) as u8,
        }
    }

    pub fn is_immortal(&self) -> bool {
        matches!(self, Era::Immortal)
    }

    /// The 16-bit value packed into a mortal era.
    pub fn encoded(&self) -> Option<u16> {
        match self {
            Era::Immortal => None,
            Era::Mortal { first, second } => Some(u16::from(*second) | (u16::from(*first) << 8)),
        }
    }

    /// `(period, phase)` as a chain would read them back.
    pub fn period_and_phase(&self) -> Option<(u64, u64)> {
        let encoded = u64::from(self.encoded()?);
        let period = 2u64 << (encoded % (1 << 4));
        let quantize_factor = (period >> 12).max(1);
        let phase = (encoded >> 4) * quantize_factor;
        Some((period, phase))
    }

    /// `0x`-prefixed hex of the wire bytes; `0x00` for immortal.
    pub fn descriptor(&self) -> String {
        hex_with_prefix(&self.encode())
    }
}

impl Encode for Era {
    fn size_hint(&self) -> usize {
        match self {
            Era::Immortal => 1,
            Era::Mortal { .. } => 2,
        }
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        match self {
            Era::Immortal => dest.push_byte(0),
            Era::Mortal { first, second } => {
                dest.push_byte(*second);
                dest.push_byte(*first);
            }
        }
    }
}

impl Decode for Era {
    fn decode<I: Input>(input: &mut I) -> Result<Self, Error> {
        let low = input.read_byte()?;
        if low == 0 {
            return Ok(Era::Immortal);
        }
        let high = input.read_byte()?;
        Ok(Era::Mortal {
            first: high,
            second: low,
        })
    }
}
