//! MSB-first packing of 1-bit pixels.

use std::io::{self, Write};

/// Partial-byte carry between calls to [`BitPacker::push`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitPacker {
    byte: u8,
    len: u8,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts `bit` into the pending byte, returning it once 8 bits are in.
    pub fn push(&mut self, bit: bool) -> Option<u8> {
        self.byte = (self.byte << 1) | bit as u8;
        self.len += 1;

        if self.len == 8 {
            let byte = self.byte;
            *self = Self::default();
            Some(byte)
        } else {
            None
        }
    }

    /// Flushes the remaining 1..=7 bits, zero-padded on the low-order end.
    pub fn finish(self) -> Option<u8> {
        if self.len == 0 {
            None
        } else {
            Some(self.byte << (8 - self.len))
        }
    }
}

pub fn pack(pixels: impl IntoIterator<Item = bool>) -> Vec<u8> {
    let mut packer = BitPacker::new();
    let mut bytes: Vec<u8> = pixels.into_iter().filter_map(|bit| packer.push(bit)).collect();

    bytes.extend(packer.finish());
    bytes
}

pub fn unpack_iter(bytes: &[u8]) -> impl Iterator<Item = bool> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |idx| (byte >> idx) & 1 == 1))
}

pub fn unpack(bytes: &[u8]) -> Vec<bool> {
    let bits: Vec<_> = unpack_iter(bytes).collect();

    debug_assert_eq!(bits.len(), bytes.len() * 8);
    bits
}

/// Streams pixels into a byte sink, carrying the partial byte across writes.
///
/// Padding is emitted only once, by [`BitWriter::finish`], so frames whose
/// size is not a multiple of 8 pack back-to-back without gaps.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    sink: W,
    packer: BitPacker,
    buffer: Vec<u8>,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            packer: BitPacker::new(),
            buffer: Vec::new(),
        }
    }

    pub fn write(&mut self, pixels: impl IntoIterator<Item = bool>) -> io::Result<()> {
        let packer = &mut self.packer;

        self.buffer.clear();
        self.buffer
            .extend(pixels.into_iter().filter_map(|bit| packer.push(bit)));

        self.sink.write_all(&self.buffer)?;

        Ok(())
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(byte) = self.packer.finish() {
            self.sink.write_all(&[byte])?;
        }

        self.sink.flush()?;

        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const T: bool = true;
    const F: bool = false;

    #[test]
    fn packs_msb_first() {
        assert_eq!(pack(vec![T, F, F, F, F, F, F, T]), vec![0b1000_0001]);
        assert_eq!(pack(vec![F, T, T, F, T, F, T, T]), vec![0b0110_1011]);
    }

    #[test]
    fn pads_final_byte_with_zeros() {
        assert_eq!(pack(vec![T]), vec![0b1000_0000]);
        assert_eq!(pack(vec![T, T, T]), vec![0b1110_0000]);
        assert_eq!(
            pack(vec![T, T, T, T, T, T, T, T, F, T]),
            vec![0xff, 0b0100_0000]
        );
    }

    #[test]
    fn packs_nothing_into_nothing() {
        assert_eq!(pack(Vec::new()), Vec::<u8>::new());
        assert_eq!(BitPacker::new().finish(), None);
    }

    #[test]
    fn unpacks_msb_first() {
        assert_eq!(unpack(&[0b1010_0001]), vec![T, F, T, F, F, F, F, T]);
        assert_eq!(unpack(&[]), Vec::<bool>::new());
    }

    #[test]
    fn writer_carries_partial_bytes_between_writes() {
        let mut writer = BitWriter::new(Vec::new());

        writer.write(vec![T, F, T]).unwrap();
        writer.write(vec![T, T]).unwrap();
        writer.write(vec![F, F, T, T]).unwrap();

        let bytes = writer.finish().unwrap();

        assert_eq!(bytes, vec![0b1011_1001, 0b1000_0000]);
    }

    #[test]
    fn writer_appends_after_existing_content() {
        let mut writer = BitWriter::new(vec![0xaa]);

        writer.write(vec![T; 8]).unwrap();

        assert_eq!(writer.finish().unwrap(), vec![0xaa, 0xff]);
    }

    proptest! {
        #[test]
        fn whole_bytes_survive_a_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let bits = unpack(&bytes);

            prop_assert_eq!(bits.len(), bytes.len() * 8);
            prop_assert_eq!(unpack(&pack(bits.clone())), bits);
        }

        #[test]
        fn partial_bytes_are_zero_padded(bits in prop::collection::vec(any::<bool>(), 1..200)) {
            let packed = pack(bits.iter().copied());
            let unpacked = unpack(&packed);

            prop_assert_eq!(packed.len(), (bits.len() + 7) / 8);
            prop_assert_eq!(&unpacked[..bits.len()], &bits[..]);
            prop_assert!(unpacked[bits.len()..].iter().all(|bit| !bit));
        }

        #[test]
        fn writer_matches_pack(chunks in prop::collection::vec(prop::collection::vec(any::<bool>(), 0..20), 0..10)) {
            let mut writer = BitWriter::new(Vec::new());

            for chunk in &chunks {
                writer.write(chunk.iter().copied()).unwrap();
            }

            prop_assert_eq!(writer.finish().unwrap(), pack(chunks.concat()));
        }
    }
}
