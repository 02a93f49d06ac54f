//! CRC16-CCITT (polynomial `0x1021`, initial value `0xFFFF`, MSB first, no
//! reflection, no final XOR).

/// Default CCITT polynomial.
pub const CRC16_POLY: u16 = 0x1021;

/// Default initial register value.
pub const CRC16_INIT: u16 = 0xFFFF;

/// Incremental CRC16 computation.
///
/// Feeding the same bytes in any chunking produces the same result as the
/// one-shot [`crc16_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    poly: u16,
    register: u16,
}

impl Crc16 {
    /// Creates a hasher with the CCITT defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_params(CRC16_POLY, CRC16_INIT)
    }

    /// Creates a hasher with a custom polynomial and initial value.
    #[must_use]
    pub const fn with_params(poly: u16, init: u16) -> Self {
        Self {
            poly,
            register: init,
        }
    }

    /// Feeds bytes into the register.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.register ^= u16::from(byte) << 8;
            for _ in 0..8 {
                if self.register & 0x8000 != 0 {
                    self.register = (self.register << 1) ^ self.poly;
                } else {
                    self.register <<= 1;
                }
            }
        }
    }

    /// Returns the current register value.
    #[must_use]
    pub const fn finish(&self) -> u16 {
        self.register
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the CRC16-CCITT of `bytes` with the default parameters.
#[must_use]
pub fn crc16(bytes: &[u8]) -> u16 {
    crc16_with(bytes, CRC16_POLY, CRC16_INIT)
}

/// Computes a CRC16 of `bytes` with a caller-supplied polynomial and initial
/// value.
#[must_use]
pub fn crc16_with(bytes: &[u8], poly: u16, init: u16) -> u16 {
    let mut crc = Crc16::with_params(poly, init);
    crc.update(bytes);
    crc.finish()
}
