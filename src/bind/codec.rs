//! Boolean representation at the C boundary.
//!
//! Python and Go agree on booleans only through a C `char`: `true` is sent as
//! [`TRUE_BYTE`] and `false` as [`FALSE_BYTE`]. The glue helpers
//! `boolGoToPy` / `boolPyToGo` written into every glue file implement exactly
//! these two functions.
//!
//! Decoding is permissive: any nonzero byte is `true`, never an error.
//! Whether that is a contract or an accident of the `!= 0` test has not been
//! confirmed; verify with maintainers before tightening it.

/// Byte sent for `true`.
pub const TRUE_BYTE: u8 = 1;

/// Byte sent for `false`.
pub const FALSE_BYTE: u8 = 0;

pub fn encode_bool(value: bool) -> u8 {
    if value {
        TRUE_BYTE
    } else {
        FALSE_BYTE
    }
}

pub fn decode_bool(byte: u8) -> bool {
    byte != FALSE_BYTE
}
