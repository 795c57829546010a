//! On-chain data codec
//!
//! The SoundShare contracts pack text into fixed-width field elements
//! (felts) and amounts into 10^18-scaled integers. This module owns the
//! byte-level conversions between those wire forms and display values:
//!
//! - **Packed strings**: big-endian bytes of a felt, NUL-terminated,
//!   decoded until the first zero byte and trimmed
//! - **Content hashes**: 32-byte digests split into low/high 128-bit
//!   halves on-chain, reconstructed as 64-char hex for gateway URLs
//! - **Token amounts**: `Uint256` from low/high felts, displayed as the
//!   raw integer divided by 10^18 rounded to 4 decimal places
//! - **Addresses**: truncated to first 6 + "..." + last 4 for display

use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SoundShareError;
use crate::Result;

/// 10^18 scale used by share prices and token balances
pub const E18: u64 = 1_000_000_000_000_000_000;

// ============================================================================
// Felt
// ============================================================================

/// A field element as transported over the wire: 32 big-endian bytes.
///
/// The chain's native field is narrower than 256 bits, but the client only
/// moves felts between hex strings and byte views, so the full 32-byte
/// representation is kept as-is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Felt([u8; 32]);

impl Felt {
    pub const ZERO: Felt = Felt([0u8; 32]);

    pub fn from_bytes_be(bytes: [u8; 32]) -> Self {
        Felt(bytes)
    }

    pub fn to_bytes_be(&self) -> [u8; 32] {
        self.0
    }

    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Felt(bytes)
    }

    pub fn from_u128(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Felt(bytes)
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches("0x");
        if digits.is_empty() || digits.len() > 64 {
            return Err(SoundShareError::decode(format!(
                "felt hex must be 1..=64 digits, got {:?}",
                s
            )));
        }
        // Left-pad to an even 64 digits so hex::decode sees whole bytes
        let padded = format!("{:0>64}", digits);
        let raw = hex::decode(&padded)
            .map_err(|e| SoundShareError::decode(format!("invalid felt hex {:?}: {}", s, e)))?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        Ok(Felt(bytes))
    }

    /// Minimal hex form with `0x` prefix ("0x0" for zero).
    pub fn to_hex(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Narrow to u64; `None` if any higher byte is set.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(buf))
    }

    /// Narrow to u128; `None` if any higher byte is set.
    pub fn to_u128(&self) -> Option<u128> {
        if self.0[..16].iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(buf))
    }
}

impl fmt::Debug for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Felt({})", self.to_hex())
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Felt::from_u64(value)
    }
}

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Felt::from_hex(&s).map_err(D::Error::custom)
    }
}

// ============================================================================
// Uint256
// ============================================================================

/// 256-bit unsigned integer transported as two 128-bit felt words.
///
/// Token balances and aggregate costs use this form. Arithmetic is limited
/// to what the client needs: multiply by a share count, add one for
/// rounding carry, and divide for decimal display.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Uint256 {
    pub low: u128,
    pub high: u128,
}

impl Uint256 {
    pub const ZERO: Uint256 = Uint256 { low: 0, high: 0 };

    pub fn new(low: u128, high: u128) -> Self {
        Uint256 { low, high }
    }

    /// Assemble from the low/high felt pair of a Uint256 return value.
    ///
    /// Each half must fit 128 bits; a wider felt is malformed wire data.
    pub fn from_felts(low: &Felt, high: &Felt) -> Result<Self> {
        let low = low
            .to_u128()
            .ok_or_else(|| SoundShareError::decode("uint256 low word exceeds 128 bits"))?;
        let high = high
            .to_u128()
            .ok_or_else(|| SoundShareError::decode("uint256 high word exceeds 128 bits"))?;
        Ok(Uint256 { low, high })
    }

    /// Widen a full felt: the top 16 bytes become the high word.
    pub fn from_felt(felt: &Felt) -> Self {
        let bytes = felt.to_bytes_be();
        let mut hi = [0u8; 16];
        let mut lo = [0u8; 16];
        hi.copy_from_slice(&bytes[..16]);
        lo.copy_from_slice(&bytes[16..]);
        Uint256 {
            low: u128::from_be_bytes(lo),
            high: u128::from_be_bytes(hi),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// Calldata form: (low, high) felt pair.
    pub fn to_felts(&self) -> (Felt, Felt) {
        (Felt::from_u128(self.low), Felt::from_u128(self.high))
    }

    fn to_limbs(&self) -> [u64; 4] {
        [
            self.low as u64,
            (self.low >> 64) as u64,
            self.high as u64,
            (self.high >> 64) as u64,
        ]
    }

    fn from_limbs(limbs: [u64; 4]) -> Self {
        Uint256 {
            low: (limbs[0] as u128) | ((limbs[1] as u128) << 64),
            high: (limbs[2] as u128) | ((limbs[3] as u128) << 64),
        }
    }

    /// Divide by a small divisor, returning quotient and remainder.
    pub fn divmod_u64(&self, divisor: u64) -> (Uint256, u64) {
        debug_assert!(divisor != 0);
        let limbs = self.to_limbs();
        let mut quotient = [0u64; 4];
        let mut rem: u128 = 0;
        for i in (0..4).rev() {
            let cur = (rem << 64) | limbs[i] as u128;
            quotient[i] = (cur / divisor as u128) as u64;
            rem = cur % divisor as u128;
        }
        (Uint256::from_limbs(quotient), rem as u64)
    }

    /// Multiply by a u64, `None` on 256-bit overflow.
    pub fn checked_mul_u64(&self, factor: u64) -> Option<Uint256> {
        let limbs = self.to_limbs();
        let mut out = [0u64; 4];
        let mut carry: u128 = 0;
        for i in 0..4 {
            let product = limbs[i] as u128 * factor as u128 + carry;
            out[i] = product as u64;
            carry = product >> 64;
        }
        if carry != 0 {
            return None;
        }
        Some(Uint256::from_limbs(out))
    }

    /// Add a u64, `None` on 256-bit overflow.
    pub fn checked_add_u64(&self, addend: u64) -> Option<Uint256> {
        let (low, overflow) = self.low.overflowing_add(addend as u128);
        if !overflow {
            return Some(Uint256 { low, high: self.high });
        }
        let high = self.high.checked_add(1)?;
        Some(Uint256 { low, high })
    }

    /// Full decimal representation, no separators.
    pub fn to_decimal(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        // Peel off 19-digit chunks (largest power of ten below u64::MAX)
        const CHUNK: u64 = 10_000_000_000_000_000_000;
        let mut value = *self;
        let mut chunks = Vec::new();
        while !value.is_zero() {
            let (quotient, rem) = value.divmod_u64(CHUNK);
            chunks.push(rem);
            value = quotient;
        }
        let mut out = chunks.pop().map(|c| c.to_string()).unwrap_or_default();
        for chunk in chunks.iter().rev() {
            out.push_str(&format!("{:019}", chunk));
        }
        out
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        Uint256 { low: value as u128, high: 0 }
    }
}

impl From<u128> for Uint256 {
    fn from(value: u128) -> Self {
        Uint256 { low: value, high: 0 }
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

// ============================================================================
// Packed strings
// ============================================================================

/// Decode a NUL-terminated string packed into a felt.
///
/// Leading zero bytes are padding from the fixed-width representation and
/// are skipped. Decoding stops at the first zero byte after the content
/// starts, and the result is whitespace-trimmed. A zero felt decodes to
/// the empty string.
pub fn decode_packed_str(felt: &Felt) -> Result<String> {
    let bytes = felt.to_bytes_be();
    let start = match bytes.iter().position(|b| *b != 0) {
        Some(pos) => pos,
        None => return Ok(String::new()),
    };
    let mut content = Vec::new();
    for &byte in &bytes[start..] {
        if byte == 0 {
            break;
        }
        content.push(byte);
    }
    let text = std::str::from_utf8(&content)
        .map_err(|e| SoundShareError::decode(format!("packed string is not UTF-8: {}", e)))?;
    Ok(text.trim().to_string())
}

/// Pack a short string into a felt, right-aligned big-endian bytes.
///
/// The inverse of [`decode_packed_str`]; at most 31 bytes so the value
/// stays within the field.
pub fn encode_packed_str(text: &str) -> Result<Felt> {
    let bytes = text.as_bytes();
    if bytes.len() > 31 {
        return Err(SoundShareError::invalid_input(format!(
            "packed string is limited to 31 bytes, got {}",
            bytes.len()
        )));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(Felt::from_bytes_be(out))
}

// ============================================================================
// Content hashes
// ============================================================================

/// Rebuild a 32-byte content hash from its on-chain low/high halves.
///
/// Each half carries 16 bytes; the result is the 64-char lowercase hex
/// digest used in gateway URLs. A zero half means the record never stored
/// that asset and is reported as a decode failure.
pub fn reconstruct_content_hash(low: &Felt, high: &Felt) -> Result<String> {
    if low.is_zero() || high.is_zero() {
        return Err(SoundShareError::decode("missing content hash part"));
    }
    let low = low
        .to_u128()
        .ok_or_else(|| SoundShareError::decode("content hash low part exceeds 128 bits"))?;
    let high = high
        .to_u128()
        .ok_or_else(|| SoundShareError::decode("content hash high part exceeds 128 bits"))?;
    Ok(format!("{:032x}{:032x}", high, low))
}

/// Split a 64-char hex digest into the (low, high) felt pair for calldata.
pub fn split_content_hash(digest: &str) -> Result<(Felt, Felt)> {
    let digest = digest.trim();
    if digest.len() != 64 {
        return Err(SoundShareError::invalid_input(format!(
            "content hash must be 64 hex chars, got {}",
            digest.len()
        )));
    }
    let raw = hex::decode(digest)
        .map_err(|e| SoundShareError::invalid_input(format!("invalid content hash hex: {}", e)))?;
    let mut hi = [0u8; 16];
    let mut lo = [0u8; 16];
    hi.copy_from_slice(&raw[..16]);
    lo.copy_from_slice(&raw[16..]);
    Ok((
        Felt::from_u128(u128::from_be_bytes(lo)),
        Felt::from_u128(u128::from_be_bytes(hi)),
    ))
}

// ============================================================================
// Display formatting
// ============================================================================

/// Format a raw 10^18-scaled amount with 4 decimal digits, rounding half up.
///
/// `1234500000000000000` renders as `"1.2345"`.
pub fn format_token_amount(raw: &Uint256) -> String {
    let (mut whole, rem) = raw.divmod_u64(E18);
    // Round the 18-digit remainder to 4 places
    let mut frac = (rem + 5 * 10u64.pow(13)) / 10u64.pow(14);
    if frac == 10_000 {
        frac = 0;
        // Carry into the integer part; saturate at max rather than wrap
        whole = whole.checked_add_u64(1).unwrap_or(whole);
    }
    format!("{}.{:04}", whole.to_decimal(), frac)
}

/// Truncate an address for display: first 6 chars + "..." + last 4.
pub fn truncate_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
