//! Structural hashing used to index array elements by value.

/// 64-bit structural hash code of a [`Node`](crate::Node).
pub type HashCode = u64;

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0100_0000_01b3;

/// Incremental FNV-1a state.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv(u64);

impl Fnv {
    pub(crate) fn new() -> Self {
        Self(OFFSET_BASIS)
    }

    pub(crate) fn write(&mut self, bytes: &[u8]) -> &mut Self {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(PRIME);
        }
        self
    }

    pub(crate) fn write_u64(&mut self, value: u64) -> &mut Self {
        self.write(&value.to_le_bytes())
    }

    pub(crate) fn finish(self) -> HashCode {
        self.0
    }
}

/// Computes the FNV-1a hash of the provided bytes.
pub(crate) fn hash_bytes(input: &[u8]) -> HashCode {
    let mut state = Fnv::new();
    state.write(input);
    state.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_vectors() {
        assert_eq!(hash_bytes(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(hash_bytes(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn incremental_equals_one_shot() {
        let mut state = Fnv::new();
        state.write(b"json").write(b"-addition");
        assert_eq!(state.finish(), hash_bytes(b"json-addition"));
    }
}
