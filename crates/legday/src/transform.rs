//! Running-XOR whitening across consecutive words.
//!
//! Each word is XORed with the original word before it, which exposes
//! inter-word redundancy as runs of zero bits. The forward direction looks
//! back at the untransformed input; the inverse looks back at the already
//! reconstructed output, so the pair round-trips exactly.

use legday_core::WordStream;

/// XOR every word with the previous input word.
///
/// `out[0] = in[0]` and `out[i] = in[i] ^ in[i - 1]`.
pub fn xor_with_previous(stream: &WordStream) -> WordStream {
    stream
        .iter()
        .scan(0i32, |prev, word| {
            let out = word ^ *prev;
            *prev = word;
            Some(out)
        })
        .collect()
}

/// Invert [`xor_with_previous`].
///
/// `out[0] = in[0]` and `out[i] = in[i] ^ out[i - 1]`.
pub fn undo_xor_with_previous(stream: &WordStream) -> WordStream {
    stream
        .iter()
        .scan(0i32, |prev, word| {
            *prev ^= word;
            Some(*prev)
        })
        .collect()
}
