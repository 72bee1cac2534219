//! Message fragmentation helpers.

/// Pick the fragment length for a message.
///
/// Uses the fewest fragments whose length fits `max_fragment_len`, never
/// splitting into more than `message_len / min_fragment_len` pieces. When even
/// that many pieces are too long, the last candidate wins.
#[must_use]
pub fn fragment_length(message_len: usize, min_fragment_len: usize, max_fragment_len: usize) -> usize {
    let max_count = (message_len / min_fragment_len.max(1)).max(1);
    let mut fragment_len = message_len;
    for count in 1..=max_count {
        fragment_len = message_len.div_ceil(count);
        if fragment_len <= max_fragment_len {
            break;
        }
    }
    fragment_len
}

/// Split `message` into equal fragments, zero-padding the last.
#[must_use]
pub fn partition_message(message: &[u8], fragment_len: usize) -> Vec<Vec<u8>> {
    message
        .chunks(fragment_len.max(1))
        .map(|chunk| {
            let mut fragment = chunk.to_vec();
            fragment.resize(fragment_len, 0);
            fragment
        })
        .collect()
}

/// Concatenate fragments and drop the padding past `message_len`.
#[must_use]
pub fn join_fragments<B: AsRef<[u8]>>(fragments: &[B], message_len: usize) -> Vec<u8> {
    let mut message: Vec<u8> = fragments
        .iter()
        .flat_map(|f| f.as_ref().iter().copied())
        .collect();
    message.truncate(message_len);
    message
}

/// XOR `src` into `dst`; lengths must match.
pub fn xor_into(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}
