//! Golden vector tests for fountain encoding and decoding.
//!
//! The message is 256 bytes drawn from the generator seeded with `"Wolf"`,
//! split with a 30 byte maximum fragment length.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::{FountainDecoder, FountainEncoder, Part, Xoshiro256};

    // ─────────────────────────────────────────────────────────────────────────
    // Golden Vector Configuration
    // ─────────────────────────────────────────────────────────────────────────

    const SEQ_LEN: usize = 9;
    const MESSAGE_LEN: usize = 256;
    const CHECKSUM: u32 = 23_570_951;

    fn wolf_message(len: usize) -> Vec<u8> {
        Xoshiro256::from_str_seed("Wolf").next_data(len)
    }

    /// Parts 1 through 20 as (fragment indexes, data).
    const PARTS: [(&[usize], &str); 20] = [
        (&[0], "916ec65cf77cadf55cd7f9cda1a1030026ddd42e905b77adc36e4f2d3c"),
        (&[1], "cba44f7f04f2de44f42d84c374a0e149136f25b01852545961d55f7f7a"),
        (&[2], "8cde6d0e2ec43f3b2dcb644a2209e8c9e34af5c4747984a5e873c9cf5f"),
        (&[3], "965e25ee29039fdf8ca74f1c769fc07eb7ebaec46e0695aea6cbd60b3e"),
        (&[4], "c4bbff1b9ffe8a9e7240129377b9d3711ed38d412fbb4442256f1e6f59"),
        (&[5], "5e0fc57fed451fb0a0101fb76b1fb1e1b88cfdfdaa946294a47de8fff1"),
        (&[6], "73f021c0e6f65b05c0a494e50791270a0050a73ae69b6725505a2ec8a5"),
        (&[7], "791457c9876dd34aadd192a53aa0dc66b556c0c215c7ceb8248b717c22"),
        (&[8], "951e65305b56a3706e3e86eb01c803bbf915d80edcd64d4d0000000000"),
        (
            &[0, 2, 3, 5, 6, 8],
            "330f0f33a05eead4f331df229871bee733b50de71afd2e5a79f196de09",
        ),
        (
            &[1, 2, 4, 5, 6, 8],
            "3b205ce5e52d8c24a52cffa34c564fa1af3fdffcd349dc4258ee4ee828",
        ),
        (&[2, 4, 8], "dd7bf725ea6c16d531b5f03254783803048ca08b87148daacd1cd7a006"),
        (&[1, 4, 7], "760be7ad1c6187902bbc04f539b9ee5eb8ea6833222edea36031306c01"),
        (
            &[1, 4, 5, 6, 7],
            "5bf4031217d2c3254b088fa7553778b5003632f46e21db129416f65b55",
        ),
        (&[6], "73f021c0e6f65b05c0a494e50791270a0050a73ae69b6725505a2ec8a5"),
        (&[1, 6], "b8546ebfe2048541348910267331c643133f828afec9337c318f71b7df"),
        (&[0, 1, 7], "23dedeea74e3a0fb052befabefa13e2f80e4315c9dceed4c8630612e64"),
        (
            &[0, 1, 2, 3, 4, 5, 6, 7],
            "d01a8daee769ce34b6b35d3ca0005302724abddae405bdb419c0a6b208",
        ),
        (&[2, 4, 7], "3171c5dc365766eff25ae47c6f10e7de48cfb8474e050e5fe997a6dc24"),
        (
            &[1, 3, 4, 7],
            "e055c2433562184fa71b4be94f262e200f01c6f74c284b0dc6fae6673f",
        ),
    ];

    // ─────────────────────────────────────────────────────────────────────────
    // Encoder Vectors
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn golden_message_prefix() {
        let message = wolf_message(50);
        assert_eq!(
            hex::encode(message),
            "916ec65cf77cadf55cd7f9cda1a1030026ddd42e905b77adc36e4f2d3c\
             cba44f7f04f2de44f42d84c374a0e149136f25b018"
        );
    }

    #[test]
    fn golden_first_twenty_parts() {
        let message = wolf_message(MESSAGE_LEN);
        let mut encoder = FountainEncoder::new(&message, 30, 10, 0).unwrap();

        for (seq_num, (indexes, data)) in (1_u32..).zip(PARTS) {
            let part = encoder.next_part();
            assert_eq!(part.seq_num(), seq_num);
            assert_eq!(part.seq_len(), SEQ_LEN);
            assert_eq!(part.message_len(), MESSAGE_LEN);
            assert_eq!(part.checksum(), CHECKSUM);
            assert_eq!(hex::encode(part.data()), data, "part {seq_num}");
            let expected: BTreeSet<usize> = indexes.iter().copied().collect();
            assert_eq!(encoder.last_part_indexes(), &expected, "part {seq_num}");
        }
    }

    #[test]
    fn golden_part_display() {
        let message = wolf_message(MESSAGE_LEN);
        let mut encoder = FountainEncoder::new(&message, 30, 10, 0).unwrap();
        assert_eq!(
            encoder.next_part().to_string(),
            "seqNum:1, seqLen:9, messageLen:256, checksum:23570951, \
             data:916ec65cf77cadf55cd7f9cda1a1030026ddd42e905b77adc36e4f2d3c"
        );
    }

    #[test]
    fn golden_part_cbor_header() {
        let message = wolf_message(MESSAGE_LEN);
        let mut encoder = FountainEncoder::new(&message, 30, 10, 0).unwrap();
        let bytes = encoder.next_part().to_cbor().unwrap();
        // [1, 9, 256, 23570951, h'…'] with a 29 byte string
        assert_eq!(
            hex::encode(&bytes[..13]),
            "8501091901001a0167aa07581d"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decoder Vectors
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn golden_decode_from_vectors() {
        let mut decoder = FountainDecoder::new();
        // mixed parts first, then enough pure parts to unlock them
        for (seq_num, (_, data)) in (1_u32..21).zip(PARTS).rev() {
            let part = Part::new(
                seq_num,
                SEQ_LEN,
                MESSAGE_LEN,
                CHECKSUM,
                hex::decode(data).unwrap(),
            );
            decoder.receive_part(&part);
            if decoder.is_complete() {
                break;
            }
        }
        assert_eq!(decoder.message(), Some(wolf_message(MESSAGE_LEN).as_slice()));
    }

    #[test]
    fn golden_large_message_part_count() {
        let message = wolf_message(32_767);
        let mut encoder = FountainEncoder::new(&message, 1000, 10, 100).unwrap();
        let mut decoder = FountainDecoder::new();
        while !decoder.is_complete() {
            decoder.receive_part(&encoder.next_part());
        }
        assert_eq!(decoder.message(), Some(message.as_slice()));
        assert_eq!(decoder.processed_parts_count(), 49);
    }
}
