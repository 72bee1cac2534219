//! UR string decoder.

use ur_fountain::{FountainConfig, FountainDecoder, Part};

use crate::error::UrError;
use crate::transcribe::{Bytewords, Transcriber};
use crate::ur::Ur;
use crate::uri::UrFrame;

/// Collects single or multipart UR strings into a [`Ur`].
///
/// Bodies are read with `T`, minimal bytewords by default.
#[derive(Debug, Default)]
pub struct UrDecoder<T = Bytewords> {
    transcriber: T,
    expected_type: Option<String>,
    fountain: FountainDecoder,
    single_part: bool,
    result: Option<Result<Ur, UrError>>,
}

impl UrDecoder {
    /// Decode a single-part UR string.
    ///
    /// # Errors
    ///
    /// Returns `UrError::InvalidPathLength` for multipart strings, and the
    /// framing or transcription error for malformed ones.
    pub fn decode(s: &str) -> Result<Ur, UrError> {
        Self::decode_with(s, &Bytewords::default())
    }

    /// Stateful decoder with default fountain limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stateful decoder with the fountain limits from `config`.
    #[must_use]
    pub fn with_config(config: &FountainConfig) -> Self {
        Self::with_transcriber(Bytewords::default(), config)
    }
}

impl<T: Transcriber> UrDecoder<T> {
    /// Decode a single-part UR string whose body was written by `transcriber`.
    ///
    /// # Errors
    ///
    /// Same as [`UrDecoder::decode`].
    pub fn decode_with(s: &str, transcriber: &T) -> Result<Ur, UrError> {
        let frame = UrFrame::parse(s)?;
        if frame.sequence.is_some() {
            return Err(UrError::InvalidPathLength);
        }
        let cbor = transcriber.decode(&frame.body)?;
        Ur::new(frame.ur_type, cbor)
    }

    /// Stateful decoder with a custom body transcription.
    #[must_use]
    pub fn with_transcriber(transcriber: T, config: &FountainConfig) -> Self {
        Self {
            transcriber,
            expected_type: None,
            fountain: FountainDecoder::with_config(config),
            single_part: false,
            result: None,
        }
    }

    /// Feed one UR string.
    ///
    /// Returns `Ok(true)` if the part was used, `Ok(false)` if it was ignored
    /// because the decoder is finished or the fountain layer refused it.
    ///
    /// # Errors
    ///
    /// Returns `UrError::UnexpectedType` for a part of another type than the
    /// first, and framing, transcription or part errors for malformed text.
    pub fn receive_part(&mut self, s: &str) -> Result<bool, UrError> {
        if self.result.is_some() {
            return Ok(false);
        }

        let frame = UrFrame::parse(s)?;
        if let Some(expected) = &self.expected_type {
            if *expected != frame.ur_type {
                tracing::debug!(
                    expected = %expected,
                    found = %frame.ur_type,
                    "Rejected UR part of unexpected type"
                );
                return Err(UrError::UnexpectedType {
                    expected: expected.clone(),
                    found: frame.ur_type,
                });
            }
        }

        let Some((seq_num, seq_len)) = frame.sequence else {
            let cbor = self.transcriber.decode(&frame.body)?;
            let ur = Ur::new(frame.ur_type, cbor)?;
            self.single_part = true;
            self.result = Some(Ok(ur));
            return Ok(true);
        };

        let cbor = self.transcriber.decode(&frame.body)?;
        let part = Part::from_cbor(&cbor)?;
        if part.seq_num() != seq_num || part.seq_len() != seq_len {
            tracing::debug!(
                seq = %format_args!("{seq_num}-{seq_len}"),
                part = %part.seq_id(),
                "Rejected UR part with inconsistent sequence"
            );
            return Ok(false);
        }

        if self.expected_type.is_none() {
            self.expected_type = Some(frame.ur_type.clone());
        }

        let accepted = self.fountain.receive_part(&part);
        if let Some(outcome) = self.fountain.result() {
            self.result = Some(match outcome {
                Ok(message) => Ur::new(frame.ur_type, message.clone()),
                Err(err) => Err(UrError::Fountain(err.clone())),
            });
        }
        Ok(accepted)
    }

    /// Body transcription in use.
    #[must_use]
    pub const fn transcriber(&self) -> &T {
        &self.transcriber
    }

    /// Terminal outcome, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&Result<Ur, UrError>> {
        self.result.as_ref()
    }

    /// Consume the decoder, returning its terminal outcome.
    #[must_use]
    pub fn into_result(self) -> Option<Result<Ur, UrError>> {
        self.result
    }

    /// True once a UR was decoded or reassembly failed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// True if a UR was decoded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.result, Some(Ok(_)))
    }

    /// Type fixed by the first multipart part.
    #[must_use]
    pub fn expected_type(&self) -> Option<&str> {
        self.expected_type.as_deref()
    }

    /// Fragment count, once known.
    #[must_use]
    pub fn expected_part_count(&self) -> Option<usize> {
        if self.single_part {
            Some(1)
        } else {
            self.fountain.expected_part_count()
        }
    }

    /// Parts accepted by the fountain layer.
    #[must_use]
    pub const fn processed_parts_count(&self) -> usize {
        if self.single_part {
            1
        } else {
            self.fountain.processed_parts_count()
        }
    }

    /// Rough progress in `[0, 1]`.
    #[must_use]
    pub fn estimated_percent_complete(&self) -> f64 {
        if self.is_complete() {
            1.0
        } else {
            self.fountain.estimated_percent_complete()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::UrEncoder;

    fn bytes_ur(payload: &[u8]) -> Ur {
        Ur::from_value("bytes", &ur_cbor::Value::from(payload)).unwrap()
    }

    #[test]
    fn single_part_decode() {
        let ur = bytes_ur(b"hello");
        let text = UrEncoder::encode(&ur);
        assert_eq!(UrDecoder::decode(&text).unwrap(), ur);
        assert_eq!(UrDecoder::decode(&text.to_uppercase()).unwrap(), ur);
    }

    #[test]
    fn decode_rejects_multipart() {
        let mut encoder = UrEncoder::new(bytes_ur(&[7; 200]), 30, 10, 0).unwrap();
        let part = encoder.next_part().unwrap();
        assert_eq!(UrDecoder::decode(&part), Err(UrError::InvalidPathLength));
    }

    #[test]
    fn stateful_single_part() {
        let ur = bytes_ur(b"hello");
        let mut decoder = UrDecoder::new();
        assert_eq!(decoder.receive_part(&UrEncoder::encode(&ur)), Ok(true));
        assert!(decoder.is_success());
        assert_eq!(decoder.expected_part_count(), Some(1));
        assert_eq!(decoder.processed_parts_count(), 1);
        assert_eq!(decoder.receive_part(&UrEncoder::encode(&ur)), Ok(false));
        assert_eq!(decoder.into_result(), Some(Ok(ur)));
    }

    #[test]
    fn multipart_roundtrip() {
        let ur = bytes_ur(&(0..=255).collect::<Vec<u8>>());
        let mut encoder = UrEncoder::new(ur.clone(), 30, 10, 0).unwrap();
        let mut decoder = UrDecoder::new();
        while !decoder.is_complete() {
            decoder.receive_part(&encoder.next_part().unwrap()).unwrap();
        }
        assert_eq!(decoder.result(), Some(&Ok(ur)));
        assert_eq!(decoder.expected_type(), Some("bytes"));
    }

    #[test]
    fn rejects_other_type_mid_session() {
        let mut a = UrEncoder::new(bytes_ur(&[1; 200]), 30, 10, 0).unwrap();
        let other = Ur::new("seed", bytes_ur(&[2; 200]).cbor().to_vec()).unwrap();
        let mut b = UrEncoder::new(other, 30, 10, 0).unwrap();

        let mut decoder = UrDecoder::new();
        assert_eq!(decoder.receive_part(&a.next_part().unwrap()), Ok(true));
        assert_eq!(
            decoder.receive_part(&b.next_part().unwrap()),
            Err(UrError::UnexpectedType {
                expected: "bytes".into(),
                found: "seed".into()
            })
        );
    }

    #[test]
    fn malformed_text_is_an_error() {
        let mut decoder = UrDecoder::new();
        assert_eq!(decoder.receive_part("http://x"), Err(UrError::InvalidScheme));
        assert!(matches!(
            decoder.receive_part("ur:bytes/1-9/aeadaolazmjendeoti"),
            Err(UrError::Part(_))
        ));
        assert!(matches!(
            decoder.receive_part("ur:bytes/1-9/zzzz"),
            Err(UrError::Bytewords(_))
        ));
        assert!(!decoder.is_complete());
    }

    #[test]
    fn sequence_mismatch_is_ignored() {
        let mut encoder = UrEncoder::new(bytes_ur(&[3; 200]), 30, 10, 0).unwrap();
        let part = encoder.next_part().unwrap();
        let forged = part.replacen("/1-", "/2-", 1);
        let mut decoder = UrDecoder::new();
        assert_eq!(decoder.receive_part(&forged), Ok(false));
        assert_eq!(decoder.expected_type(), None);
        assert_eq!(decoder.receive_part(&part), Ok(true));
    }

    /// Lowercase hex bodies, standing in for any other transcription.
    #[derive(Debug, Default)]
    struct HexBody;

    impl Transcriber for HexBody {
        fn encode(&self, data: &[u8]) -> String {
            hex::encode(data)
        }

        fn decode(&self, text: &str) -> Result<Vec<u8>, crate::BytewordsError> {
            hex::decode(text).map_err(|_| crate::BytewordsError::InvalidWord)
        }
    }

    #[test]
    fn custom_transcriber_roundtrip() {
        let ur = bytes_ur(&(0..200).collect::<Vec<u8>>());
        let config = FountainConfig::default().with_fragment_bounds(10, 40);
        let mut encoder = UrEncoder::with_transcriber(ur.clone(), &config, HexBody).unwrap();
        let mut decoder = UrDecoder::with_transcriber(HexBody, &config);

        let first = encoder.next_part().unwrap();
        let body = first.rsplit('/').next().unwrap();
        assert!(body.bytes().all(|b| b.is_ascii_hexdigit()), "{first}");
        assert!(decoder.receive_part(&first).unwrap());
        while !decoder.is_complete() {
            decoder.receive_part(&encoder.next_part().unwrap()).unwrap();
        }
        assert_eq!(decoder.into_result(), Some(Ok(ur.clone())));

        let single = UrEncoder::encode_with(&ur, &HexBody);
        assert_eq!(UrDecoder::decode_with(&single, &HexBody), Ok(ur));
    }

    #[test]
    fn transcriber_mismatch_is_a_body_error() {
        let ur = bytes_ur(b"hello");
        let hex_text = UrEncoder::encode_with(&ur, &HexBody);
        assert!(matches!(
            UrDecoder::decode(&hex_text),
            Err(UrError::Bytewords(_))
        ));
        let mut decoder = UrDecoder::with_transcriber(HexBody, &FountainConfig::default());
        assert!(decoder.receive_part(&UrEncoder::encode(&ur)).is_err());
        assert!(!decoder.is_complete());
    }

    #[test]
    fn progress_reaches_one_only_when_done() {
        let mut encoder = UrEncoder::new(bytes_ur(&[5; 1000]), 100, 10, 0).unwrap();
        let mut decoder = UrDecoder::new();
        while !decoder.is_complete() {
            assert!(decoder.estimated_percent_complete() < 1.0);
            decoder.receive_part(&encoder.next_part().unwrap()).unwrap();
        }
        assert!((decoder.estimated_percent_complete() - 1.0).abs() < f64::EPSILON);
    }
}
