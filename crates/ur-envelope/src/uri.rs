//! `ur:` URI framing.

use std::fmt;
use std::str::FromStr;

use crate::error::UrError;
use crate::ur::is_ur_type;

const SCHEME: &str = "ur";

/// The components of a UR string, with the body still transcribed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrFrame {
    /// UR type.
    pub ur_type: String,
    /// `(seq_num, seq_len)` for multipart URs.
    pub sequence: Option<(u32, usize)>,
    /// Transcribed body.
    pub body: String,
}

impl UrFrame {
    /// Single-part frame.
    #[must_use]
    pub fn single(ur_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            ur_type: ur_type.into(),
            sequence: None,
            body: body.into(),
        }
    }

    /// Multipart frame.
    #[must_use]
    pub fn multi(
        ur_type: impl Into<String>,
        seq_num: u32,
        seq_len: usize,
        body: impl Into<String>,
    ) -> Self {
        Self {
            ur_type: ur_type.into(),
            sequence: Some((seq_num, seq_len)),
            body: body.into(),
        }
    }

    /// Split a UR string into its components.
    ///
    /// The input is lowercased first, so the scheme and body are
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `UrError::InvalidScheme`, `UrError::TypeUnspecified`,
    /// `UrError::InvalidType`, `UrError::InvalidPathLength` or
    /// `UrError::InvalidSequenceComponent` for malformed strings.
    pub fn parse(s: &str) -> Result<Self, UrError> {
        let lowered = s.to_ascii_lowercase();
        let path = lowered
            .strip_prefix(SCHEME)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or(UrError::InvalidScheme)?;

        let (ur_type, rest) = path.split_once('/').ok_or(UrError::TypeUnspecified)?;
        if !is_ur_type(ur_type) {
            return Err(UrError::InvalidType);
        }

        let components: Vec<&str> = rest.split('/').collect();
        match components.as_slice() {
            [body] => Ok(Self::single(ur_type, *body)),
            [seq, body] => {
                let (seq_num, seq_len) = parse_sequence(seq)?;
                Ok(Self::multi(ur_type, seq_num, seq_len, *body))
            }
            _ => Err(UrError::InvalidPathLength),
        }
    }
}

fn parse_sequence(seq: &str) -> Result<(u32, usize), UrError> {
    let (num, len) = seq
        .split_once('-')
        .ok_or(UrError::InvalidSequenceComponent)?;
    let seq_num: u32 = num.parse().map_err(|_| UrError::InvalidSequenceComponent)?;
    let seq_len: usize = len.parse().map_err(|_| UrError::InvalidSequenceComponent)?;
    if seq_num == 0 || seq_len == 0 {
        return Err(UrError::InvalidSequenceComponent);
    }
    Ok((seq_num, seq_len))
}

impl fmt::Display for UrFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}:{}/", self.ur_type)?;
        if let Some((seq_num, seq_len)) = self.sequence {
            write!(f, "{seq_num}-{seq_len}/")?;
        }
        f.write_str(&self.body)
    }
}

impl FromStr for UrFrame {
    type Err = UrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single() {
        let frame = UrFrame::parse("ur:bytes/aeadaolazmjendeoti").unwrap();
        assert_eq!(frame, UrFrame::single("bytes", "aeadaolazmjendeoti"));
        assert_eq!(frame.to_string(), "ur:bytes/aeadaolazmjendeoti");
    }

    #[test]
    fn parse_multi() {
        let frame: UrFrame = "ur:crypto-psbt/12-9/lpbn".parse().unwrap();
        assert_eq!(frame.ur_type, "crypto-psbt");
        assert_eq!(frame.sequence, Some((12, 9)));
        assert_eq!(frame.body, "lpbn");
        assert_eq!(frame.to_string(), "ur:crypto-psbt/12-9/lpbn");
    }

    #[test]
    fn parse_is_case_insensitive() {
        let frame = UrFrame::parse("UR:BYTES/1-9/LPAD").unwrap();
        assert_eq!(frame, UrFrame::multi("bytes", 1, 9, "lpad"));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(UrFrame::parse("uri:bytes/ae"), Err(UrError::InvalidScheme));
        assert_eq!(UrFrame::parse("bytes/ae"), Err(UrError::InvalidScheme));
        assert_eq!(UrFrame::parse("ur:bytes"), Err(UrError::TypeUnspecified));
        assert_eq!(UrFrame::parse("ur:by_tes/ae"), Err(UrError::InvalidType));
        assert_eq!(UrFrame::parse("ur:/ae"), Err(UrError::InvalidType));
        assert_eq!(UrFrame::parse("ur:bytes/1-9/ae/x"), Err(UrError::InvalidPathLength));
        for seq in ["1", "a-9", "1-b", "0-9", "1-0", "-1-9", "4294967296-9"] {
            assert_eq!(
                UrFrame::parse(&format!("ur:bytes/{seq}/ae")),
                Err(UrError::InvalidSequenceComponent),
                "{seq}"
            );
        }
    }
}
