//! Bytewords: one four-letter word per byte.
//!
//! Every word is uniquely identified by its first and last letter, which is
//! what the minimal style transmits. Encoded text always ends with the
//! big-endian CRC-32 of the data.

use ur_fountain::{crc32, crc32_bytes};

use crate::error::BytewordsError;

const WORDS: &str = "\
    ableacidalsoapexaquaarchatomauntawayaxisbackbaldbarnbeltbetabias\
    bluebodybragbrewbulbbuzzcalmcashcatschefcityclawcodecolacookcost\
    cruxcurlcuspcyandarkdatadaysdelidicedietdoordowndrawdropdrumdull\
    dutyeacheasyechoedgeepicevenexamexiteyesfactfairfernfigsfilmfish\
    fizzflapflewfluxfoxyfreefrogfuelfundgalagamegeargemsgiftgirlglow\
    goodgraygrimgurugushgyrohalfhanghardhawkheathelphighhillholyhope\
    hornhutsicedideaidleinchinkyintoirisironitemjadejazzjoinjoltjowl\
    judojugsjumpjunkjurykeepkenokeptkeyskickkilnkingkitekiwiknoblamb\
    lavalazyleaflegsliarlimplionlistlogoloudloveluaulucklungmainmany\
    mathmazememomenumeowmildmintmissmonknailnavyneednewsnextnoonnote\
    numbobeyoboeomitonyxopenovalowlspaidpartpeckplaypluspoempoolpose\
    puffpumapurrquadquizraceramprealredorichroadrockroofrubyruinruns\
    rustsafesagascarsetssilkskewslotsoapsolosongstubsurfswantacotask\
    taxitenttiedtimetinytoiltombtoystriptunatwinuglyundouniturgeuser\
    vastveryvetovialvibeviewvisavoidvowswallwandwarmwaspwavewaxywebs\
    whatwhenwhizwolfworkyankyawnyellyogayurtzapszerozestzinczonezoom";

const CHECKSUM_LEN: usize = 4;

/// Byte value for each (first letter, last letter) pair.
const MINIMAL_INDEX: [Option<u8>; 26 * 26] = build_minimal_index();

#[allow(clippy::cast_possible_truncation)] // i < 256
const fn build_minimal_index() -> [Option<u8>; 26 * 26] {
    let bytes = WORDS.as_bytes();
    let mut table = [None; 26 * 26];
    let mut i = 0;
    while i < 256 {
        let first = (bytes[i * 4] - b'a') as usize;
        let last = (bytes[i * 4 + 3] - b'a') as usize;
        table[first * 26 + last] = Some(i as u8);
        i += 1;
    }
    table
}

/// Text rendering of the words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Style {
    /// Full words separated by spaces.
    Standard,
    /// Full words separated by `-`.
    Uri,
    /// First and last letters, no separator.
    #[default]
    Minimal,
}

/// The word for `byte`.
#[must_use]
pub fn word(byte: u8) -> &'static str {
    let start = usize::from(byte) * 4;
    &WORDS[start..start + 4]
}

fn push_minimal(out: &mut String, byte: u8) {
    let w = word(byte).as_bytes();
    out.push(char::from(w[0]));
    out.push(char::from(w[3]));
}

fn minimal_lookup(first: u8, last: u8) -> Option<u8> {
    if !first.is_ascii_lowercase() || !last.is_ascii_lowercase() {
        return None;
    }
    MINIMAL_INDEX[usize::from(first - b'a') * 26 + usize::from(last - b'a')]
}

fn word_lookup(w: &str) -> Option<u8> {
    let bytes = w.as_bytes();
    if bytes.len() != 4 {
        return None;
    }
    minimal_lookup(bytes[0], bytes[3]).filter(|&b| word(b) == w)
}

/// Characters needed to render `len` bytes.
#[must_use]
pub const fn encoded_len(len: usize, style: Style) -> usize {
    match style {
        Style::Standard | Style::Uri => (len * 5).saturating_sub(1),
        Style::Minimal => len * 2,
    }
}

/// Transcribe `data` followed by its CRC-32.
#[must_use]
pub fn encode(data: &[u8], style: Style) -> String {
    let mut bytes = data.to_vec();
    bytes.extend_from_slice(&crc32_bytes(data));
    match style {
        Style::Standard => join_words(&bytes, " "),
        Style::Uri => join_words(&bytes, "-"),
        Style::Minimal => {
            let mut out = String::with_capacity(encoded_len(bytes.len(), style));
            for &b in &bytes {
                push_minimal(&mut out, b);
            }
            out
        }
    }
}

fn join_words(bytes: &[u8], separator: &str) -> String {
    bytes
        .iter()
        .map(|&b| word(b))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Parse text back to data, verifying and removing the CRC-32.
///
/// Letters are matched case-insensitively.
///
/// # Errors
///
/// Returns `BytewordsError::InvalidWord` for an unknown word,
/// `BytewordsError::InvalidLength` for minimal text of odd length, and
/// `BytewordsError::InvalidChecksum` if the checksum is missing or wrong.
pub fn decode(text: &str, style: Style) -> Result<Vec<u8>, BytewordsError> {
    let text = text.to_ascii_lowercase();
    let bytes = match style {
        Style::Standard => split_words(&text, ' ')?,
        Style::Uri => split_words(&text, '-')?,
        Style::Minimal => {
            if text.len() % 2 != 0 {
                return Err(BytewordsError::InvalidLength);
            }
            text.as_bytes()
                .chunks_exact(2)
                .map(|pair| minimal_lookup(pair[0], pair[1]).ok_or(BytewordsError::InvalidWord))
                .collect::<Result<Vec<u8>, _>>()?
        }
    };
    strip_checksum(bytes)
}

fn split_words(text: &str, separator: char) -> Result<Vec<u8>, BytewordsError> {
    text.split(separator)
        .filter(|w| !w.is_empty())
        .map(|w| word_lookup(w).ok_or(BytewordsError::InvalidWord))
        .collect()
}

fn strip_checksum(mut bytes: Vec<u8>) -> Result<Vec<u8>, BytewordsError> {
    if bytes.len() <= CHECKSUM_LEN {
        return Err(BytewordsError::InvalidChecksum);
    }
    let body_len = bytes.len() - CHECKSUM_LEN;
    let mut trailer = [0_u8; CHECKSUM_LEN];
    trailer.copy_from_slice(&bytes[body_len..]);
    bytes.truncate(body_len);
    if u32::from_be_bytes(trailer) != crc32(&bytes) {
        return Err(BytewordsError::InvalidChecksum);
    }
    Ok(bytes)
}

/// Four bytes as four space-separated words, without a checksum.
#[must_use]
pub fn identifier(data: &[u8; 4]) -> String {
    join_words(data, " ")
}
