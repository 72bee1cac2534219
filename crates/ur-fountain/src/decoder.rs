//! Fountain decoder.
//!
//! Parts are reduced against each other by XOR as they arrive: a mixed part
//! whose index set strictly contains another known part's set has that part
//! XORed out, and any part reduced to a single index becomes a recovered
//! fragment. Reassembly happens the moment every fragment is known.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use crate::chooser::FragmentChooser;
use crate::config::FountainConfig;
use crate::crc::crc32;
use crate::error::{DecodeError, RejectReason};
use crate::fragment::{join_fragments, xor_into};
use crate::part::Part;

/// Callback invoked for every rejected part.
pub type RejectionCallback = Box<dyn FnMut(&Part, RejectReason) + Send>;

/// Parameters fixed by the first accepted part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Session {
    seq_len: usize,
    message_len: usize,
    checksum: u32,
    fragment_len: usize,
}

/// A part in terms of the fragments it combines.
#[derive(Clone, Debug)]
struct Pending {
    indexes: BTreeSet<usize>,
    data: Vec<u8>,
}

impl Pending {
    fn simple_index(&self) -> Option<usize> {
        if self.indexes.len() == 1 {
            self.indexes.first().copied()
        } else {
            None
        }
    }

    /// XOR `other` out if its index set is a strict subset of ours.
    fn reduced_by(mut self, indexes: &BTreeSet<usize>, data: &[u8]) -> Self {
        if indexes.len() < self.indexes.len() && indexes.is_subset(&self.indexes) {
            self.indexes.retain(|i| !indexes.contains(i));
            xor_into(&mut self.data, data);
        }
        self
    }
}

/// Reassembles a message from fountain parts received in any order.
pub struct FountainDecoder {
    config: FountainConfig,
    session: Option<Session>,
    chooser: Option<FragmentChooser>,
    received_part_indexes: BTreeSet<usize>,
    last_part_indexes: BTreeSet<usize>,
    simple_parts: BTreeMap<usize, Vec<u8>>,
    mixed_parts: BTreeMap<BTreeSet<usize>, Vec<u8>>,
    queue: VecDeque<Pending>,
    processed_parts: usize,
    rejected_parts: usize,
    result: Option<Result<Vec<u8>, DecodeError>>,
    on_rejected: Option<RejectionCallback>,
}

impl Default for FountainDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FountainDecoder {
    /// Decoder with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&FountainConfig::default())
    }

    /// Decoder with the limits from `config`.
    #[must_use]
    pub fn with_config(config: &FountainConfig) -> Self {
        Self {
            config: config.clone(),
            session: None,
            chooser: None,
            received_part_indexes: BTreeSet::new(),
            last_part_indexes: BTreeSet::new(),
            simple_parts: BTreeMap::new(),
            mixed_parts: BTreeMap::new(),
            queue: VecDeque::new(),
            processed_parts: 0,
            rejected_parts: 0,
            result: None,
            on_rejected: None,
        }
    }

    /// Register a callback fired for every rejected part.
    #[must_use]
    pub fn with_rejection_callback(
        mut self,
        callback: impl FnMut(&Part, RejectReason) + Send + 'static,
    ) -> Self {
        self.on_rejected = Some(Box::new(callback));
        self
    }

    /// Feed one part.
    ///
    /// Returns `false` if the part was rejected or the decoder has already
    /// finished, `true` otherwise. Duplicates are accepted and ignored.
    pub fn receive_part(&mut self, part: &Part) -> bool {
        self.accept(part).unwrap_or(false)
    }

    /// Feed one part, surfacing why it was refused.
    ///
    /// Returns `Ok(false)` if the decoder had already finished.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidPart` if the part is rejected, or the
    /// terminal `DecodeError::InvalidChecksum` if this part completed a
    /// message whose checksum does not match.
    pub fn try_receive_part(&mut self, part: &Part) -> Result<bool, DecodeError> {
        let accepted = self
            .accept(part)
            .map_err(|reason| DecodeError::InvalidPart { reason })?;
        if accepted {
            if let Some(Err(err)) = &self.result {
                return Err(err.clone());
            }
        }
        Ok(accepted)
    }

    fn accept(&mut self, part: &Part) -> Result<bool, RejectReason> {
        if self.result.is_some() {
            return Ok(false);
        }

        if let Err(reason) = self.validate(part) {
            self.rejected_parts += 1;
            tracing::debug!(seq_num = part.seq_num(), %reason, "Rejected fountain part");
            if let Some(callback) = self.on_rejected.as_mut() {
                callback(part, reason);
            }
            return Err(reason);
        }

        let indexes = self
            .chooser
            .as_ref()
            .map(|chooser| chooser.choose(part.seq_num()))
            .unwrap_or_default();
        self.last_part_indexes.clone_from(&indexes);
        self.queue.push_back(Pending {
            indexes,
            data: part.data().to_vec(),
        });

        while self.result.is_none() {
            let Some(pending) = self.queue.pop_front() else {
                break;
            };
            if pending.simple_index().is_some() {
                self.process_simple(pending);
            } else {
                self.process_mixed(pending);
            }
        }

        self.processed_parts += 1;
        if self.result.is_some() {
            self.simple_parts.clear();
            self.mixed_parts.clear();
            self.queue.clear();
        }
        Ok(true)
    }

    fn validate(&mut self, part: &Part) -> Result<(), RejectReason> {
        if part.seq_num() == 0 {
            return Err(RejectReason::ZeroSeqNum);
        }
        if part.seq_len() == 0 {
            return Err(RejectReason::ZeroSeqLen);
        }
        if part.data().is_empty() {
            return Err(RejectReason::EmptyFragment);
        }

        if let Some(session) = self.session {
            if part.seq_len() != session.seq_len {
                return Err(RejectReason::SeqLenMismatch {
                    expected: session.seq_len,
                    got: part.seq_len(),
                });
            }
            if part.message_len() != session.message_len {
                return Err(RejectReason::MessageLenMismatch {
                    expected: session.message_len,
                    got: part.message_len(),
                });
            }
            if part.checksum() != session.checksum {
                return Err(RejectReason::ChecksumMismatch {
                    expected: session.checksum,
                    got: part.checksum(),
                });
            }
            if part.data().len() != session.fragment_len {
                return Err(RejectReason::FragmentLenMismatch {
                    expected: session.fragment_len,
                    got: part.data().len(),
                });
            }
            return Ok(());
        }

        if part.seq_len() > self.config.max_seq_len {
            return Err(RejectReason::SeqLenTooLarge {
                seq_len: part.seq_len(),
                limit: self.config.max_seq_len,
            });
        }
        if part.message_len() > self.config.max_message_len {
            return Err(RejectReason::MessageTooLarge {
                message_len: part.message_len(),
                limit: self.config.max_message_len,
            });
        }

        let fragment_len = part.data().len();
        let capacity = part.seq_len().checked_mul(fragment_len);
        let lower = (part.seq_len() - 1).checked_mul(fragment_len);
        let fits = matches!(
            (lower, capacity),
            (Some(lower), Some(capacity))
                if part.message_len() > lower && part.message_len() <= capacity
        );
        if !fits {
            return Err(RejectReason::MessageLenInconsistent {
                message_len: part.message_len(),
                seq_len: part.seq_len(),
                fragment_len,
            });
        }

        let chooser = FragmentChooser::new(part.seq_len(), part.checksum())
            .map_err(|_| RejectReason::ZeroSeqLen)?;
        self.chooser = Some(chooser);
        self.session = Some(Session {
            seq_len: part.seq_len(),
            message_len: part.message_len(),
            checksum: part.checksum(),
            fragment_len,
        });
        tracing::debug!(
            seq_len = part.seq_len(),
            message_len = part.message_len(),
            checksum = part.checksum(),
            fragment_len,
            "Fountain decoder session started"
        );
        Ok(())
    }

    fn process_simple(&mut self, pending: Pending) {
        let Some(index) = pending.simple_index() else {
            return;
        };
        if self.received_part_indexes.contains(&index) {
            return;
        }

        self.received_part_indexes.insert(index);
        self.simple_parts.insert(index, pending.data.clone());

        let Some(session) = self.session else {
            return;
        };
        if self.received_part_indexes.len() == session.seq_len {
            let fragments: Vec<&Vec<u8>> = self.simple_parts.values().collect();
            let message = join_fragments(&fragments, session.message_len);
            let actual = crc32(&message);
            if actual == session.checksum {
                tracing::debug!(
                    message_len = message.len(),
                    parts = self.processed_parts + 1,
                    "Fountain message reassembled"
                );
                self.result = Some(Ok(message));
            } else {
                tracing::warn!(
                    expected = session.checksum,
                    actual,
                    "Reassembled message failed checksum"
                );
                self.result = Some(Err(DecodeError::InvalidChecksum {
                    expected: session.checksum,
                    actual,
                }));
            }
        } else {
            self.reduce_mixed_by(&pending);
        }
    }

    fn process_mixed(&mut self, pending: Pending) {
        if self.mixed_parts.contains_key(&pending.indexes) {
            return;
        }

        let mut reduced = pending;
        for (&index, data) in &self.simple_parts {
            reduced = reduced.reduced_by(&BTreeSet::from([index]), data);
        }
        for (indexes, data) in &self.mixed_parts {
            reduced = reduced.reduced_by(indexes, data);
        }

        if reduced.simple_index().is_some() {
            self.queue.push_back(reduced);
        } else {
            self.reduce_mixed_by(&reduced);
            self.mixed_parts.insert(reduced.indexes, reduced.data);
        }
    }

    fn reduce_mixed_by(&mut self, by: &Pending) {
        let mixed = std::mem::take(&mut self.mixed_parts);
        for (indexes, data) in mixed {
            let reduced = Pending { indexes, data }.reduced_by(&by.indexes, &by.data);
            if reduced.simple_index().is_some() {
                self.queue.push_back(reduced);
            } else {
                self.mixed_parts.insert(reduced.indexes, reduced.data);
            }
        }
    }

    /// True once the decoder reached success or failure.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// True if the message was reassembled and verified.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.result, Some(Ok(_)))
    }

    /// True if reassembly failed its checksum.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.result, Some(Err(_)))
    }

    /// Terminal outcome, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&Result<Vec<u8>, DecodeError>> {
        self.result.as_ref()
    }

    /// The reassembled message after success.
    #[must_use]
    pub fn message(&self) -> Option<&[u8]> {
        match &self.result {
            Some(Ok(message)) => Some(message),
            _ => None,
        }
    }

    /// Consume the decoder, returning its terminal outcome.
    #[must_use]
    pub fn into_result(self) -> Option<Result<Vec<u8>, DecodeError>> {
        self.result
    }

    /// Fragment count announced by the first accepted part.
    #[must_use]
    pub fn expected_part_count(&self) -> Option<usize> {
        self.session.map(|s| s.seq_len)
    }

    /// Fragment indexes recovered so far.
    #[must_use]
    pub const fn received_part_indexes(&self) -> &BTreeSet<usize> {
        &self.received_part_indexes
    }

    /// Fragment indexes combined in the last accepted part.
    #[must_use]
    pub const fn last_part_indexes(&self) -> &BTreeSet<usize> {
        &self.last_part_indexes
    }

    /// Accepted parts, duplicates included.
    #[must_use]
    pub const fn processed_parts_count(&self) -> usize {
        self.processed_parts
    }

    /// Parts refused by validation.
    #[must_use]
    pub const fn rejected_parts_count(&self) -> usize {
        self.rejected_parts
    }

    /// Rough progress in `[0, 1]`.
    ///
    /// Assumes about 1.75 parts per fragment are needed; stays below 1 until
    /// the decoder completes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn estimated_percent_complete(&self) -> f64 {
        if self.is_complete() {
            return 1.0;
        }
        let Some(session) = self.session else {
            return 0.0;
        };
        let estimated = session.seq_len as f64 * 1.75;
        (self.processed_parts as f64 / estimated).min(0.99)
    }
}

impl fmt::Debug for FountainDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FountainDecoder")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("received_part_indexes", &self.received_part_indexes)
            .field("mixed_parts", &self.mixed_parts.len())
            .field("processed_parts", &self.processed_parts)
            .field("rejected_parts", &self.rejected_parts)
            .field("complete", &self.is_complete())
            .finish_non_exhaustive()
    }
}
