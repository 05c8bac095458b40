//! Channel registry: fixed, independently locked processing slots

use crate::reference::ReferenceRecord;
use crate::{PipelineError, Result};
use parking_lot::{Mutex, MutexGuard};
use zeroize::Zeroize;

/// One processing slot: a reference record and a fixed-capacity buffer
pub struct Channel {
    pub(crate) record: ReferenceRecord,
    pub(crate) buffer: Box<[u8]>,
}

impl Channel {
    fn new(capacity: usize) -> Self {
        Self {
            record: ReferenceRecord::default(),
            buffer: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Buffer capacity in bytes
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Overwrite record and buffer with zeros
    pub(crate) fn wipe(&mut self) {
        self.record.zeroize();
        self.buffer.zeroize();
    }

    fn snapshot(&self) -> ChannelSnapshot {
        let meaningful = usize::try_from(self.record.length)
            .unwrap_or(usize::MAX)
            .min(self.buffer.len());
        ChannelSnapshot {
            record: self.record,
            payload: self.buffer[..meaningful].to_vec(),
        }
    }
}

impl core::fmt::Debug for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Channel")
            .field("length", &self.record.length)
            .field("capacity", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

/// Copy of a channel's stored state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelSnapshot {
    /// Stored reference record
    pub record: ReferenceRecord,
    /// The first `record.length` buffer bytes
    pub payload: Vec<u8>,
}

/// Every channel, allocated once, each behind its own lock
///
/// Invocations on different channels never contend; invocations on the same
/// channel serialise on its lock.
#[derive(Debug)]
pub struct ChannelRegistry {
    channels: Box<[Mutex<Channel>]>,
    capacity: usize,
}

impl ChannelRegistry {
    /// Allocate `count` channels of `capacity` bytes each
    #[must_use]
    pub fn new(count: usize, capacity: usize) -> Self {
        let channels = (0..count)
            .map(|_| Mutex::new(Channel::new(capacity)))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { channels, capacity }
    }

    /// Number of channels
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether the registry has no channels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Per-channel buffer capacity
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lock channel `index` for exclusive use
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidChannel` for an out-of-range index.
    pub fn lock(&self, index: usize) -> Result<MutexGuard<'_, Channel>> {
        self.channels
            .get(index)
            .map(Mutex::lock)
            .ok_or(PipelineError::InvalidChannel {
                index,
                count: self.channels.len(),
            })
    }

    /// Copy of channel `index`'s stored record and meaningful bytes
    #[must_use]
    pub fn snapshot(&self, index: usize) -> Option<ChannelSnapshot> {
        self.channels.get(index).map(|slot| slot.lock().snapshot())
    }
}
