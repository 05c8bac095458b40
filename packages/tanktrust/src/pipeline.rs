//! The pipeline orchestrator
//!
//! One call to [`Pipeline::process_channel`]:
//! 1. locks the addressed channel,
//! 2. copies the reference record in and validates its declared length,
//! 3. copies exactly that many payload bytes into the channel buffer,
//! 4. runs the stage table for the direction, stopping at the first failure,
//! 5. copies buffer and record out, replacing the caller's frame only if
//!    every step succeeded.

use crate::boundary::{DirectCopy, ExternalFrame, TrustBoundary};
use crate::channel::{Channel, ChannelRegistry, ChannelSnapshot};
use crate::config::{ConfigError, PipelineConfig};
use crate::reference::{REFERENCE_RECORD_LEN, ReferenceBytes, ReferenceRecord};
use crate::{PipelineError, Result};
use std::sync::Arc;
use tanktrust_common::{Direction, LoggingTransformer, StageError, StageKind, TransformStage};

/// Stage order for outbound data: compress plaintext, encrypt, then MAC the ciphertext
pub const COMMIT_ORDER: [StageKind; 3] = [
    StageKind::Compression,
    StageKind::Encryption,
    StageKind::Authentication,
];

/// Stage order for inbound data: verify the MAC before decrypting or decompressing
pub const RETRIEVE_ORDER: [StageKind; 3] = [
    StageKind::Authentication,
    StageKind::Encryption,
    StageKind::Compression,
];

/// Largest length the record's `u32` field can carry
const MAX_RECORD_LENGTH: usize = u32::MAX as usize;

/// The stage table for `direction`
#[must_use]
pub fn stage_order(direction: Direction) -> &'static [StageKind; 3] {
    match direction {
        Direction::Commit => &COMMIT_ORDER,
        Direction::Retrieve => &RETRIEVE_ORDER,
    }
}

struct StageSet {
    compression: Arc<dyn TransformStage>,
    encryption: Arc<dyn TransformStage>,
    authentication: Arc<dyn TransformStage>,
}

impl StageSet {
    fn get(&self, kind: StageKind) -> &dyn TransformStage {
        match kind {
            StageKind::Compression => self.compression.as_ref(),
            StageKind::Encryption => self.encryption.as_ref(),
            StageKind::Authentication => self.authentication.as_ref(),
        }
    }
}

/// Channel registry plus the three stages and the boundary they sit behind
pub struct Pipeline {
    registry: ChannelRegistry,
    stages: StageSet,
    boundary: Arc<dyn TrustBoundary>,
}

impl core::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pipeline")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Start building a pipeline sized by `config`
    #[must_use]
    pub fn builder(config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    /// Number of channels
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.registry.len()
    }

    /// Per-channel buffer capacity
    #[must_use]
    pub fn buffer_capacity(&self) -> usize {
        self.registry.capacity()
    }

    /// Copy of channel `index`'s stored record and meaningful bytes
    #[must_use]
    pub fn snapshot(&self, index: usize) -> Option<ChannelSnapshot> {
        self.registry.snapshot(index)
    }

    /// Entry point taking the raw channel id and operation code
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidOperation` for an unknown opcode,
    /// otherwise as [`Pipeline::process_channel`].
    pub fn dispatch(&self, channel: u8, opcode: u8, frame: &mut ExternalFrame) -> Result<()> {
        let direction =
            Direction::from_opcode(opcode).ok_or(PipelineError::InvalidOperation(opcode))?;
        self.process_channel(usize::from(channel), direction, frame)
    }

    /// Run `frame` through channel `index` in `direction`
    ///
    /// On success `frame` holds the transformed payload and the updated
    /// record. On any error `frame` is left exactly as supplied.
    ///
    /// # Errors
    ///
    /// - `InvalidChannel` if `index` addresses no channel
    /// - `InvalidLength` if the declared length is zero, over capacity, or
    ///   longer than `frame.payload`
    /// - `CompressionFailed`, `EncryptionFailed`, `AuthenticationFailed`
    ///   naming the first stage that failed
    /// - `BoundaryFault` if a copy across the boundary faulted
    pub fn process_channel(
        &self,
        index: usize,
        direction: Direction,
        frame: &mut ExternalFrame,
    ) -> Result<()> {
        let mut channel = self.registry.lock(index)?;

        let mut staged: ReferenceBytes = [0u8; REFERENCE_RECORD_LEN];
        self.boundary.copy_in(&frame.reference, &mut staged)?;
        let record = ReferenceRecord::decode(&staged);
        let length = Self::admit(index, &record, frame.payload.len(), channel.capacity())?;

        match self.run(index, direction, &mut channel, record, &frame.payload[..length]) {
            Ok((reference, payload)) => {
                frame.reference = reference;
                frame.payload = payload;
                tracing::debug!(
                    channel = index,
                    %direction,
                    length = frame.payload.len(),
                    "pipeline complete"
                );
                Ok(())
            }
            Err(err) => {
                channel.wipe();
                Err(err)
            }
        }
    }

    fn admit(
        index: usize,
        record: &ReferenceRecord,
        supplied: usize,
        capacity: usize,
    ) -> Result<usize> {
        let limit = capacity.min(supplied);
        record.validated_length(limit).inspect_err(|_| {
            tracing::warn!(
                channel = index,
                declared = record.length,
                capacity,
                supplied,
                "Invalid length"
            );
        })
    }

    fn run(
        &self,
        index: usize,
        direction: Direction,
        channel: &mut Channel,
        record: ReferenceRecord,
        input: &[u8],
    ) -> Result<(ReferenceBytes, Vec<u8>)> {
        let mut length = input.len();
        self.boundary.copy_in(input, &mut channel.buffer[..length])?;
        channel.record = record;

        let Channel { record, buffer } = channel;
        let limit = buffer.len().min(MAX_RECORD_LENGTH);

        for &kind in stage_order(direction) {
            tracing::debug!(channel = index, stage = %kind, %direction, length, "running stage");
            self.stages
                .get(kind)
                .apply(direction, &mut length, &mut buffer[..], &mut record.hmac)
                .and_then(|()| StageError::check_capacity(length, limit))
                .map_err(|err| {
                    LoggingTransformer::log_stage_failure(index, kind, direction, &err);
                    PipelineError::stage_failed(kind, err)
                })?;
        }
        // Bounded by `limit` after every stage
        record.length = u32::try_from(length).unwrap_or(u32::MAX);

        let mut payload = vec![0u8; length];
        self.boundary.copy_out(&buffer[..length], &mut payload)?;
        let mut reference: ReferenceBytes = [0u8; REFERENCE_RECORD_LEN];
        self.boundary.copy_out(&record.encode(), &mut reference)?;
        Ok((reference, payload))
    }
}

/// Assembles a [`Pipeline`] from a config, three stages and a boundary
pub struct PipelineBuilder {
    config: PipelineConfig,
    compression: Option<Arc<dyn TransformStage>>,
    encryption: Option<Arc<dyn TransformStage>>,
    authentication: Option<Arc<dyn TransformStage>>,
    boundary: Arc<dyn TrustBoundary>,
}

impl core::fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let installed = |slot: &Option<Arc<dyn TransformStage>>| slot.is_some();
        f.debug_struct("PipelineBuilder")
            .field("config", &self.config)
            .field("compression", &installed(&self.compression))
            .field("encryption", &installed(&self.encryption))
            .field("authentication", &installed(&self.authentication))
            .finish_non_exhaustive()
    }
}

impl PipelineBuilder {
    fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            compression: None,
            encryption: None,
            authentication: None,
            boundary: Arc::new(DirectCopy),
        }
    }

    /// The configuration this builder sizes the registry from
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Install the compression stage
    #[must_use]
    pub fn compression(mut self, stage: impl TransformStage + 'static) -> Self {
        self.compression = Some(Arc::new(stage));
        self
    }

    /// Install the encryption stage
    #[must_use]
    pub fn encryption(mut self, stage: impl TransformStage + 'static) -> Self {
        self.encryption = Some(Arc::new(stage));
        self
    }

    /// Install the authentication stage
    #[must_use]
    pub fn authentication(mut self, stage: impl TransformStage + 'static) -> Self {
        self.authentication = Some(Arc::new(stage));
        self
    }

    /// Replace the default in-process boundary
    #[must_use]
    pub fn boundary(mut self, boundary: impl TrustBoundary + 'static) -> Self {
        self.boundary = Arc::new(boundary);
        self
    }

    /// Validate the config and stages, then allocate every channel
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for an out-of-range config,
    /// `ConfigError::MissingStage` for an empty slot and
    /// `ConfigError::StageKindMismatch` for a stage in the wrong slot.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigError> {
        self.config.validate()?;
        let stages = StageSet {
            compression: Self::slot(StageKind::Compression, self.compression)?,
            encryption: Self::slot(StageKind::Encryption, self.encryption)?,
            authentication: Self::slot(StageKind::Authentication, self.authentication)?,
        };
        let registry = ChannelRegistry::new(self.config.channel_count, self.config.buffer_capacity);
        tracing::info!(
            channels = registry.len(),
            capacity = registry.capacity(),
            storage_bytes = self.config.storage_bytes(),
            "pipeline ready"
        );
        Ok(Pipeline {
            registry,
            stages,
            boundary: self.boundary,
        })
    }

    fn slot(
        slot: StageKind,
        stage: Option<Arc<dyn TransformStage>>,
    ) -> std::result::Result<Arc<dyn TransformStage>, ConfigError> {
        let stage = stage.ok_or(ConfigError::MissingStage(slot))?;
        let actual = stage.kind();
        if actual != slot {
            return Err(ConfigError::StageKindMismatch { slot, actual });
        }
        Ok(stage)
    }
}
