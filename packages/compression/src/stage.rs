//! Compression capability for the tanktrust pipeline

use crate::zstd::{Workspace, validate_level};
use parking_lot::Mutex;
use tanktrust_common::{Direction, StageError, StageKind, TAG_LEN, TransformStage};

/// Default zstd level, a balance of speed and ratio
pub const DEFAULT_LEVEL: i32 = 3;

/// Zstd stage operating in place on a channel buffer
///
/// Idle workspaces are pooled, one per concurrent caller at most, so
/// steady-state calls reuse contexts and output buffers.
pub struct ZstdStage {
    level: i32,
    idle: Mutex<Vec<Workspace>>,
}

impl core::fmt::Debug for ZstdStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ZstdStage")
            .field("level", &self.level)
            .field("idle_workspaces", &self.idle_workspaces())
            .finish()
    }
}

impl ZstdStage {
    /// Build a stage compressing at `level`
    ///
    /// # Errors
    /// Returns `CompressionError::InvalidLevel` if `level` is outside 1-22
    pub fn new(level: i32) -> crate::Result<Self> {
        Ok(Self {
            level: validate_level(level)?,
            idle: Mutex::new(Vec::new()),
        })
    }

    /// Configured compression level
    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Number of pooled workspaces waiting for reuse
    #[must_use]
    pub fn idle_workspaces(&self) -> usize {
        self.idle.lock().len()
    }

    fn checkout(&self) -> crate::Result<Workspace> {
        match self.idle.lock().pop() {
            Some(workspace) => Ok(workspace),
            None => Workspace::new(self.level),
        }
    }

    fn transform(
        workspace: &mut Workspace,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
    ) -> tanktrust_common::Result<()> {
        let capacity = buffer.len();
        StageError::check_capacity(*length, capacity)?;

        let output = match direction {
            Direction::Commit => workspace.compress(&buffer[..*length])?,
            Direction::Retrieve => workspace.decompress_bounded(&buffer[..*length], capacity)?,
        };
        StageError::check_capacity(output.len(), capacity)?;

        tracing::debug!(
            %direction,
            input = *length,
            output = output.len(),
            "zstd stage complete"
        );

        buffer[..output.len()].copy_from_slice(output);
        *length = output.len();
        Ok(())
    }
}

impl Default for ZstdStage {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            idle: Mutex::new(Vec::new()),
        }
    }
}

impl TransformStage for ZstdStage {
    fn kind(&self) -> StageKind {
        StageKind::Compression
    }

    fn apply(
        &self,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
        _tag: &mut [u8; TAG_LEN],
    ) -> tanktrust_common::Result<()> {
        let mut workspace = self.checkout()?;
        let result = Self::transform(&mut workspace, direction, length, buffer);
        workspace.wipe();
        self.idle.lock().push(workspace);
        result
    }
}
