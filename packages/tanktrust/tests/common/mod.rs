//! Instrumented stub stages shared by the pipeline tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tanktrust::{
    Direction, Pipeline, PipelineConfig, StageError, StageKind, TAG_LEN, TransformStage,
};

/// Width of the stub tag written into the record's hmac region
pub const STUB_TAG_LEN: usize = 4;

/// Records every stage invocation in call order
#[derive(Debug, Clone, Default)]
pub struct CallTracker {
    calls: Arc<Mutex<Vec<(StageKind, Direction)>>>,
}

impl CallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, kind: StageKind, direction: Direction) {
        self.calls
            .lock()
            .expect("Mutex poisoned - test infrastructure failure")
            .push((kind, direction));
    }

    pub fn kinds(&self) -> Vec<StageKind> {
        self.calls
            .lock()
            .expect("Mutex poisoned - test infrastructure failure")
            .iter()
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn calls(&self) -> Vec<(StageKind, Direction)> {
        self.calls
            .lock()
            .expect("Mutex poisoned - test infrastructure failure")
            .clone()
    }

    pub fn clear(&self) {
        self.calls
            .lock()
            .expect("Mutex poisoned - test infrastructure failure")
            .clear();
    }
}

/// Compression stub: commit keeps every other byte, retrieve doubles each byte
///
/// Only inverts correctly for payloads made of equal byte pairs.
pub struct HalvingStub {
    pub tracker: CallTracker,
}

impl TransformStage for HalvingStub {
    fn kind(&self) -> StageKind {
        StageKind::Compression
    }

    fn apply(
        &self,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
        _tag: &mut [u8; TAG_LEN],
    ) -> Result<(), StageError> {
        self.tracker.record(self.kind(), direction);
        match direction {
            Direction::Commit => {
                let half = *length / 2;
                for i in 0..half {
                    buffer[i] = buffer[2 * i];
                }
                *length = half;
            }
            Direction::Retrieve => {
                let doubled = *length * 2;
                StageError::check_capacity(doubled, buffer.len())?;
                for i in (0..*length).rev() {
                    buffer[2 * i] = buffer[i];
                    buffer[2 * i + 1] = buffer[i];
                }
                *length = doubled;
            }
        }
        Ok(())
    }
}

/// Encryption stub: XOR every valid byte with `0xFF`
pub struct XorStub {
    pub tracker: CallTracker,
}

impl TransformStage for XorStub {
    fn kind(&self) -> StageKind {
        StageKind::Encryption
    }

    fn apply(
        &self,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
        _tag: &mut [u8; TAG_LEN],
    ) -> Result<(), StageError> {
        self.tracker.record(self.kind(), direction);
        for byte in &mut buffer[..*length] {
            *byte ^= 0xFF;
        }
        Ok(())
    }
}

/// The 4-byte tag the authentication stub derives from `data`
pub fn stub_tag(data: &[u8]) -> [u8; STUB_TAG_LEN] {
    let xor = data.iter().fold(0u8, |acc, b| acc ^ b);
    let sum = data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    [xor, sum, data.len() as u8, 0xA5]
}

/// Authentication stub: writes `stub_tag` on commit, checks it on retrieve
pub struct TagStub {
    pub tracker: CallTracker,
}

impl TransformStage for TagStub {
    fn kind(&self) -> StageKind {
        StageKind::Authentication
    }

    fn apply(
        &self,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
        tag: &mut [u8; TAG_LEN],
    ) -> Result<(), StageError> {
        self.tracker.record(self.kind(), direction);
        let expected = stub_tag(&buffer[..*length]);
        match direction {
            Direction::Commit => tag[..STUB_TAG_LEN].copy_from_slice(&expected),
            Direction::Retrieve => {
                if tag[..STUB_TAG_LEN] != expected {
                    return Err(StageError::TagMismatch);
                }
            }
        }
        Ok(())
    }
}

/// Stage that records its call and then fails in `fail_on`, succeeding otherwise
pub struct FailingStub {
    pub kind: StageKind,
    pub fail_on: Direction,
    pub tracker: CallTracker,
}

impl TransformStage for FailingStub {
    fn kind(&self) -> StageKind {
        self.kind
    }

    fn apply(
        &self,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
        _tag: &mut [u8; TAG_LEN],
    ) -> Result<(), StageError> {
        self.tracker.record(self.kind, direction);
        // Scribble over the buffer so a leaked partial result would be visible
        for byte in &mut buffer[..*length] {
            *byte = 0xEE;
        }
        if direction == self.fail_on {
            return Err(StageError::injected(format!("{} stub", self.kind)));
        }
        Ok(())
    }
}

/// Config with small channels for tests
pub fn small_config(channel_count: usize, buffer_capacity: usize) -> PipelineConfig {
    PipelineConfig {
        channel_count,
        buffer_capacity,
        ..PipelineConfig::default()
    }
}

/// Pipeline wired with the halving, XOR and tag stubs
pub fn stub_pipeline(config: PipelineConfig, tracker: &CallTracker) -> Pipeline {
    Pipeline::builder(config)
        .compression(HalvingStub {
            tracker: tracker.clone(),
        })
        .encryption(XorStub {
            tracker: tracker.clone(),
        })
        .authentication(TagStub {
            tracker: tracker.clone(),
        })
        .build()
        .expect("stub pipeline should build")
}

/// Stub pipeline with `kind` replaced by a stage that fails in `fail_on`
pub fn failing_pipeline(
    config: PipelineConfig,
    tracker: &CallTracker,
    kind: StageKind,
    fail_on: Direction,
) -> Pipeline {
    let failing = FailingStub {
        kind,
        fail_on,
        tracker: tracker.clone(),
    };
    let builder = Pipeline::builder(config)
        .compression(HalvingStub {
            tracker: tracker.clone(),
        })
        .encryption(XorStub {
            tracker: tracker.clone(),
        })
        .authentication(TagStub {
            tracker: tracker.clone(),
        });
    let builder = match kind {
        StageKind::Compression => builder.compression(failing),
        StageKind::Encryption => builder.encryption(failing),
        StageKind::Authentication => builder.authentication(failing),
    };
    builder.build().expect("failing pipeline should build")
}

/// Deterministic pseudo-random bytes (xorshift), incompressible in practice
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}
