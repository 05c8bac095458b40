//! Tests for HMAC tag production and verification

use hex_literal::hex;
use tanktrust_common::{Direction, StageError, StageKind, TAG_LEN, TransformStage};
use tanktrust_hashing::{HashError, HmacStage, MIN_KEY_LEN, hmac_sha256};

const KEY: [u8; 32] = hex!("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b");

fn commit(stage: &HmacStage, payload: &[u8]) -> (Vec<u8>, [u8; TAG_LEN]) {
    let mut buffer = vec![0u8; 128];
    buffer[..payload.len()].copy_from_slice(payload);
    let mut length = payload.len();
    let mut tag = [0u8; TAG_LEN];
    stage
        .apply(Direction::Commit, &mut length, &mut buffer, &mut tag)
        .unwrap();
    assert_eq!(length, payload.len(), "authentication never resizes");
    (buffer, tag)
}

#[test]
fn test_commit_writes_tag_and_retrieve_verifies() {
    let stage = HmacStage::new(&KEY).unwrap();
    assert_eq!(stage.kind(), StageKind::Authentication);

    let (mut buffer, mut tag) = commit(&stage, b"ciphertext bytes");
    assert_ne!(tag, [0u8; TAG_LEN]);
    assert_eq!(tag, hmac_sha256::sign(&KEY, b"ciphertext bytes").unwrap());

    let before = buffer.clone();
    let mut length = 16;
    stage
        .apply(Direction::Retrieve, &mut length, &mut buffer, &mut tag)
        .unwrap();
    assert_eq!(buffer, before);
}

#[test]
fn test_tampered_payload_is_rejected() {
    let stage = HmacStage::new(&KEY).unwrap();
    let (mut buffer, mut tag) = commit(&stage, b"ciphertext bytes");
    buffer[3] ^= 0x01;

    let mut length = 16;
    let result = stage.apply(Direction::Retrieve, &mut length, &mut buffer, &mut tag);
    assert_eq!(result, Err(StageError::TagMismatch));
}

#[test]
fn test_tampered_tag_is_rejected() {
    let stage = HmacStage::new(&KEY).unwrap();
    let (mut buffer, mut tag) = commit(&stage, b"ciphertext bytes");
    tag[TAG_LEN - 1] ^= 0x80;

    let mut length = 16;
    let result = stage.apply(Direction::Retrieve, &mut length, &mut buffer, &mut tag);
    assert_eq!(result, Err(StageError::TagMismatch));
}

#[test]
fn test_tag_binds_length() {
    // A shorter declared length over the same bytes must not verify
    let stage = HmacStage::new(&KEY).unwrap();
    let (mut buffer, mut tag) = commit(&stage, b"ciphertext bytes");

    let mut length = 15;
    let result = stage.apply(Direction::Retrieve, &mut length, &mut buffer, &mut tag);
    assert_eq!(result, Err(StageError::TagMismatch));
}

#[test]
fn test_different_keys_yield_different_tags() {
    let a = HmacStage::new(&KEY).unwrap();
    let b = HmacStage::new(&[0x5cu8; 48]).unwrap();
    assert_ne!(commit(&a, b"payload").1, commit(&b, b"payload").1);
}

#[test]
fn test_short_key_rejected() {
    let err = HmacStage::new(&[1u8; 8]).unwrap_err();
    assert_eq!(
        err,
        HashError::InvalidMacKeyLength {
            expected: MIN_KEY_LEN,
            actual: 8
        }
    );
    assert!(matches!(StageError::from(err), StageError::InvalidKey(_)));
    assert_eq!(
        StageError::from(HashError::VerificationFailed),
        StageError::TagMismatch
    );
}
