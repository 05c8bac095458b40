//! Test AES-GCM stage sealing and opening inside a channel buffer

use hex_literal::hex;
use tanktrust_cipher::{AesGcmStage, CipherError, FRAME_OVERHEAD, KEY_LEN, NONCE_LEN};
use tanktrust_common::{Direction, StageError, StageKind, TAG_LEN, TransformStage};

const KEY: [u8; KEY_LEN] = hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");

fn run(
    stage: &AesGcmStage,
    direction: Direction,
    length: &mut usize,
    buffer: &mut [u8],
) -> Result<(), StageError> {
    let mut tag = [0u8; TAG_LEN];
    stage.apply(direction, length, buffer, &mut tag)
}

fn sealed(plaintext: &[u8]) -> (Vec<u8>, usize) {
    let stage = AesGcmStage::new(&KEY).unwrap();
    let mut buffer = vec![0u8; 256];
    buffer[..plaintext.len()].copy_from_slice(plaintext);
    let mut length = plaintext.len();
    run(&stage, Direction::Commit, &mut length, &mut buffer).unwrap();
    (buffer, length)
}

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let stage = AesGcmStage::new(&KEY).unwrap();
    assert_eq!(stage.kind(), StageKind::Encryption);

    let plaintext = b"Hello, World! This is a test message.";
    let (mut buffer, mut length) = sealed(plaintext);
    assert_eq!(length, plaintext.len() + FRAME_OVERHEAD);
    assert_ne!(&buffer[NONCE_LEN..NONCE_LEN + plaintext.len()], &plaintext[..]);

    run(&stage, Direction::Retrieve, &mut length, &mut buffer).unwrap();
    assert_eq!(&buffer[..length], &plaintext[..]);
}

#[test]
fn test_fresh_nonce_per_commit() {
    let (first, _) = sealed(b"same plaintext");
    let (second, _) = sealed(b"same plaintext");
    assert_ne!(&first[..NONCE_LEN], &second[..NONCE_LEN]);
}

#[test]
fn test_rejects_wrong_key_length() {
    let err = AesGcmStage::new(&[0u8; 16]).unwrap_err();
    assert_eq!(
        err,
        CipherError::InvalidKeyLength {
            expected: 32,
            actual: 16
        }
    );
    assert!(matches!(StageError::from(err), StageError::InvalidKey(_)));
}

#[test]
fn test_wrong_key_fails_decryption() {
    let (mut buffer, mut length) = sealed(b"secret payload");
    let other = AesGcmStage::new(&[0x42u8; KEY_LEN]).unwrap();
    let result = run(&other, Direction::Retrieve, &mut length, &mut buffer);
    assert!(matches!(result, Err(StageError::Cipher(_))));
}

#[test]
fn test_truncated_frame_rejected() {
    let stage = AesGcmStage::new(&KEY).unwrap();
    let mut buffer = vec![0u8; 64];
    let mut length = FRAME_OVERHEAD - 1;
    let result = run(&stage, Direction::Retrieve, &mut length, &mut buffer);
    assert_eq!(
        result,
        Err(StageError::Truncated {
            length: FRAME_OVERHEAD - 1,
            minimum: FRAME_OVERHEAD
        })
    );
}

#[test]
fn test_commit_without_headroom_exceeds_capacity() {
    let stage = AesGcmStage::new(&KEY).unwrap();
    let mut buffer = vec![7u8; 40];
    let mut length = 20;
    let result = run(&stage, Direction::Commit, &mut length, &mut buffer);
    assert_eq!(
        result,
        Err(StageError::CapacityExceeded {
            needed: 20 + FRAME_OVERHEAD,
            capacity: 40
        })
    );
    assert_eq!(length, 20);
}

#[test]
fn test_debug_redacts_key() {
    let stage = AesGcmStage::new(&KEY).unwrap();
    assert_eq!(format!("{stage:?}"), "AesGcmStage(REDACTED)");
}
