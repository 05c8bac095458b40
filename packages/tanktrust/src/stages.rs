//! Builder shortcuts for the bundled stage implementations

use crate::config::ConfigError;
use crate::pipeline::PipelineBuilder;
use tanktrust_common::StageError;

impl PipelineBuilder {
    /// Install zstd compression at the configured level
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Stage` if the level is rejected.
    #[cfg(feature = "zstd")]
    pub fn with_zstd_compression(self) -> Result<Self, ConfigError> {
        let stage = tanktrust_compression::ZstdStage::new(self.config().compression_level)
            .map_err(StageError::from)?;
        Ok(self.compression(stage))
    }

    /// Install AES-256-GCM encryption under `key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Stage` if `key` is not 32 bytes.
    #[cfg(feature = "aes")]
    pub fn with_aes_encryption(self, key: &[u8]) -> Result<Self, ConfigError> {
        let stage = tanktrust_cipher::AesGcmStage::new(key).map_err(StageError::from)?;
        Ok(self.encryption(stage))
    }

    /// Install HMAC-SHA256 authentication under `key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Stage` if `key` is shorter than 32 bytes.
    #[cfg(feature = "hmac")]
    pub fn with_hmac_authentication(self, key: &[u8]) -> Result<Self, ConfigError> {
        let stage = tanktrust_hashing::HmacStage::new(key).map_err(StageError::from)?;
        Ok(self.authentication(stage))
    }

    /// Install all three bundled stages
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Stage` if either key is rejected.
    #[cfg(all(feature = "zstd", feature = "aes", feature = "hmac"))]
    pub fn with_standard_stages(
        self,
        cipher_key: &[u8],
        mac_key: &[u8],
    ) -> Result<Self, ConfigError> {
        self.with_zstd_compression()?
            .with_aes_encryption(cipher_key)?
            .with_hmac_authentication(mac_key)
    }
}
