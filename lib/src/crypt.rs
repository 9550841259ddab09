//! AES-256-GCM per-value encryption, key lifecycle, and bulk secret loading.

use aes_gcm::Aes256Gcm;
use aes_gcm::KeyInit as _;
use aes_gcm::Nonce;
use aes_gcm::aead::Aead as _;
use aes_gcm::aead::OsRng;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore as _;
use zeroize::Zeroizing;

use crate::error::CryptError;
use crate::error::Error;
use crate::error::Result;
use crate::keystore::Keystore;
use crate::keystore::project_key_entry;
use crate::model::Secret;
use crate::repo::Repo;
use crate::repo::read_json;
use crate::secrets::SecretMap;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Encrypts `plaintext` under `key`, returning `(ciphertext_b64, nonce_b64)`.
pub fn encrypt(key: &[u8], plaintext: &str) -> Result<(String, String)> {
    let cipher = build_cipher(key)?;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| CryptError::DecryptionFailed)?;
    Ok((BASE64.encode(ciphertext), BASE64.encode(nonce_bytes)))
}

/// Decrypts a ciphertext/nonce pair produced by [`encrypt`].
pub fn decrypt(key: &[u8], ciphertext_b64: &str, nonce_b64: &str) -> Result<String> {
    let cipher = build_cipher(key)?;
    let ciphertext = BASE64
        .decode(ciphertext_b64)
        .map_err(|_| CryptError::MalformedCiphertext)?;
    let nonce_bytes = BASE64
        .decode(nonce_b64)
        .map_err(|_| CryptError::MalformedCiphertext)?;
    if nonce_bytes.len() != NONCE_LEN {
        return Err(CryptError::MalformedCiphertext.into());
    }
    let nonce = Nonce::from_slice(&nonce_bytes);
    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| CryptError::DecryptionFailed)?;
    String::from_utf8(plaintext).map_err(|_| CryptError::DecryptionFailed.into())
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != KEY_LEN {
        return Err(CryptError::KeyWrongLength(key.len()).into());
    }
    Ok(Aes256Gcm::new_from_slice(key).expect("key length checked above"))
}

/// Generates 32 cryptographically random bytes, base64-encoded.
pub fn generate_key() -> String {
    let mut bytes = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// Persists an already-encoded key under the project's key-store entry.
pub fn save_key(keystore: &impl Keystore, project_id: &uuid::Uuid, encoded_key: &str) -> Result<()> {
    keystore
        .set_raw(&project_key_entry(project_id), encoded_key)
        .map_err(Error::from)
}

/// Retrieves and base64-decodes the project key, erroring if its decoded
/// length isn't 32 bytes. Wrapped in [`Zeroizing`] so the key material is
/// wiped from memory as soon as the last holder drops it.
pub fn load_key(keystore: &impl Keystore, project_id: &uuid::Uuid) -> Result<Zeroizing<Vec<u8>>> {
    let encoded = keystore
        .get_raw(&project_key_entry(project_id))
        .map_err(Error::from)?;
    let bytes = BASE64.decode(encoded).map_err(|_| CryptError::MalformedCiphertext)?;
    if bytes.len() != KEY_LEN {
        return Err(CryptError::KeyWrongLength(bytes.len()).into());
    }
    Ok(Zeroizing::new(bytes))
}

/// Bulk-decrypts an environment's secret file into `key -> plaintext`.
/// `no_secret` entries pass through unchanged. The result must never be
/// persisted; it exists only for export and subprocess injection.
pub fn load_secrets(repo: &Repo, keystore: &impl Keystore, project_id: &uuid::Uuid, env: &str) -> Result<std::collections::BTreeMap<String, String>> {
    let key = load_key(keystore, project_id)?;
    let secrets: SecretMap = read_json(&repo.secrets_file(env)).map_err(Error::from)?;
    let mut out = std::collections::BTreeMap::new();
    for (name, secret) in secrets.0 {
        let plaintext = if secret.no_secret {
            secret.value.clone()
        } else {
            decrypt(&key, &secret.value, &secret.nonce)?
        };
        out.insert(name, plaintext);
    }
    Ok(out)
}

/// Encrypts a plaintext value into a ready-to-persist [`Secret`] fragment
/// (value + nonce only; callers fill in key/timestamps).
pub fn encrypt_for_storage(key: &[u8], plaintext: &str, no_secret: bool) -> Result<(String, String)> {
    if no_secret {
        Ok((plaintext.to_string(), String::new()))
    } else {
        encrypt(key, plaintext)
    }
}
