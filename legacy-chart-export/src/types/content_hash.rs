use crate::prelude::*;
use sha2::{ Digest, Sha256 };

/// sha256 digest of an exported archive entry
///
/// Note that this item is serialized and deserialized as a string, in the usual lowercase hex format
#[derive(Copy, Clone, Eq, Default, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from="String", into="String")]
pub struct ContentHash([u8; 32]);
impl ContentHash {
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }
}

impl TryFrom<&str> for ContentHash {
    type Error = ContentHashParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if !s.is_ascii() || s.len() != 64 { return Err(ContentHashParseError::Length(s.len())) }

        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)?;
        }
        Ok(Self(bytes))
    }
}
impl TryFrom<String> for ContentHash {
    type Error = ContentHashParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.to_string()
    }
}

impl AsRef<[u8]> for ContentHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
impl std::fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentHash({self})")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentHashParseError {
    #[error("expected 64 hex characters, got {0} bytes")]
    Length(usize),
    #[error("invalid hex digit: {0}")]
    Digit(#[from] std::num::ParseIntError),
}

#[test]
fn content_hash_test() {
    // sha256("abc")
    let hash = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad".to_owned();
    let parsed: ContentHash = hash.clone().try_into().unwrap();

    assert_eq!(ContentHash::of(b"abc"), parsed);
    assert_eq!(parsed.to_string(), hash);
    assert_eq!(serde_json::to_string(&parsed).unwrap(), format!("\"{hash}\""));
}

#[test]
fn content_hash_rejects_garbage() {
    assert_eq!(ContentHash::try_from("abc"), Err(ContentHashParseError::Length(3)));
    assert!(matches!(ContentHash::try_from("zz".repeat(32)), Err(ContentHashParseError::Digit(_))));
}
