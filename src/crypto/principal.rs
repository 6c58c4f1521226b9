use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

pub const PRINCIPAL_SIZE: usize = 32;

/// An external identity capable of invoking entry points, represented by its
/// 32-byte public-key-derived address. The governor never inspects the bytes;
/// equality is all that matters for authorization.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct Principal([u8; PRINCIPAL_SIZE]);

impl Principal {
    pub const fn new(bytes: [u8; PRINCIPAL_SIZE]) -> Self {
        Principal(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        let bytes: [u8; PRINCIPAL_SIZE] =
            bytes.try_into().map_err(|_| "Invalid principal length")?;
        Ok(Principal(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PRINCIPAL_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Principal {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| "Invalid hex string")?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for Principal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'a> Deserialize<'a> for Principal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let hex = String::deserialize(deserializer)?;
        let decoded_hex = hex::decode(hex).map_err(SerdeError::custom)?;
        Principal::from_bytes(&decoded_hex).map_err(SerdeError::custom)
    }
}

impl AsRef<[u8]> for Principal {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", &self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_from_bytes_rejects_wrong_length() {
        assert!(Principal::from_bytes(&[1u8; 31]).is_err());
        assert!(Principal::from_bytes(&[1u8; 32]).is_ok());
    }

    #[test]
    fn principal_serde_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let p = Principal::new([7u8; 32]);
        let data = serde_json::to_vec(&p)?;
        let decoded: Principal = serde_json::from_slice(&data)?;
        assert_eq!(p, decoded);
        Ok(())
    }
}
