//! Tagged session values.
//!
//! Session state is heterogeneous, so every stored value carries its kind:
//! the variants below enumerate every shape the codec can represent.
//! Application-defined structs travel as [`RecordValue`] with a stable type
//! name; see [`crate::codec::register`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// A single value stored under a session key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Record(RecordValue),
}

/// An application-defined struct in its encoded form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordValue {
    /// Stable name identifying the Rust type of the payload.
    pub type_name: String,
    /// Binary encoding of the payload.
    pub bytes: Vec<u8>,
}

/// A structured type storable in a session.
///
/// Implementors must be registered with [`crate::codec::register`] before
/// any stored session containing them is decoded; decoding an unregistered
/// record type is an error, never silent data loss.
pub trait Record: Serialize + DeserializeOwned {
    /// Stable name identifying this type in the encoded stream. Renaming
    /// it invalidates previously persisted sessions holding this type.
    const TYPE_NAME: &'static str;
}

impl SessionValue {
    /// Wrap a record type for storage.
    pub fn record<T: Record>(value: &T) -> SessionResult<Self> {
        let bytes =
            bincode::serialize(value).map_err(|e| SessionError::Encode(e.to_string()))?;
        Ok(SessionValue::Record(RecordValue {
            type_name: T::TYPE_NAME.to_string(),
            bytes,
        }))
    }

    /// Recover a record previously wrapped with [`SessionValue::record`].
    pub fn as_record<T: Record>(&self) -> SessionResult<T> {
        match self {
            SessionValue::Record(record) if record.type_name == T::TYPE_NAME => {
                bincode::deserialize(&record.bytes)
                    .map_err(|e| SessionError::Decode(e.to_string()))
            }
            SessionValue::Record(record) => Err(SessionError::Decode(format!(
                "record holds `{}`, not `{}`",
                record.type_name,
                T::TYPE_NAME
            ))),
            other => Err(SessionError::Decode(format!(
                "value {:?} is not a record",
                other
            ))),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SessionValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            SessionValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SessionValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SessionValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for SessionValue {
    fn from(v: i64) -> Self {
        SessionValue::Int(v)
    }
}

impl From<i32> for SessionValue {
    fn from(v: i32) -> Self {
        SessionValue::Int(v as i64)
    }
}

impl From<f64> for SessionValue {
    fn from(v: f64) -> Self {
        SessionValue::Float(v)
    }
}

impl From<bool> for SessionValue {
    fn from(v: bool) -> Self {
        SessionValue::Bool(v)
    }
}

impl From<&str> for SessionValue {
    fn from(v: &str) -> Self {
        SessionValue::Text(v.to_string())
    }
}

impl From<String> for SessionValue {
    fn from(v: String) -> Self {
        SessionValue::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Account {
        id: u64,
        name: String,
        active: bool,
    }

    impl Record for Account {
        const TYPE_NAME: &'static str = "Account";
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(SessionValue::from(7), SessionValue::Int(7));
        assert_eq!(SessionValue::from(7i64), SessionValue::Int(7));
        assert_eq!(SessionValue::from(1.5), SessionValue::Float(1.5));
        assert_eq!(SessionValue::from(true), SessionValue::Bool(true));
        assert_eq!(SessionValue::from("hi"), SessionValue::Text("hi".into()));
    }

    #[test]
    fn test_record_round_trip() {
        let account = Account {
            id: 1001,
            name: "John Doe".into(),
            active: true,
        };

        let value = SessionValue::record(&account).unwrap();
        assert_eq!(value.as_record::<Account>().unwrap(), account);
    }

    #[test]
    fn test_as_record_on_wrong_kind() {
        let err = SessionValue::Int(3).as_record::<Account>().unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        let value = SessionValue::Text("hello".into());
        assert_eq!(value.as_str(), Some("hello"));
        assert_eq!(value.as_int(), None);
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_float(), None);
    }
}
