use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! byte_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Vec<u8>);

        impl $name {
            pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
                Self(bytes.into())
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn into_bytes(self) -> Vec<u8> {
                self.0
            }

            /// Lossy UTF-8 rendering, for display only
            pub fn to_string_lossy(&self) -> String {
                String::from_utf8_lossy(&self.0).into_owned()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.to_string_lossy())
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }
        }

        impl From<&[u8]> for $name {
            fn from(bytes: &[u8]) -> Self {
                Self(bytes.to_vec())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.as_bytes().to_vec())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into_bytes())
            }
        }
    };
}

byte_handle!(
    /// Address of a single loop instance's state.
    ///
    /// Each run focuses on one identity, fixed for the run's lifetime. The
    /// loop never looks inside it; it only hands it to the retriever and
    /// the storer.
    StateIdentity
);

byte_handle!(
    /// Persistable snapshot of a loop's context.
    ///
    /// Produced by a [`Retriever`](crate::Retriever) or an
    /// [`Interpreter`](crate::Interpreter), consumed by the describer,
    /// interpreter and storer. Replaced each turn, never mutated.
    SerializedState
);
