//! Forward-compatible string enums
//!
//! Status and type fields are closed enums on our side but open sets on the
//! server's. [`wire_enum!`](crate::wire_enum) generates an enum with an
//! `Unrecognized(raw)` variant so a value introduced by a newer server never
//! fails decoding.

/// Canonical comparison form: lowercase, with `-` and spaces folded into `_`.
/// `create-in-progress`, `CREATE_IN_PROGRESS` and `Create In Progress`
/// compare equal.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Declare a string enum with an `Unrecognized(String)` catch-all.
///
/// Each variant names the spelling sent on the wire; decoding is lenient
/// about case and separators (see [`normalize`]).
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this client does not know about, kept verbatim
            Unrecognized(String),
        }

        impl $name {
            /// Wire spelling
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Unrecognized(raw) => raw.as_str(),
                }
            }

            pub fn from_wire(raw: &str) -> Self {
                let wanted = $crate::resource::wire_enum::normalize(raw);
                $(
                    if wanted == $crate::resource::wire_enum::normalize($wire) {
                        return $name::$variant;
                    }
                )+
                $name::Unrecognized(raw.to_string())
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, $name::Unrecognized(_))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                Ok(Self::from_wire(s))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_wire(&raw))
            }
        }
    };
}
