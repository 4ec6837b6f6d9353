//! Helper macro for port error enums whose variants carry one text field.

/// Declare a `thiserror` enum where every variant holds a single `String`
/// field, plus one snake-case constructor per variant accepting
/// `impl Into<String>` and a `message()` accessor over all variants.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $field:ident : String } => $format:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($format)]
                $variant {
                    /// Underlying cause, suitable for logs.
                    $field: String,
                },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    /// Construct this variant from any string-like cause.
                    pub fn [<$variant:snake>]($field: impl Into<String>) -> Self {
                        Self::$variant {
                            $field: $field.into(),
                        }
                    }
                }
            )*

            /// Underlying cause carried by every variant.
            pub fn message(&self) -> &str {
                match self {
                    $(Self::$variant { $field } => $field.as_str(),)*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
