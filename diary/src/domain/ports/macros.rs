//! `define_port_error!`: `thiserror` enums with snake_case constructors.

/// Declare a port error enum.
///
/// Variants are written `Name => "display"` or
/// `Name { field: Type, .. } => "display {field}"`. Every variant gets a
/// constructor named after it in snake case whose arguments accept
/// `impl Into<Type>`, so adapters can write `KeyValueStoreError::read(err.to_string())`
/// or `GeolocationError::unavailable("no fix")`.
macro_rules! define_port_error {
    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };
    (@constructor $variant:ident $($field:ident : $ty:ty),+) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                Self::$variant { $($field: $field.into()),+ }
            }
        }
    };
    (
        $(#[$enum_meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),+ $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$meta])*
                #[error($message)]
                $variant $( { $($field: $ty),+ } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( $($field : $ty),+ )?);
            )*
        }
    };
}

pub(crate) use define_port_error;
