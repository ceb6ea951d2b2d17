//! `define_port_error!` generates port error enums.
//!
//! Each variant gets a `thiserror` message and a snake-case constructor whose
//! field parameters accept anything convertible into the field type.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ScoringStoreError {
            Connection { message: String } => "scoring store unavailable: {message}",
            Rejected { count: u32 } => "scoring store rejected {count} rows",
            Conflict { title: String, count: u32 } => "achievement {title} clashed {count} times",
            Closed => "scoring store closed",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = ScoringStoreError::connection("pool timed out");
        assert_eq!(err.to_string(), "scoring store unavailable: pool timed out");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        let err = ScoringStoreError::rejected(3_u32);
        assert_eq!(err, ScoringStoreError::Rejected { count: 3 });
    }

    #[test]
    fn mixed_fields_are_positional() {
        let err = ScoringStoreError::conflict("Dedicado", 2_u32);
        assert_eq!(err.to_string(), "achievement Dedicado clashed 2 times");
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ScoringStoreError::closed().to_string(), "scoring store closed");
    }
}
