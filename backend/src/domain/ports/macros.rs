//! `define_port_error!` builds a thiserror enum plus snake_case constructors
//! whose fields accept anything convertible into the declared type.

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
        pub enum SamplePortError {
            Connection { message: String } => "connection failed: {message}",
            Missing { id: u32 } => "row {id} is missing",
            Duplicate { email: String, attempts: u32 } => "{email} taken after {attempts} tries",
            Invalid => "value is invalid",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::connection("pool closed");
        assert_eq!(err.to_string(), "connection failed: pool closed");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        assert_eq!(SamplePortError::missing(7_u32).to_string(), "row 7 is missing");
    }

    #[test]
    fn mixed_and_unit_variants_build() {
        let err = SamplePortError::duplicate("a@x.com", 2_u32);
        assert_eq!(err.to_string(), "a@x.com taken after 2 tries");
        assert_eq!(SamplePortError::invalid(), SamplePortError::Invalid);
    }
}
