//! Macros for declaring state and event enums.

/// Generate a `State` implementation for a fieldless enum.
///
/// The enum gets the derives the engine needs (`Copy`, `Eq`, `Hash`, serde)
/// and `name()` returns the variant identifier.
///
/// # Example
///
/// ```
/// use chartwell::state_enum;
/// use chartwell::core::State;
///
/// state_enum! {
///     pub enum Door {
///         Root,
///         Open,
///         Closed,
///     }
/// }
///
/// assert_eq!(Door::Closed.name(), "Closed");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate an `Event` implementation for a fieldless enum.
///
/// # Example
///
/// ```
/// use chartwell::event_enum;
/// use chartwell::core::Event;
///
/// event_enum! {
///     enum Signal { Press, Timeout }
/// }
///
/// assert_eq!(Signal::Timeout.name(), "Timeout");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
