//! Macros for declaring states and events with minimal boilerplate.

/// Generate a `State` implementation for a fieldless enum.
///
/// The generated enum derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
/// `Debug` and serde's `Serialize`/`Deserialize`, so it can be used as a
/// table state and recorded in a serialized history.
///
/// # Example
///
/// ```
/// use strata::core::State;
/// use strata::state_enum;
///
/// state_enum! {
///     pub enum Link {
///         Offline,
///         Online,
///         Connected,
///     }
/// }
///
/// assert_eq!(Link::Connected.name(), "Connected");
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
/// The generated enum derives `Clone`, `Copy`, `PartialEq`, `Eq` and `Debug`.
/// Events carrying data should implement [`Event`](crate::core::Event) by
/// hand or travel with a payload instead.
///
/// # Example
///
/// ```
/// use strata::core::Event;
/// use strata::event_enum;
///
/// event_enum! {
///     pub enum Signal {
///         Dial,
///         HangUp,
///     }
/// }
///
/// assert_eq!(Signal::HangUp.name(), "HangUp");
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
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
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
