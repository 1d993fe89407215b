//! Macros for ergonomic machine construction.

/// Declare a machine's state set and implement [`State`](crate::core::State) for it.
///
/// The reserved `Uninitialized` variant is added automatically as the first
/// variant; do not list it.
///
/// # Example
///
/// ```
/// use edgesim::core::State;
/// use edgesim::state_enum;
///
/// state_enum! {
///     pub enum MasterState {
///         SendingClockUp,
///         SendingClockDown,
///         Done,
///     }
/// }
///
/// assert_eq!(MasterState::Uninitialized.name(), "Uninitialized");
/// assert_eq!(MasterState::Done.name(), "Done");
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            Uninitialized,
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            const UNINITIALIZED: Self = Self::Uninitialized;

            fn name(&self) -> &str {
                match self {
                    Self::Uninitialized => "Uninitialized",
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Waiting,
            Triggered,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        let state = TestState::Uninitialized;
        assert_eq!(state.name(), "Uninitialized");
        assert!(state.is_uninitialized());

        assert_eq!(TestState::Waiting.name(), "Waiting");
        assert_eq!(TestState::Triggered.name(), "Triggered");
        assert!(!TestState::Triggered.is_uninitialized());
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
        }

        assert_eq!(PublicState::B.name(), "B");
    }

    #[test]
    fn state_enum_works_with_no_extra_states() {
        state_enum! {
            enum BareState {}
        }

        assert_eq!(BareState::UNINITIALIZED, BareState::Uninitialized);
    }
}
