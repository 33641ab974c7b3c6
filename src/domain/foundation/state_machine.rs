//! Transition tables for lifecycle enums.

use super::ValidationError;

/// A lifecycle enum with a fixed table of allowed moves.
///
/// Implementors list their outgoing edges; membership checks and the
/// checked `transition_to` come from the table.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug + 'static {
    /// Every state reachable in one step from `self`.
    fn valid_transitions(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns `target` if the table allows it.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(ValidationError::invalid_format(
            "state",
            format!("no transition from {:?} to {:?}", self, target),
        ))
    }

    /// No outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kiln {
        Loaded,
        Firing,
        Cooled,
    }

    impl StateMachine for Kiln {
        fn valid_transitions(&self) -> &'static [Self] {
            match self {
                Kiln::Loaded => &[Kiln::Firing],
                Kiln::Firing => &[Kiln::Cooled],
                Kiln::Cooled => &[],
            }
        }
    }

    #[test]
    fn follows_the_table() {
        assert_eq!(Kiln::Loaded.transition_to(Kiln::Firing), Ok(Kiln::Firing));
        assert!(!Kiln::Loaded.can_transition_to(&Kiln::Cooled));
    }

    #[test]
    fn rejected_move_names_both_states() {
        let err = Kiln::Cooled.transition_to(Kiln::Loaded).unwrap_err();
        assert_eq!(err.field(), "state");
        assert!(err.to_string().contains("Cooled"));
    }

    #[test]
    fn terminal_means_no_edges() {
        assert!(Kiln::Cooled.is_terminal());
        assert!(!Kiln::Firing.is_terminal());
    }
}
