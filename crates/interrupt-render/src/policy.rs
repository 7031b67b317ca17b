//! Interrupt decision table.

use interrupt_ipc::{ForceType, InterruptEvent, InterruptHint};

/// What the client must do in response to an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop writing until a successful resume.
    SetPaused,

    /// Stop writing for good.
    SetStopped,

    /// Restart the renderer; clear the pause only if that succeeds.
    AttemptResume,

    /// No flag change.
    Ignore(IgnoreReason),
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Forced duck; volume handling is not ours.
    Duck,

    /// Forced unduck.
    Unduck,

    /// Forced event with a hint that makes no sense for it.
    InvalidForceHint,

    /// Shared pause is only advice.
    SharePauseAdvisory,

    /// Shared event with a hint we do not act on.
    UnhandledShareHint,

    /// Force type we do not recognize.
    UnknownForceType,
}

impl IgnoreReason {
    /// Whether the event indicates a problem worth an error log.
    pub fn is_unexpected(self) -> bool {
        matches!(
            self,
            Self::InvalidForceHint | Self::UnhandledShareHint | Self::UnknownForceType
        )
    }
}

/// Decide how to react to an event.
pub fn decide(event: &InterruptEvent) -> Action {
    match (event.force_type, event.hint_type) {
        (ForceType::Force, InterruptHint::Pause) => Action::SetPaused,
        (ForceType::Force, InterruptHint::Stop) => Action::SetStopped,
        (ForceType::Force, InterruptHint::Duck) => Action::Ignore(IgnoreReason::Duck),
        (ForceType::Force, InterruptHint::Unduck) => Action::Ignore(IgnoreReason::Unduck),
        (ForceType::Force, _) => Action::Ignore(IgnoreReason::InvalidForceHint),
        (ForceType::Share, InterruptHint::Pause) => {
            Action::Ignore(IgnoreReason::SharePauseAdvisory)
        }
        (ForceType::Share, InterruptHint::Resume) => Action::AttemptResume,
        (ForceType::Share, _) => Action::Ignore(IgnoreReason::UnhandledShareHint),
        (ForceType::Unknown(_), _) => Action::Ignore(IgnoreReason::UnknownForceType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interrupt_ipc::InterruptType;

    const ALL_HINTS: [InterruptHint; 7] = [
        InterruptHint::None,
        InterruptHint::Resume,
        InterruptHint::Pause,
        InterruptHint::Stop,
        InterruptHint::Duck,
        InterruptHint::Unduck,
        InterruptHint::Unknown(77),
    ];

    fn event(force: ForceType, hint: InterruptHint) -> InterruptEvent {
        InterruptEvent::new(InterruptType::Begin, force, hint, 0.0)
    }

    #[test]
    fn test_table_is_total() {
        for force in [ForceType::Force, ForceType::Share, ForceType::Unknown(5)] {
            for hint in ALL_HINTS {
                let action = decide(&event(force, hint));
                match (force, hint) {
                    (ForceType::Force, InterruptHint::Pause) => {
                        assert_eq!(action, Action::SetPaused)
                    }
                    (ForceType::Force, InterruptHint::Stop) => {
                        assert_eq!(action, Action::SetStopped)
                    }
                    (ForceType::Share, InterruptHint::Resume) => {
                        assert_eq!(action, Action::AttemptResume)
                    }
                    _ => assert!(
                        matches!(action, Action::Ignore(_)),
                        "{force:?}/{hint:?} should be ignored, got {action:?}"
                    ),
                }
            }
        }
    }

    #[test]
    fn test_ignore_reasons() {
        assert_eq!(
            decide(&event(ForceType::Force, InterruptHint::Duck)),
            Action::Ignore(IgnoreReason::Duck)
        );
        assert_eq!(
            decide(&event(ForceType::Force, InterruptHint::Unduck)),
            Action::Ignore(IgnoreReason::Unduck)
        );
        assert_eq!(
            decide(&event(ForceType::Force, InterruptHint::Resume)),
            Action::Ignore(IgnoreReason::InvalidForceHint)
        );
        assert_eq!(
            decide(&event(ForceType::Share, InterruptHint::Pause)),
            Action::Ignore(IgnoreReason::SharePauseAdvisory)
        );
        assert_eq!(
            decide(&event(ForceType::Share, InterruptHint::Stop)),
            Action::Ignore(IgnoreReason::UnhandledShareHint)
        );
        assert_eq!(
            decide(&event(ForceType::Unknown(3), InterruptHint::Pause)),
            Action::Ignore(IgnoreReason::UnknownForceType)
        );
    }

    #[test]
    fn test_duck_volume_does_not_matter() {
        let mut e = event(ForceType::Force, InterruptHint::Pause);
        e.duck_volume = 0.3;
        assert_eq!(decide(&e), Action::SetPaused);
    }

    #[test]
    fn test_unexpected_reasons() {
        assert!(IgnoreReason::InvalidForceHint.is_unexpected());
        assert!(!IgnoreReason::Duck.is_unexpected());
        assert!(!IgnoreReason::SharePauseAdvisory.is_unexpected());
    }
}
