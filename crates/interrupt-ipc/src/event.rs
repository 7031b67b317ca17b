//! Interrupt event types.

use serde::{Deserialize, Serialize};

/// Category of an interruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterruptType {
    /// Another stream has started claiming the output.
    Begin,

    /// The claiming stream has finished.
    End,

    /// A value this client does not know about.
    Unknown(i32),
}

impl InterruptType {
    /// Map a raw wire value.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Begin,
            2 => Self::End,
            other => Self::Unknown(other),
        }
    }

    /// Raw wire value.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Begin => 1,
            Self::End => 2,
            Self::Unknown(raw) => raw,
        }
    }
}

/// Severity of an interruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceType {
    /// The client must comply; the authority has already acted.
    Force,

    /// Advisory; the client decides.
    Share,

    /// A value this client does not know about.
    Unknown(i32),
}

impl ForceType {
    /// Map a raw wire value.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Force,
            1 => Self::Share,
            other => Self::Unknown(other),
        }
    }

    /// Raw wire value.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Force => 0,
            Self::Share => 1,
            Self::Unknown(raw) => raw,
        }
    }
}

/// Action hint carried by an interruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterruptHint {
    /// No action requested.
    None,

    /// Output may resume.
    Resume,

    /// Output should pause.
    Pause,

    /// Output should stop for good.
    Stop,

    /// Output volume should be lowered.
    Duck,

    /// Output volume may be restored.
    Unduck,

    /// A value this client does not know about.
    Unknown(i32),
}

impl InterruptHint {
    /// Map a raw wire value.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::Resume,
            2 => Self::Pause,
            3 => Self::Stop,
            4 => Self::Duck,
            5 => Self::Unduck,
            other => Self::Unknown(other),
        }
    }

    /// Raw wire value.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Resume => 1,
            Self::Pause => 2,
            Self::Stop => 3,
            Self::Duck => 4,
            Self::Unduck => 5,
            Self::Unknown(raw) => raw,
        }
    }
}

/// An interrupt notification from the audio policy authority.
///
/// All four fields are carried independently; none implies a default for
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterruptEvent {
    /// Category of the interruption.
    pub event_type: InterruptType,

    /// Whether compliance is mandatory.
    pub force_type: ForceType,

    /// Requested action.
    pub hint_type: InterruptHint,

    /// Attenuation factor, only meaningful for duck/unduck hints.
    pub duck_volume: f32,
}

impl InterruptEvent {
    /// Create a new event.
    pub fn new(
        event_type: InterruptType,
        force_type: ForceType,
        hint_type: InterruptHint,
        duck_volume: f32,
    ) -> Self {
        Self {
            event_type,
            force_type,
            hint_type,
            duck_volume,
        }
    }

    /// A begin event with no duck volume.
    pub fn begin(force_type: ForceType, hint_type: InterruptHint) -> Self {
        Self::new(InterruptType::Begin, force_type, hint_type, 0.0)
    }
}
