/// Errors returned by trial recording, session bookkeeping and statistics.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PinpointError {
    #[error("coordinate ({x}, {y}) is not finite")]
    InvalidCoordinate { x: f64, y: f64 },
    #[error("trial index {index} is already used in this session")]
    DuplicateIndex { index: u32 },
    #[error("trial index {index} is lower than the last recorded index {last}")]
    NonMonotonicIndex { index: u32, last: u32 },
    #[error("statistics are undefined for a session without trials")]
    EmptySession,
    #[error("session is closed; statistics have already been reported")]
    SessionClosed,
    #[error("radial error must be non-negative (got {value})")]
    NegativeRadial { value: f64 },
    #[error("trial target does not match the session target")]
    TargetMismatch,
    #[error("reference points coincide; select two different points")]
    CoincidentReference,
    #[error("reference distance must be finite and > 0 (got {distance})")]
    InvalidReferenceDistance { distance: f64 },
    #[error("offset between measured and target overflows f64")]
    OffsetOverflow,
    #[error("statistics are not finite (input or result outside the f64 range)")]
    NonFiniteStatistic,
    #[error("session lock poisoned")]
    LockPoisoned,
}
