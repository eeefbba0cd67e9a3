use crate::party::PartyLocation;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core model when a caller breaks a precondition.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    /// The party already holds four champions.
    #[error("the party is full")]
    PartyFull,

    /// Another champion already stands at this place in the party.
    #[error("party location {0:?} is already taken")]
    LocationTaken(PartyLocation),

    /// A champion with this name is already in the party.
    #[error("champion \"{0}\" is already in the party")]
    DuplicateChampion(String),

    /// A health value outside the accepted range.
    #[error("invalid health {health} (max {max})")]
    InvalidHealth {
        /// The rejected current health.
        health: u32,
        /// The maximum health it was checked against.
        max: u32,
    },
}
