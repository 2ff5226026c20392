use std::fmt;

/// Which of the two portal calls an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Profile,
    Results,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Profile => write!(f, "student info"),
            Stage::Results => write!(f, "results"),
        }
    }
}

/// An enum to represent possible errors during a result lookup. Every variant
/// ends the current attempt; none of them poison the controller, which stays
/// usable for the next submission.
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    /// A required input was left empty. Raised before any network call.
    #[error("Both Student ID and Semester ID are required")]
    Validation,
    /// The endpoint answered with a non-success status.
    #[error("Error fetching {stage}: {status}")]
    Http { stage: Stage, status: u16 },
    /// The endpoint could not be reached at all.
    #[error("Failed to reach the {stage} endpoint")]
    Network {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },
    /// The response body did not match the expected shape.
    #[error("Could not decode the {stage} response")]
    Decode {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },
    /// A lookup was submitted while another one is still in flight.
    #[error("A lookup is already in progress")]
    Busy,
}
