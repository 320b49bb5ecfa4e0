use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommitmentError {
    #[error("the polynomial has {0} coefficients but the parameters only support {1}")]
    PolynomialTooLarge(usize, usize),

    #[error("no evaluation domain of size {0} exists for this field")]
    InvalidDomainSize(usize),

    #[error("no opening queries were provided")]
    EmptyQueries,

    #[error("a challenge landed on an opening point")]
    DegenerateChallenge,

    #[error("transcript error: {0}")]
    Transcript(#[from] std::io::Error),
}
