#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] burrow_core::Error),

    #[error(transparent)]
    Force(#[from] burrow_force::Error),

    #[error("no page is active")]
    NoActivePage,

    #[error("the rabbit hole is not open")]
    RabbitHoleClosed,

    #[error("unknown rabbit-hole node: {id}")]
    UnknownRabbitNode { id: burrow_core::NodeId },
}

pub type Result<T> = std::result::Result<T, Error>;
