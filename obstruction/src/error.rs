use ndom::NdomError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObstructionError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("{0}")]
    Ndom(#[from] NdomError),
}
