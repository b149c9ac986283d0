use thiserror::Error;

#[derive(Error, Debug)]
pub enum NdomError {
    #[error("{0}")]
    Image(#[from] image::ImageError),
}
