use thiserror::Error;

#[derive(Error, Debug)]
pub enum CadError {
    #[error("provider error: {0}")] Provider(String),
    #[error("engine error: {0}")] Engine(String),
}
