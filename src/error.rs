pub type WeaveResult<T> = Result<T, WeaveError>;

#[derive(thiserror::Error, Debug)]
pub enum WeaveError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("scene error: {0}")]
    Scene(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WeaveError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }
}
