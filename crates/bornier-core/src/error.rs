pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Not a QElectroTech project: {message}")]
    InvalidProject { message: String },
}
