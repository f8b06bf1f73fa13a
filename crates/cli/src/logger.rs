use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid log level \"{0}\"")]
    InvalidLevel(String),
    #[error(transparent)]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs a subscriber writing to stderr. Records of the `log` facade are forwarded to it.
///
/// The level is either a plain level (`warn`) or a list of directives
/// (`planner_domain=debug,warn`).
pub fn init(level: &str) -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(filter(level)?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

fn filter(level: &str) -> Result<EnvFilter, Error> {
    EnvFilter::try_new(level.trim()).map_err(|_| Error::InvalidLevel(level.to_string()))
}
