//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`; adding a command means adding one module here.

mod extract;
mod init;
mod load;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use init::InitStrategy;
pub use load::{LoadInput, LoadStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via an associated type, so
/// parameters pass through without boxing or runtime casting.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
