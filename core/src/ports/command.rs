//! External command port (interface).

use crate::error::Result;

/// Port for running external inspection tools (`lsof`, `ss`, `netstat`, ...).
///
/// Resolution strategies go through this trait so their parsing and fallback
/// logic can be exercised against scripted output.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and return its stdout.
    ///
    /// A non-zero exit status is an error, as is failing to spawn at all.
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl std::future::Future<Output = Result<String>> + Send {
        (**self).run(program, args)
    }
}
