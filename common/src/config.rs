#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Output verbosity reduction: 0 full, 1 terse, 2 results only.
    pub quiet: u8,
    /// Suppresses the startup banner.
    pub no_banner: bool,
    /// Disables the interactive interrupt handler.
    ///
    /// Required when stdin is not a terminal (tests, pipelines).
    pub disable_input: bool,
}
