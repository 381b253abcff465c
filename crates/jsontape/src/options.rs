//! Parser configuration.

/// Configuration options carried immutably through every parse.
///
/// Options flow from the top-level view into every child view; there is no
/// ambient state.
///
/// # Example
///
/// ```
/// use jsontape::Options;
///
/// let opts = Options {
///     jsonlines: true,
///     ..Default::default()
/// };
/// assert!(!opts.float64);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Parse every JSON number as a 64-bit float, and accept `NaN`, `Inf`,
    /// `-Inf` and a leading `+` in number position.
    ///
    /// Default: `false`.
    pub float64: bool,

    /// Treat the top-level input as an implicit array of newline-delimited
    /// values (JSON Lines). The flag applies to the top level only; child
    /// values are parsed as ordinary JSON.
    ///
    /// Default: `false`.
    pub jsonlines: bool,
}
