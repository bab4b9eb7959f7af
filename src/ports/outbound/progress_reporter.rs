/// ProgressReporter port for reporting progress during operations
///
/// This port abstracts progress reporting (e.g., to stderr) to provide
/// user feedback during attestation fetches and assessment. It doubles as
/// the sink for non-fatal warnings: decode failures and provider errors are
/// reported here instead of being propagated.
pub trait ProgressReporter: Send + Sync {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
