/// Writes a `format!`-style line straight to a logger's sink, unstyled and
/// without a timestamp.
///
/// ```
/// let logger = lori::Logger::new();
/// lori::log_raw!(logger, "{} requests served", 3);
/// ```
#[macro_export]
macro_rules! log_raw {
    ($logger: expr, $($arg: tt)*) => {
        $logger.log(format_args!($($arg)*))
    };
}
