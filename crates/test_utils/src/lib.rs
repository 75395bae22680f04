//! Test utilities for the InfoMax crates.

/// Enable tracing with the RUST_LOG environment variable.
///
/// This is intended to be used in tests, so it defaults to DEBUG level.
pub fn enable_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::DEBUG.into())
                .from_env_lossy(),
        )
        .try_init();
}

/// Repeatedly run a block of assertions until it `break`s, sleeping
/// briefly between iterations and panicking if the deadline (default
/// 5 seconds) passes first.
///
/// ```ignore
/// iter_check!({
///     if handler.events().len() >= 2 {
///         break;
///     }
/// });
/// ```
#[macro_export]
macro_rules! iter_check {
    ($body:block) => {
        $crate::iter_check!(5000, $body)
    };
    ($timeout_ms:expr, $body:block) => {{
        let deadline = ::std::time::Instant::now()
            + ::std::time::Duration::from_millis($timeout_ms);
        loop {
            $body

            if ::std::time::Instant::now() > deadline {
                panic!("iter_check timed out after {} ms", $timeout_ms);
            }

            ::tokio::time::sleep(::std::time::Duration::from_millis(10))
                .await;
        }
    }};
}
