// ── Disconnect retry policy ──
//
// The speaker drops idle keep-alive connections; the first request after
// a quiet period then fails mid-flight. That one failure mode gets
// exactly one immediate retry. Everything else (timeouts, refused
// connections, auth and API errors) passes through untouched -- those
// are handled by the availability flag and the re-login path in
// `speaker.rs`, not here.

use std::future::Future;

use tracing::debug;

use tannoy_api::Error;

/// Run `op`, retrying exactly once if it fails with a server-disconnect
/// flavored connection error. The second outcome is final either way.
pub async fn with_disconnect_retry<T, F, Fut>(mut op: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    match op().await {
        Err(err) if err.is_server_disconnect() => {
            debug!("speaker dropped the connection, retrying once");
            op().await
        }
        result => result,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tannoy_api::ConnectReason;

    use super::*;

    fn disconnect_error() -> Error {
        Error::Connect {
            op: "fetching file list",
            host: "10.0.0.5".into(),
            reason: ConnectReason::Disconnected,
            source: None,
        }
    }

    fn refused_error() -> Error {
        Error::Connect {
            op: "fetching file list",
            host: "10.0.0.5".into(),
            reason: ConnectReason::Refused,
            source: None,
        }
    }

    #[tokio::test]
    async fn disconnect_then_success_returns_success() {
        let calls = AtomicUsize::new(0);
        let result = with_disconnect_retry(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(disconnect_error())
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn two_disconnects_in_a_row_raise() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), Error> = with_disconnect_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(disconnect_error()) }
        })
        .await;
        assert!(result.unwrap_err().is_server_disconnect());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refused_connection_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), Error> = with_disconnect_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(refused_error()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn auth_error_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), Error> = with_disconnect_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(Error::Auth {
                    message: "expired".into(),
                })
            }
        })
        .await;
        assert!(result.unwrap_err().is_auth());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
