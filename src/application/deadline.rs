//! Deadlines for calls to external collaborators.

use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::TicketingError;

/// Runs a ticketing call, turning an overrun into a retryable timeout.
pub(crate) async fn ticketing<T, F>(
    limit: Duration,
    operation: &str,
    call: F,
) -> Result<T, TicketingError>
where
    F: Future<Output = Result<T, TicketingError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(TicketingError::timeout(format!(
            "{} did not finish within {}s",
            operation,
            limit.as_secs_f32()
        ))),
    }
}

/// Runs any other external call under the same deadline.
pub(crate) async fn external<T, F>(limit: Duration, operation: &str, call: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::new(
            ErrorCode::Timeout,
            format!(
                "{} did not finish within {}s",
                operation,
                limit.as_secs_f32()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TicketingErrorCode;

    #[tokio::test]
    async fn overrun_becomes_retryable_timeout() {
        let err = ticketing(Duration::from_millis(5), "create_event", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, TicketingError>(())
        })
        .await
        .unwrap_err();

        assert_eq!(err.code, TicketingErrorCode::Timeout);
        assert!(err.retryable);
        assert!(err.message.starts_with("create_event"));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let value = external(Duration::from_secs(1), "describe", async {
            Ok::<_, DomainError>(7)
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
    }
}
