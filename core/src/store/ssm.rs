//! AWS Systems Manager Parameter Store backend (`ssm:<region>`).
//!
//! The SDK client is async; `SsmStore` owns a current-thread runtime and
//! blocks on each request so it can sit behind the synchronous
//! `ParameterStore` trait. Credentials come from the SDK's default provider
//! chain.

use aws_config::BehaviorVersion;
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ssm::types::ParameterType;
use aws_sdk_ssm::Client;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::ParameterStore;
use crate::error::StoreError;
use crate::types::parameter::{ParameterKind, RemoteRecord};

/// Service error codes that mean "slow down" rather than "no".
const RETRYABLE_CODES: &[&str] = &["ThrottlingException", "TooManyUpdates", "InternalServerError"];

pub struct SsmStore {
    runtime: Runtime,
    client: Client,
}

impl SsmStore {
    /// Build a client for `region`. No request is made until first use.
    pub fn connect(region: &str) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StoreError::Runtime)?;
        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .load(),
        );
        debug!(region, "ssm client ready");
        Ok(SsmStore {
            runtime,
            client: Client::new(&config),
        })
    }
}

impl ParameterStore for SsmStore {
    fn get_history(&self, path: &str) -> Result<Vec<RemoteRecord>, StoreError> {
        let mut history = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let request = self
                .client
                .get_parameter_history()
                .name(path)
                .with_decryption(true)
                .set_next_token(token.take());
            let page = match self.runtime.block_on(request.send()) {
                Ok(page) => page,
                Err(err)
                    if err
                        .as_service_error()
                        .is_some_and(|e| e.is_parameter_not_found()) =>
                {
                    return Err(StoreError::NotFound(path.to_string()));
                }
                Err(err) => return Err(classify(path, err)),
            };
            history.extend(page.parameters().iter().map(|p| RemoteRecord {
                value: p.value().unwrap_or_default().to_string(),
                version: p.version(),
            }));
            token = page.next_token().map(str::to_string);
            if token.is_none() {
                break;
            }
        }
        Ok(latest_first(history))
    }

    fn put_parameter(
        &mut self,
        path: &str,
        kind: ParameterKind,
        value: &str,
        overwrite: bool,
    ) -> Result<(), StoreError> {
        let request = self
            .client
            .put_parameter()
            .name(path)
            .value(value)
            .r#type(parameter_type(kind))
            .overwrite(overwrite);
        match self.runtime.block_on(request.send()) {
            Ok(out) => {
                debug!(path, version = out.version(), "ssm put");
                Ok(())
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_already_exists()) =>
            {
                Err(StoreError::AlreadyExists(path.to_string()))
            }
            Err(err) => Err(classify(path, err)),
        }
    }
}

fn parameter_type(kind: ParameterKind) -> ParameterType {
    match kind {
        ParameterKind::Plain => ParameterType::String,
        ParameterKind::Secret => ParameterType::SecureString,
    }
}

/// SSM pages history oldest first; callers expect the newest at the head.
fn latest_first(mut history: Vec<RemoteRecord>) -> Vec<RemoteRecord> {
    history.sort_by(|a, b| b.version.cmp(&a.version));
    history
}

/// Map an SDK failure to `Unavailable` when a retry could succeed and to
/// `Rejected` otherwise.
fn classify<E>(path: &str, err: SdkError<E>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let reason = DisplayErrorContext(&err).to_string();
    let path = path.to_string();
    if is_retryable(&err) {
        StoreError::Unavailable { path, reason }
    } else {
        StoreError::Rejected { path, reason }
    }
}

fn is_retryable<E: ProvideErrorMetadata>(err: &SdkError<E>) -> bool {
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            true
        }
        SdkError::ServiceError(service) => service
            .err()
            .code()
            .is_some_and(|code| RETRYABLE_CODES.contains(&code)),
        _ => false,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ssm::operation::get_parameter_history::GetParameterHistoryError;

    fn remote(value: &str, version: i64) -> RemoteRecord {
        RemoteRecord {
            value: value.into(),
            version,
        }
    }

    #[test]
    fn kinds_map_to_ssm_types() {
        assert_eq!(parameter_type(ParameterKind::Plain), ParameterType::String);
        assert_eq!(parameter_type(ParameterKind::Secret), ParameterType::SecureString);
    }

    #[test]
    fn history_is_reordered_newest_first() {
        let pages = vec![remote("a", 1), remote("b", 2), remote("c", 3)];
        let history = latest_first(pages);
        let versions: Vec<i64> = history.iter().map(|r| r.version).collect();
        assert_eq!(versions, vec![3, 2, 1]);
        assert_eq!(history[0].value, "c");
    }

    #[test]
    fn timeouts_are_retryable() {
        let err: SdkError<GetParameterHistoryError> = SdkError::timeout_error("deadline exceeded");
        let mapped = classify("/db/host", err);
        assert!(mapped.is_transient());
        assert!(mapped.to_string().contains("/db/host"));
    }

    #[test]
    fn construction_failures_are_rejected() {
        let err: SdkError<GetParameterHistoryError> = SdkError::construction_failure("bad name");
        assert!(matches!(
            classify("/db/host", err),
            StoreError::Rejected { ref path, .. } if path == "/db/host"
        ));
    }
}
