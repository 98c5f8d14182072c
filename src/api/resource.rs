use std::future::Future;

use crate::api::errors::ClientError;

/// Non-blocking view of a fetch: the caller renders all three cases.
#[derive(Debug)]
pub(crate) enum Resource<T> {
    Loading,
    Failed(ClientError),
    Ready(T),
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> Resource<T> {
    pub(crate) fn resolve(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(err) => Self::Failed(err),
        }
    }

    pub(crate) async fn fetch<F>(request: F) -> Self
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        Self::resolve(request.await)
    }

    pub(crate) fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub(crate) fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_exposes_exactly_one_state() {
        let ready = Resource::fetch(async { Ok::<_, ClientError>(3) }).await;
        assert_eq!(ready.data(), Some(&3));
        assert!(!ready.is_loading());
        assert!(ready.error().is_none());

        let failed: Resource<u8> =
            Resource::fetch(async { Err(ClientError::Invalid("nope".to_string())) }).await;
        assert!(failed.data().is_none());
        assert_eq!(failed.error().map(ToString::to_string), Some("nope".to_string()));

        let pending: Resource<u8> = Resource::default();
        assert!(pending.is_loading());
    }
}
