use std::sync::Arc;

use featureflags::FeatureFlag;
use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

use super::convert::ConvertError;
use super::proto;
use super::proto::feature_admin_service_server::FeatureAdminService;
use super::store::{FlagRepository, StoreError};

impl From<StoreError> for Status {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(_) => Status::already_exists(err.to_string()),
            StoreError::NotFound(_) => Status::not_found(err.to_string()),
            StoreError::Backend(_) => Status::internal(err.to_string()),
        }
    }
}

/// gRPC implementation of `FeatureAdminService` over a [`FlagRepository`].
pub struct FeatureAdmin {
    repo: Arc<dyn FlagRepository>,
}

impl FeatureAdmin {
    pub fn new(repo: Arc<dyn FlagRepository>) -> Self {
        Self { repo }
    }
}

/// Turn an incoming wire flag into a validated domain flag.
fn accept_flag(feature: Option<proto::FeatureFlag>) -> Result<FeatureFlag, Status> {
    let feature = feature.ok_or_else(|| Status::invalid_argument("feature cannot be empty"))?;
    let flag =
        FeatureFlag::try_from(feature).map_err(|e| Status::invalid_argument(e.to_string()))?;
    flag.validate().map_err(|e| Status::invalid_argument(e.to_string()))?;
    Ok(flag)
}

fn require_key(key: &str) -> Result<(), Status> {
    if key.is_empty() {
        return Err(Status::invalid_argument("key cannot be empty"));
    }
    Ok(())
}

/// Stored flags went through [`accept_flag`], so a failure here means the
/// store holds something it should not.
fn to_wire(flag: &FeatureFlag) -> Result<proto::FeatureFlag, Status> {
    proto::FeatureFlag::try_from(flag).map_err(|e: ConvertError| {
        Status::internal(format!("stored feature {:?} is malformed: {}", flag.key, e))
    })
}

fn log_rejection(op: &str, status: &Status) {
    warn!(op, code = ?status.code(), message = status.message(), "request rejected");
}

#[tonic::async_trait]
impl FeatureAdminService for FeatureAdmin {
    async fn create_feature(
        &self,
        request: Request<proto::CreateFeatureRequest>,
    ) -> Result<Response<proto::FeatureResponse>, Status> {
        let flag = accept_flag(request.into_inner().feature)
            .inspect_err(|s| log_rejection("create", s))?;
        let feature = to_wire(&flag)?;
        let (key, version) = (flag.key.clone(), flag.version);

        self.repo
            .create(flag)
            .await
            .map_err(Status::from)
            .inspect_err(|s| log_rejection("create", s))?;

        info!(key = %key, version, "feature created");
        Ok(Response::new(proto::FeatureResponse {
            feature: Some(feature),
        }))
    }

    async fn get_feature(
        &self,
        request: Request<proto::GetFeatureRequest>,
    ) -> Result<Response<proto::FeatureResponse>, Status> {
        let key = request.into_inner().key;
        require_key(&key).inspect_err(|s| log_rejection("get", s))?;

        let flag = self
            .repo
            .get(&key)
            .await
            .map_err(Status::from)
            .inspect_err(|s| log_rejection("get", s))?;
        let feature = to_wire(&flag).inspect_err(|s| log_rejection("get", s))?;

        debug!(key = %key, "feature fetched");
        Ok(Response::new(proto::FeatureResponse {
            feature: Some(feature),
        }))
    }

    async fn update_feature(
        &self,
        request: Request<proto::UpdateFeatureRequest>,
    ) -> Result<Response<proto::FeatureResponse>, Status> {
        let flag = accept_flag(request.into_inner().feature)
            .inspect_err(|s| log_rejection("update", s))?;
        let feature = to_wire(&flag)?;
        let (key, version) = (flag.key.clone(), flag.version);

        self.repo
            .update(flag)
            .await
            .map_err(Status::from)
            .inspect_err(|s| log_rejection("update", s))?;

        info!(key = %key, version, "feature updated");
        Ok(Response::new(proto::FeatureResponse {
            feature: Some(feature),
        }))
    }

    async fn delete_feature(
        &self,
        request: Request<proto::DeleteFeatureRequest>,
    ) -> Result<Response<proto::DeleteFeatureResponse>, Status> {
        let key = request.into_inner().key;
        require_key(&key).inspect_err(|s| log_rejection("delete", s))?;

        self.repo
            .delete(&key)
            .await
            .map_err(Status::from)
            .inspect_err(|s| log_rejection("delete", s))?;

        info!(key = %key, "feature deleted");
        Ok(Response::new(proto::DeleteFeatureResponse { success: true }))
    }

    async fn list_features(
        &self,
        _request: Request<proto::ListFeaturesRequest>,
    ) -> Result<Response<proto::ListFeaturesResponse>, Status> {
        let flags = self
            .repo
            .list()
            .await
            .map_err(Status::from)
            .inspect_err(|s| log_rejection("list", s))?;
        let features = flags
            .iter()
            .map(|flag| to_wire(flag))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|s| log_rejection("list", s))?;

        debug!(count = features.len(), "features listed");
        Ok(Response::new(proto::ListFeaturesResponse { features }))
    }
}
