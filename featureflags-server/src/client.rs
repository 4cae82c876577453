use anyhow::{anyhow, Context as _};
use featureflags::FeatureFlag;
use tokio::io::AsyncReadExt;
use tonic::transport::Channel;
use tonic::Status;

use crate::server::proto;
use crate::server::proto::feature_admin_service_client::FeatureAdminServiceClient;

/// Default address of a locally running `ff-admin serve`.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:50051";

/// Which mutation a flag file is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Create,
    Update,
}

/// Thin wrapper over the generated client that speaks domain types.
pub struct AdminClient {
    inner: FeatureAdminServiceClient<Channel>,
}

fn status_error(status: Status) -> anyhow::Error {
    anyhow!("{:?}: {}", status.code(), status.message())
}

fn from_wire(feature: Option<proto::FeatureFlag>) -> anyhow::Result<FeatureFlag> {
    let feature = feature.ok_or_else(|| anyhow!("server returned no feature"))?;
    Ok(FeatureFlag::try_from(feature)?)
}

impl AdminClient {
    pub async fn connect(server: &str) -> anyhow::Result<Self> {
        let inner = FeatureAdminServiceClient::connect(server.to_string())
            .await
            .with_context(|| format!("failed to connect to {}", server))?;
        Ok(Self { inner })
    }

    pub async fn get(&mut self, key: &str) -> anyhow::Result<FeatureFlag> {
        let resp = self
            .inner
            .get_feature(proto::GetFeatureRequest {
                key: key.to_string(),
            })
            .await
            .map_err(status_error)?;
        from_wire(resp.into_inner().feature)
    }

    /// All flags, sorted by key.
    pub async fn list(&mut self) -> anyhow::Result<Vec<FeatureFlag>> {
        let resp = self
            .inner
            .list_features(proto::ListFeaturesRequest {})
            .await
            .map_err(status_error)?;
        let mut flags = resp
            .into_inner()
            .features
            .into_iter()
            .map(FeatureFlag::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        flags.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(flags)
    }

    pub async fn write(&mut self, mode: Write, flag: &FeatureFlag) -> anyhow::Result<FeatureFlag> {
        let feature = Some(proto::FeatureFlag::try_from(flag)?);
        let resp = match mode {
            Write::Create => self
                .inner
                .create_feature(proto::CreateFeatureRequest { feature })
                .await,
            Write::Update => self
                .inner
                .update_feature(proto::UpdateFeatureRequest { feature })
                .await,
        }
        .map_err(status_error)?;
        from_wire(resp.into_inner().feature)
    }

    pub async fn delete(&mut self, key: &str) -> anyhow::Result<bool> {
        let resp = self
            .inner
            .delete_feature(proto::DeleteFeatureRequest {
                key: key.to_string(),
            })
            .await
            .map_err(status_error)?;
        Ok(resp.into_inner().success)
    }
}

/// Read a flag as JSON from `path`, or from stdin when `path` is `-`.
async fn read_flag(path: &str) -> anyhow::Result<FeatureFlag> {
    let content = if path == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("{} does not exist", path))?
    };
    serde_json::from_str(&content).with_context(|| format!("{} is not a valid flag", path))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run_get(server: &str, key: &str) -> anyhow::Result<()> {
    let flag = AdminClient::connect(server).await?.get(key).await?;
    print_json(&flag)
}

pub async fn run_list(server: &str) -> anyhow::Result<()> {
    let flags = AdminClient::connect(server).await?.list().await?;
    print_json(&flags)
}

pub async fn run_write(server: &str, mode: Write, path: &str) -> anyhow::Result<()> {
    let flag = read_flag(path).await?;

    // Validate locally (fail fast)
    flag.validate().map_err(|e| anyhow!("validation failed: {}", e))?;

    let stored = AdminClient::connect(server).await?.write(mode, &flag).await?;
    print_json(&stored)
}

pub async fn run_delete(server: &str, key: &str) -> anyhow::Result<()> {
    if AdminClient::connect(server).await?.delete(key).await? {
        println!("✓ Deleted {}", key);
    }
    Ok(())
}
