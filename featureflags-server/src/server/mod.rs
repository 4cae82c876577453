pub mod config;
pub mod convert;
pub mod logging;
pub mod proto;
pub mod service;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use anyhow::Context as _;
use tokio::net::TcpListener;
use tonic::transport::server::TcpIncoming;
use tonic::transport::Server;
use tracing::info;

use self::config::AdminConfig;
use self::proto::feature_admin_service_server::FeatureAdminServiceServer;
use self::service::FeatureAdmin;
use self::store::{FlagRepository, MemoryStore};

/// Serve the admin API on an already bound listener until `shutdown` resolves,
/// then let in-flight calls finish.
pub async fn serve(
    listener: TcpListener,
    repo: Arc<dyn FlagRepository>,
    reflection: bool,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let reflection_service = if reflection {
        Some(
            tonic_reflection::server::Builder::configure()
                .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
                .build_v1()
                .context("failed to build reflection service")?,
        )
    } else {
        None
    };

    let incoming = TcpIncoming::from_listener(listener, true, None)
        .map_err(|e| anyhow::anyhow!("failed to accept connections: {}", e))?;

    Server::builder()
        .add_service(FeatureAdminServiceServer::new(FeatureAdmin::new(repo)))
        .add_optional_service(reflection_service)
        .serve_with_incoming_shutdown(incoming, shutdown)
        .await
        .context("server error")?;

    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("shutdown signal received, finishing in-flight requests");
}

pub async fn run_serve(
    config_path: &str,
    hostname_arg: Option<String>,
    port_arg: Option<u16>,
) -> anyhow::Result<()> {
    // CLI args override env vars, which override the config file
    let mut config = AdminConfig::load(config_path);
    config.apply_env_overrides();
    if let Some(hostname) = hostname_arg {
        config.server.hostname = hostname;
    }
    if let Some(port) = port_arg {
        config.server.port = port;
    }

    logging::init_logging(&config.logging);

    let store = Arc::new(MemoryStore::new());
    info!(flags = store.len().await, "in-memory store created");

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    info!(
        addr = %listener.local_addr()?,
        reflection = config.server.reflection,
        "serving FeatureAdminService"
    );

    serve(listener, store, config.server.reflection, shutdown_signal()).await?;

    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tokio::sync::oneshot;
    use tonic::Code;

    use super::proto::feature_admin_service_client::FeatureAdminServiceClient;
    use super::proto::rule::Rule as WireRule;
    use super::*;

    #[tokio::test]
    async fn end_to_end_over_grpc() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(
            listener,
            Arc::new(MemoryStore::new()),
            true,
            async {
                stop_rx.await.ok();
            },
        ));

        let mut client = FeatureAdminServiceClient::connect(format!("http://{}", addr))
            .await
            .unwrap();

        let feature = proto::FeatureFlag {
            key: "checkout-v2".into(),
            enabled: true,
            rules: vec![proto::Rule {
                rule: Some(WireRule::Percentage(proto::PercentageRule { percentage: 25 })),
            }],
            version: 1,
        };
        let created = client
            .create_feature(proto::CreateFeatureRequest {
                feature: Some(feature.clone()),
            })
            .await
            .unwrap()
            .into_inner();
        assert_eq!(created.feature, Some(feature.clone()));

        let dup = client
            .create_feature(proto::CreateFeatureRequest {
                feature: Some(proto::FeatureFlag {
                    version: 2,
                    ..feature.clone()
                }),
            })
            .await
            .unwrap_err();
        assert_eq!(dup.code(), Code::AlreadyExists);

        let listed = client
            .list_features(proto::ListFeaturesRequest {})
            .await
            .unwrap()
            .into_inner();
        assert_eq!(listed.features, vec![feature]);

        let deleted = client
            .delete_feature(proto::DeleteFeatureRequest {
                key: "checkout-v2".into(),
            })
            .await
            .unwrap()
            .into_inner();
        assert!(deleted.success);

        let missing = client
            .get_feature(proto::GetFeatureRequest {
                key: "checkout-v2".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(missing.code(), Code::NotFound);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
