//! Generated wire types for `featureflags.v1`.

tonic::include_proto!("featureflags.v1");

/// Encoded descriptor set served through gRPC reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] =
    tonic::include_file_descriptor_set!("feature_admin_descriptor");
