//! Fetch adapters for the two pipeline backends and for the handler surface.
//!
//! Each adapter issues exactly one request per call and hands back decoded
//! records. Failures are never swallowed: a non-2xx status, a transport
//! error, or an undecodable body all surface as [`SourceError`].

pub mod config;
mod error;
pub mod gateway;
mod http;
pub mod prefect;
pub mod sagemaker;
pub mod token;

#[cfg(test)]
mod test_utils;

pub use config::{PrefectConfig, SageMakerConfig};
pub use error::SourceError;
pub use gateway::GatewayClient;
pub use http::build_http_client;
pub use prefect::{FlowApi, PrefectClient};
pub use sagemaker::{
    list_all_pipelines, list_executions_with_details, PipelinePage, SageMakerApi, SageMakerClient,
    DEFAULT_DETAIL_CONCURRENCY,
};
pub use token::TokenSource;
