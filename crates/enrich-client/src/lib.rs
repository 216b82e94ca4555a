pub mod client;
pub mod types;

pub use client::EnrichClient;
pub use types::{
    placeholder_enrichment, validate_enrichment, EnrichError, EnrichmentRequest,
    EnrichmentResponse,
};
