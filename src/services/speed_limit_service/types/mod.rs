pub mod here_flow_response;
pub mod overpass_response;
pub mod provider_error;
pub mod tomtom_flow_response;
