pub mod app_error;
pub mod location_extractor;
pub mod speed_convert;
pub mod validated_query;
