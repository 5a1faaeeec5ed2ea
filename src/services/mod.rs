pub mod speed_limit_service;
