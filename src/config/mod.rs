pub mod lookup_config;
