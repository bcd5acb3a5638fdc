//! Integration tests for the dashboard services

mod test_deployment_service;
mod test_http_client;
