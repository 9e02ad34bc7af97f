//! Integration tests for ReplicateService against a mock Replicate API.

mod error_handling;
mod mock_server;
