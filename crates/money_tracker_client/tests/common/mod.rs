pub mod fake_server;
pub mod test_helpers;
