//! Shared helpers for integration tests: clients wired to a running fake server.

use std::sync::Arc;

use money_tracker_client::{
    AmountPolicy, ApiClient, ClientConfig, CredentialProvider, StaticToken, WalletsPage,
};

use super::fake_server::FakeServer;

pub const TEST_TOKEN: &str = "test-token";

pub fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig {
        api_base_url: base_url.to_string(),
        ..ClientConfig::default()
    }
}

pub fn client_with(base_url: &str, credentials: Arc<dyn CredentialProvider>) -> ApiClient {
    ApiClient::new(&config_for(base_url), credentials).expect("build api client")
}

/// Spawns `server` and returns a client authenticated with [`TEST_TOKEN`].
pub async fn connected_client(server: &FakeServer) -> ApiClient {
    let url = server.spawn().await;
    client_with(&url, Arc::new(StaticToken(TEST_TOKEN.to_string())))
}

/// Wallets page over a live client, with the first load already done.
pub async fn loaded_page(server: &FakeServer, policy: AmountPolicy) -> WalletsPage<ApiClient> {
    let mut page = WalletsPage::new(connected_client(server).await, policy);
    page.refresh().await;
    page
}
