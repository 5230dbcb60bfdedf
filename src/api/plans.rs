//! Subscription plan endpoint

use crate::api::envelope::Envelope;
use crate::api::types::Plan;
use crate::api::ApiClient;
use crate::error::Result;

impl ApiClient {
    /// `GET /subscription/plans` — the available subscription tiers
    pub async fn list_plans(&self) -> Result<Envelope<Vec<Plan>>> {
        self.get_json("/subscription/plans", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::ApiClient;
    use crate::config::ApiConfig;
    use crate::store::{DurableSession, MemoryStore};
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_plans() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscription/plans"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "statusCode": 200,
                "message": "ok",
                "body": [
                    {
                        "plan": "free",
                        "name": "Free",
                        "price": 0.0,
                        "currency": "USD",
                        "features": ["Basic chat"],
                        "limits": {"prompts_per_day": 20}
                    },
                    {
                        "plan": "pro",
                        "name": "Pro",
                        "price": 12.0,
                        "currency": "USD",
                        "features": ["Unlimited chat", "Forecasts"],
                        "limits": {}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let config = ApiConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
        };
        let session = DurableSession::new(Arc::new(MemoryStore::new()));
        let client = ApiClient::new(&config, session).unwrap();

        let plans = client
            .list_plans()
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].plan, "free");
        assert_eq!(plans[1].price, 12.0);
    }
}
