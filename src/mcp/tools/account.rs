//! Company-level lookups: account details and the department list.

use serde_json::Value;

use crate::mcp::{error::BreatheError, http::BreatheClient};

pub async fn get_account_info(client: &BreatheClient) -> Result<Value, BreatheError> {
    client.get("account", None).await
}

pub async fn get_departments(client: &BreatheClient) -> Result<Value, BreatheError> {
    client.get("departments", None).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    use super::*;
    use crate::mcp::config::BreatheConfig;

    #[tokio::test]
    async fn account_and_departments_pass_through() {
        let server = MockServer::start().await;
        let account = json!({"company_name": "Test Company", "employee_count": 50});
        let departments = json!({"departments": [{"id": 1, "name": "Engineering"}]});
        Mock::given(method("GET"))
            .and(path("/account"))
            .and(header("authorization", "Bearer key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(account.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/departments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(departments.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            BreatheClient::new(&BreatheConfig::for_upstream(&server.uri(), Some("key"))).unwrap();

        assert_eq!(get_account_info(&client).await.unwrap(), account);
        assert_eq!(get_departments(&client).await.unwrap(), departments);
    }
}
