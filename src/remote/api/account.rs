use super::*;

impl AdminApi {
    /// Public registration. A duplicate email comes back as a 400
    /// [`RequestError::Status`]; see [`RequestError::field_errors`].
    pub async fn register(&self, account: &NewAccount) -> Result<RegisteredUser, RequestError> {
        let body = serde_json::to_value(account)
            .map_err(|e| RequestError::Decode(format!("serialize account: {}", e)))?;
        self.gateway
            .send_as(endpoints::REGISTER, Method::POST, Some(&body), true)
            .await
    }
}
