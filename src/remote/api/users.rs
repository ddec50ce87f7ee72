use super::*;

fn user_path(id: &str) -> String {
    format!("/api/user/{}/", id)
}

impl AdminApi {
    pub async fn list_users(&self) -> Result<Vec<User>, RequestError> {
        self.gateway.get("/api/user/").await
    }

    pub async fn get_user(&self, id: &str) -> Result<User, RequestError> {
        self.gateway.get(&user_path(id)).await
    }

    pub async fn update_user(&self, id: &str, patch: &UserPatch) -> Result<User, RequestError> {
        let body = serde_json::to_value(patch)
            .map_err(|e| RequestError::Decode(format!("serialize user patch: {}", e)))?;
        self.gateway.patch(&user_path(id), &body).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), RequestError> {
        self.gateway.delete(&user_path(id)).await
    }

    /// Roles assigned to a user, as full role records.
    pub async fn user_roles(&self, id: &str) -> Result<Vec<Role>, RequestError> {
        self.gateway
            .get(&format!("/api/user/{}/roles/", id))
            .await
    }

    pub async fn assign_role(&self, user_id: &str, role_id: &str) -> Result<Detail, RequestError> {
        self.gateway
            .post(
                "/api/user_role/",
                &serde_json::json!({"user": user_id, "role": role_id}),
            )
            .await
    }

    pub async fn remove_role(&self, user_id: &str, role_id: &str) -> Result<Detail, RequestError> {
        self.gateway
            .post(
                "/api/user_role/remove_role/",
                &serde_json::json!({"user": user_id, "role": role_id}),
            )
            .await
    }
}
