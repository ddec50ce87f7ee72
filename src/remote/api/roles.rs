use super::*;

fn role_path(id: &str) -> String {
    format!("/api/roles/{}/", id)
}

impl AdminApi {
    pub async fn list_roles(&self) -> Result<Vec<Role>, RequestError> {
        self.gateway.get("/api/roles/").await
    }

    pub async fn get_role(&self, id: &str) -> Result<Role, RequestError> {
        self.gateway.get(&role_path(id)).await
    }

    pub async fn create_role(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Role, RequestError> {
        self.gateway
            .post(
                "/api/roles/",
                &serde_json::json!({"name": name, "description": description.unwrap_or("")}),
            )
            .await
    }

    pub async fn delete_role(&self, id: &str) -> Result<(), RequestError> {
        self.gateway.delete(&role_path(id)).await
    }

    pub async fn role_permissions(&self, id: &str) -> Result<Vec<Permission>, RequestError> {
        self.gateway
            .get(&format!("/api/roles/{}/permissions/", id))
            .await
    }

    pub async fn grant_permissions(
        &self,
        role_id: &str,
        permission_ids: &[String],
    ) -> Result<Detail, RequestError> {
        self.gateway
            .post(
                &format!("/api/roles/{}/permissions/", role_id),
                &serde_json::json!({"permissions": permission_ids}),
            )
            .await
    }

    pub async fn revoke_permissions(
        &self,
        role_id: &str,
        permission_ids: &[String],
    ) -> Result<Detail, RequestError> {
        self.gateway
            .post(
                &format!("/api/roles/{}/permissions/delete/", role_id),
                &serde_json::json!({"permissions": permission_ids}),
            )
            .await
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, RequestError> {
        self.gateway.get("/api/permissions/").await
    }
}
