use super::*;

impl AdminApi {
    pub async fn list_audit_logs(&self) -> Result<Vec<AuditLog>, RequestError> {
        self.gateway.get("/api/audit-logs/").await
    }
}
