//! Device endpoints.

use crate::client::Pushbullet;
use crate::error::Result;
use crate::types::{CreateDeviceRequest, Device, DevicesEnvelope};

impl Pushbullet {
    /// Register a new `stream` device named `nickname`.
    pub async fn add_device(&self, nickname: &str) -> Result<Device> {
        let request = CreateDeviceRequest {
            nickname,
            kind: "stream",
        };
        self.post("/devices", &request).await
    }

    /// List the devices on the account, in the order the service returns them.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let envelope: DevicesEnvelope = self.get("/devices", &[]).await?;
        Ok(envelope.devices)
    }

    /// Delete a device. Returns the (usually empty) response body.
    pub async fn delete_device(&self, iden: &str) -> Result<serde_json::Value> {
        self.delete(&format!("/devices/{iden}")).await
    }
}
