//! Ephemeral endpoints.

use crate::client::Pushbullet;
use crate::error::Result;
use crate::types::{EphemeralRequest, SmsReply};

const SMS_PACKAGE: &str = "com.pushbullet.android";

impl Pushbullet {
    /// Ask an Android device to send an SMS on the user's behalf.
    ///
    /// * `user_iden` - iden of the sending user
    /// * `device_iden` - the phone that sends the SMS
    /// * `conversation_iden` - destination phone number
    /// * `message` - text to send
    ///
    /// Ephemerals are not stored, so the response is usually an empty object.
    pub async fn push_sms(
        &self,
        user_iden: &str,
        device_iden: &str,
        conversation_iden: &str,
        message: &str,
    ) -> Result<serde_json::Value> {
        let request = EphemeralRequest {
            kind: "push",
            push: SmsReply {
                kind: "messaging_extension_reply",
                package_name: SMS_PACKAGE,
                source_user_iden: user_iden,
                target_device_iden: device_iden,
                conversation_iden,
                message,
            },
        };
        self.post("/ephemerals", &request).await
    }
}
