//! Example: Push a note to every active device

use pushbullet::Pushbullet;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> pushbullet::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Create client from PUSHBULLET_API_KEY environment variable
    let client = Pushbullet::from_env()?;

    let user = client.user().await?;
    println!("Signed in as {}", user.name.as_deref().unwrap_or("?"));

    for device in client.devices().await? {
        let (Some(iden), Some(true)) = (device.iden, device.active) else {
            continue;
        };
        let push = client
            .push_note(iden.as_str(), "Hello", "Sent from the pushbullet example")
            .await?;
        println!("Pushed {} to {}", push.iden.unwrap_or_default(), iden);
    }

    Ok(())
}
