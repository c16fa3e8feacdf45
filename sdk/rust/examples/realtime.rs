//! Example: Print realtime events until Ctrl+C

use pushbullet::{CancellationToken, Pushbullet};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> pushbullet::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Create client from PUSHBULLET_API_KEY environment variable
    let client = Pushbullet::from_env()?;

    let cancel = CancellationToken::new();
    let stop = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        stop.cancel();
    });

    println!("Waiting for events... (Ctrl+C to exit)");

    client
        .realtime(
            |message| match message.kind.as_str() {
                "tickle" => println!("tickle: {}", message.subtype.as_deref().unwrap_or("?")),
                "push" => println!("ephemeral: {}", message.push.unwrap_or_default()),
                other => println!("{}", other),
            },
            &cancel,
        )
        .await?;

    println!("Stopped");
    Ok(())
}
