use crate::components::redis_service::RedisActorHandle;
use tokio::sync::oneshot;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c};

/// Wait for a termination signal, then stop the token store and the server.
///
/// A failed handler install stops both right away.
pub async fn handle_signals(server_stop: oneshot::Sender<()>, tokens: RedisActorHandle) {
    match wait_for_signal().await {
        Ok(name) => info!("Received {}, shutting down", name),
        Err(e) => error!("Could not listen for shutdown signals, stopping now: {}", e),
    }

    stop_services(server_stop, tokens).await;
}

/// Stop the Redis actor, then the server
pub async fn stop_services(server_stop: oneshot::Sender<()>, tokens: RedisActorHandle) {
    match tokens.shutdown().await {
        Ok(()) => info!("Token store stopped"),
        Err(e) => error!("Token store did not stop cleanly: {:?}", e),
    }

    if server_stop.send(()).is_err() {
        info!("Server already stopped");
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    Ok(tokio::select! {
        _ = terminate.recv() => "SIGTERM",
        _ = interrupt.recv() => "SIGINT",
    })
}

#[cfg(windows)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    let mut ctrlc = ctrl_c()?;
    let mut ctrlbreak = ctrl_break()?;

    Ok(tokio::select! {
        _ = ctrlc.recv() => "Ctrl+C",
        _ = ctrlbreak.recv() => "Ctrl+Break",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::redis_service::RedisActor;

    #[tokio::test]
    async fn test_stop_services_stops_actor_and_server() {
        let (mut actor, handle) = RedisActor::new("redis://127.0.0.1:6379").unwrap();
        let actor_task = tokio::spawn(async move { actor.run().await });
        let (server_stop, server_stopped) = oneshot::channel();

        stop_services(server_stop, handle).await;

        assert!(server_stopped.await.is_ok());
        actor_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_services_with_stopped_actor_still_stops_server() {
        let (mut actor, handle) = RedisActor::new("redis://127.0.0.1:6379").unwrap();
        let actor_task = tokio::spawn(async move { actor.run().await });
        handle.shutdown().await.unwrap();
        actor_task.await.unwrap();

        let (server_stop, server_stopped) = oneshot::channel();
        stop_services(server_stop, handle).await;

        assert!(server_stopped.await.is_ok());
    }
}
