// src/testutil.rs

//! In-process HTTP stubs backing the outbound-client tests.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port and hand back its address.
/// The task is dropped with the runtime at the end of the test.
pub async fn spawn_stub(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
