//! Eatr: barcode acquisition and product lookup for meal logging, plus the
//! clients the surrounding screens use to talk to the Eatr backend.

pub mod auth;
pub mod backend;
pub mod barcode;
pub mod camera;
pub mod config;
pub mod error;
pub mod meals;
pub mod nutrients;
pub mod overview;
pub mod products;
pub mod profile;
pub mod scanner;
pub mod screen;
pub mod state;

pub use error::{AppError, AppResult};

#[cfg(test)]
pub(crate) mod testing {
    use tokio::net::TcpListener;

    /// Serves `app` on an ephemeral local port and returns its base URL.
    pub(crate) async fn spawn_server(app: axum::Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
