//! securepass-server – Bibliotheks-Root
//!
//! Deklariert die Server-Module und stellt den oeffentlichen
//! Einstiegspunkt fuer Integrationstests bereit.

pub mod config;
pub mod rest;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;

use securepass_auth::{AuthService, TokenStore};
use securepass_db::{DatabaseConfig, SqliteDb};

use config::ServerConfig;
use rest::AppState;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen (inkl. Migrationen)
    /// 2. Token-Store mit Cleanup-Task starten
    /// 3. REST-API starten
    /// 4. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        let db = SqliteDb::oeffnen(&DatabaseConfig {
            url: self.config.datenbank.url.clone(),
            max_verbindungen: self.config.datenbank.max_verbindungen,
            sqlite_wal: self.config.datenbank.sqlite_wal,
        })
        .await?;

        let token_store = TokenStore::neu_mit_cleanup(TokenStore::neu());
        let auth = Arc::new(AuthService::neu(Arc::new(db), token_store));

        let state = AppState {
            auth,
            hash_schleuse: Arc::new(Semaphore::new(
                self.config.sicherheit.max_gleichzeitige_hashes,
            )),
        };

        let app = rest::routes::router(&self.config.netzwerk.cors_origins).with_state(state);

        let listener = tokio::net::TcpListener::bind(self.config.api_bind_adresse()).await?;
        tracing::info!(adresse = %self.config.api_bind_adresse(), "REST-API bereit");

        // ConnectInfo liefert die Peer-Adresse fuer das Audit-Log
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            })
            .await?;

        Ok(())
    }
}
