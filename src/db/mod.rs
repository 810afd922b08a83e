//! Database Connection Management Module
//!
//! MongoDB 연결을 관리합니다. 예약 트랜잭션은 멀티 도큐먼트 트랜잭션을 사용하므로
//! MongoDB는 레플리카 셋(단일 노드 레플리카 셋 포함)으로 실행되어야 합니다.
//!
//! # 환경 변수
//!
//! ```bash
//! export MONGODB_URI="mongodb://localhost:27017/?replicaSet=rs0"
//! export DATABASE_NAME="travel_agency_dev"
//! ```

use mongodb::{Client, ClientSession, options::ClientOptions};
use log::info;

use crate::config::DatabaseConfig;

/// MongoDB 데이터베이스 연결 래퍼
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 환경 변수에서 연결 정보를 읽어 클라이언트를 만들고 `ping`으로 연결을 검증합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let database_name = DatabaseConfig::database_name();

        let mut client_options = ClientOptions::parse(DatabaseConfig::uri()).await?;
        client_options.app_name = Some("travel_agency".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// 트랜잭션용 세션을 시작합니다.
    pub async fn start_session(&self) -> Result<ClientSession, mongodb::error::Error> {
        self.client.start_session().await
    }
}
