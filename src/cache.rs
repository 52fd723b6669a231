use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::{debug, info, warn};

use crate::models::SeatMap;

const SEAT_MAP_KEY: &str = "seats:map";

/// Read-through cache for the seat map shown to clients.
///
/// Never consulted when reserving; it only spares the database on
/// repeated seat map reads. With no Redis configured every call is a miss.
#[derive(Clone)]
pub struct CacheService {
    conn: Option<MultiplexedConnection>,
    ttl_secs: u64,
}

impl CacheService {
    pub async fn connect(redis_url: Option<&str>, ttl_secs: u64) -> redis::RedisResult<Self> {
        let conn = match redis_url {
            Some(url) => {
                let client = Client::open(url)?;
                Some(client.get_multiplexed_tokio_connection().await?)
            }
            None => None,
        };
        Ok(Self { conn, ttl_secs })
    }

    pub fn disabled() -> Self {
        Self { conn: None, ttl_secs: 0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some()
    }

    pub async fn get_seat_map(&self) -> Option<SeatMap> {
        let mut conn = self.conn.clone()?;
        let data: Option<String> = match conn.get(SEAT_MAP_KEY).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read seat map from cache: {:?}", e);
                return None;
            }
        };
        data.and_then(|json| serde_json::from_str(&json).ok())
    }

    pub async fn save_seat_map(&self, map: &SeatMap) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let data = match serde_json::to_string(map) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to serialize seat map: {:?}", e);
                return;
            }
        };
        let result: redis::RedisResult<()> = conn.set_ex(SEAT_MAP_KEY, data, self.ttl_secs).await;
        if let Err(e) = result {
            warn!("Failed to cache seat map: {:?}", e);
        } else {
            debug!(ttl = self.ttl_secs, "Seat map cached");
        }
    }

    /// Called after every committed reservation and every reset.
    pub async fn invalidate_seat_map(&self) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let result: redis::RedisResult<()> = conn.del(SEAT_MAP_KEY).await;
        match result {
            Ok(()) => info!("Invalidated seat map cache"),
            Err(e) => warn!("Failed to invalidate seat map cache: {:?}", e),
        }
    }
}
